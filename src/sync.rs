//! Contract for the remote review-workflow store.
//!
//! Images move through three buckets as they are scored and reviewed. The
//! engine treats the remote side as an opaque get/put of files by logical
//! name within a bucket; nothing here depends on how a backend organizes
//! folders internally. `FolderStore` is the bundled filesystem backend used
//! for offline work and tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::error::AnnotateError;
use crate::utils::base_stem;

/// Review-workflow stage of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    Todo,
    InReview,
    Done,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Todo, Bucket::InReview, Bucket::Done];

    pub fn folder_name(self) -> &'static str {
        match self {
            Bucket::Todo => "to_do",
            Bucket::InReview => "to_review",
            Bucket::Done => "done",
        }
    }
}

/// Metadata the review UI shows next to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileMeta {
    pub last_editor: String,
    pub modified: DateTime<FixedOffset>,
}

/// Opaque get/put store with bucket-based review state.
pub trait RemoteStore {
    /// File names currently in a bucket.
    fn list(&self, bucket: Bucket) -> Result<Vec<String>, AnnotateError>;

    /// Copy a remote file to a local path.
    fn download(&self, bucket: Bucket, file_name: &str, dest: &Path) -> Result<(), AnnotateError>;

    /// Put a local file into a bucket, replacing any previous version.
    fn upload(&self, bucket: Bucket, src: &Path) -> Result<(), AnnotateError>;

    /// Move a file between buckets (reassign its parent).
    fn promote(&self, file_name: &str, from: Bucket, to: Bucket) -> Result<(), AnnotateError>;

    fn metadata(&self, bucket: Bucket, file_name: &str) -> Result<RemoteFileMeta, AnnotateError>;

    /// A bucket's files grouped by base name, so an image and its CSV/JSON
    /// companions appear as one unit of work.
    fn grouped(&self, bucket: Bucket) -> Result<BTreeMap<String, Vec<String>>, AnnotateError> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in self.list(bucket)? {
            groups
                .entry(base_stem(&name).to_string())
                .or_default()
                .push(name);
        }
        Ok(groups)
    }
}

/// Filesystem-backed store: one subfolder per bucket.
#[derive(Debug, Clone)]
pub struct FolderStore {
    root: PathBuf,
    /// Offset applied to modification times in metadata.
    tz_offset: FixedOffset,
}

/// Review metadata timestamps default to UTC−3, the lab's local offset.
const DEFAULT_TZ_OFFSET_HOURS: i32 = -3;

impl FolderStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AnnotateError> {
        let offset =
            FixedOffset::east_opt(DEFAULT_TZ_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix());
        Self::open_with_offset(root, offset)
    }

    pub fn open_with_offset(
        root: impl Into<PathBuf>,
        tz_offset: FixedOffset,
    ) -> Result<Self, AnnotateError> {
        let root = root.into();
        for bucket in Bucket::ALL {
            let dir = root.join(bucket.folder_name());
            fs::create_dir_all(&dir).map_err(|e| AnnotateError::io_at(&dir, e))?;
        }
        Ok(Self { root, tz_offset })
    }

    fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.folder_name())
    }

    fn file_path(&self, bucket: Bucket, file_name: &str) -> Result<PathBuf, AnnotateError> {
        let path = self.bucket_dir(bucket).join(file_name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(AnnotateError::RemoteFileMissing(file_name.to_string()))
        }
    }
}

impl RemoteStore for FolderStore {
    fn list(&self, bucket: Bucket) -> Result<Vec<String>, AnnotateError> {
        let dir = self.bucket_dir(bucket);
        let entries = fs::read_dir(&dir).map_err(|e| AnnotateError::io_at(&dir, e))?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    fn download(&self, bucket: Bucket, file_name: &str, dest: &Path) -> Result<(), AnnotateError> {
        let src = self.file_path(bucket, file_name)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| AnnotateError::io_at(parent, e))?;
        }
        fs::copy(&src, dest).map_err(|e| AnnotateError::io_at(dest, e))?;
        Ok(())
    }

    fn upload(&self, bucket: Bucket, src: &Path) -> Result<(), AnnotateError> {
        let file_name = src
            .file_name()
            .ok_or_else(|| AnnotateError::RemoteFileMissing(src.display().to_string()))?;
        let dest = self.bucket_dir(bucket).join(file_name);
        fs::copy(src, &dest).map_err(|e| AnnotateError::io_at(&dest, e))?;
        Ok(())
    }

    fn promote(&self, file_name: &str, from: Bucket, to: Bucket) -> Result<(), AnnotateError> {
        let src = self.file_path(from, file_name)?;
        let dest = self.bucket_dir(to).join(file_name);
        fs::rename(&src, &dest).map_err(|e| AnnotateError::io_at(&dest, e))?;
        Ok(())
    }

    fn metadata(&self, bucket: Bucket, file_name: &str) -> Result<RemoteFileMeta, AnnotateError> {
        let path = self.file_path(bucket, file_name)?;
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| AnnotateError::io_at(&path, e))?;

        let modified: DateTime<Utc> = modified.into();
        Ok(RemoteFileMeta {
            last_editor: "local".to_string(),
            modified: modified.with_timezone(&self.tz_offset),
        })
    }
}
