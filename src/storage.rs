//! On-disk layout and file-system discipline.
//!
//! One data directory holds three sibling subdirectories (images,
//! annotations, reports) plus the session log. Companion files share a base
//! name across the three directories and differ only by extension; matching
//! is therefore always extension-agnostic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{info, warn};

use crate::error::AnnotateError;
use crate::utils::base_stem;

pub const SESSION_LOG_NAME: &str = "latest_session.log";

/// Resolved paths of the annotation data directory.
#[derive(Debug, Clone)]
pub struct DataDirs {
    pub root: PathBuf,
    pub images: PathBuf,
    pub annotations: PathBuf,
    pub reports: PathBuf,
    pub session_log: PathBuf,
}

impl DataDirs {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            images: root.join("images"),
            annotations: root.join("annotations"),
            reports: root.join("reports"),
            session_log: root.join(SESSION_LOG_NAME),
            root,
        }
    }

    /// Create all data directories, idempotently.
    pub fn bootstrap(&self) -> Result<(), AnnotateError> {
        for dir in [&self.root, &self.images, &self.annotations, &self.reports] {
            fs::create_dir_all(dir).map_err(|e| AnnotateError::io_at(dir, e))?;
        }
        Ok(())
    }

    pub fn image_path(&self, file_name: &str) -> PathBuf {
        self.images.join(file_name)
    }

    pub fn annotation_path(&self, stem: &str) -> PathBuf {
        self.annotations.join(format!("{stem}.csv"))
    }

    pub fn report_path(&self, stem: &str) -> PathBuf {
        self.reports.join(format!("{stem}.txt"))
    }

    /// Last active image name, if a prior session left one behind.
    pub fn read_session_log(&self) -> Option<String> {
        match fs::read_to_string(&self.session_log) {
            Ok(contents) => {
                let name = contents.trim();
                if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                }
            }
            Err(_) => None,
        }
    }

    /// Record `file_name` as the active image for session resume.
    pub fn write_session_log(&self, file_name: &str) -> Result<(), AnnotateError> {
        write_atomic(&self.session_log, file_name.as_bytes())
    }

    /// Find the stored image whose base name matches `file_name`,
    /// regardless of extension.
    pub fn locate_image(&self, file_name: &str) -> Option<PathBuf> {
        let exact = self.image_path(file_name);
        if exact.is_file() {
            return Some(exact);
        }

        let wanted = base_stem(file_name);
        let entries = fs::read_dir(&self.images).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if base_stem(name) == wanted {
                    return Some(path);
                }
            }
        }
        None
    }

    /// Delete stale files across the three directories, keeping the
    /// `keep_recent` most recently modified image triplets and anything
    /// whose base name matches `except`.
    ///
    /// Recency is judged on the image files alone; their CSV and report
    /// companions survive or fall with them. Safe to re-run: a clean
    /// directory deletes nothing.
    pub fn cleanup_previous(
        &self,
        except: Option<&str>,
        keep_recent: usize,
    ) -> Result<usize, AnnotateError> {
        let recent: Vec<String> = recent_stems(&self.images, keep_recent)?;
        let except_stem = except.map(base_stem);

        let keep = |file_name: &str| -> bool {
            let stem = base_stem(file_name);
            recent.iter().any(|r| r == stem) || except_stem == Some(stem)
        };

        let mut deleted = 0;
        for (dir, extension) in [
            (&self.images, None),
            (&self.annotations, Some("csv")),
            (&self.reports, Some("txt")),
        ] {
            deleted += delete_stale(dir, extension, &keep)?;
        }

        if deleted > 0 {
            info!("cleanup removed {deleted} stale file(s)");
        }
        Ok(deleted)
    }
}

/// Base names of the `keep_recent` most recently modified files in `dir`.
fn recent_stems(dir: &Path, keep_recent: usize) -> Result<Vec<String>, AnnotateError> {
    let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        // A directory that does not exist yet has nothing to keep
        Err(_) => return Ok(Vec::new()),
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        files.push((path, modified));
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));
    files.truncate(keep_recent);

    Ok(files
        .into_iter()
        .filter_map(|(path, _)| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| base_stem(n).to_string())
        })
        .collect())
}

fn delete_stale(
    dir: &Path,
    extension: Option<&str>,
    keep: &dyn Fn(&str) -> bool,
) -> Result<usize, AnnotateError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(0),
    };

    let mut deleted = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(wanted) = extension {
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
            if !matches {
                continue;
            }
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if keep(name) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => deleted += 1,
            Err(e) => warn!("could not delete {}: {e}", path.display()),
        }
    }
    Ok(deleted)
}

/// Write via a temp file in the same directory, then rename into place.
///
/// A crash mid-write leaves the previous file intact; the rename is the
/// commit point.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AnnotateError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|e| AnnotateError::io_at(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| AnnotateError::io_at(path, e))?;
    Ok(())
}
