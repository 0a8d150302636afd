//! Error types shared across the annotation engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, reconciling, or persisting annotations.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// No uploaded image and no resumable prior session.
    #[error("no image available and no resumable session")]
    MissingImage,

    /// A CSV row failed to parse as `(int, int, label-name)`.
    #[error("malformed annotation row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// A label name read from a CSV is not part of the current schema.
    #[error("unknown label name {0:?}")]
    UnknownLabel(String),

    /// A stored label index does not exist in the current schema.
    #[error("label index {0} out of schema range")]
    LabelOutOfRange(usize),

    /// The label schema file could not be read or parsed.
    #[error("label schema error: {0}")]
    Schema(String),

    /// An image could not be decoded or encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A file in the sync store could not be found.
    #[error("no remote file with base name {0:?}")]
    RemoteFileMissing(String),

    /// Underlying filesystem failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Filesystem failure with the offending path attached.
    #[error("i/o error on {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnnotateError {
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoAt {
            path: path.into(),
            source,
        }
    }
}
