//! Error types for treesync

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for treesync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// IO error tied to the path that caused it
    #[error("IO error at {path}: {source}")]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed
    #[error("Traversal error: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (logic checks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// An entry was found outside the root it was mapped from
    #[error("Path {path} is not inside root {root}")]
    PathMapping { path: PathBuf, root: PathBuf },
}

impl SyncError {
    /// Attach a path to an IO error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::PathIo {
            path: path.into(),
            source,
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SyncError::Validation(_) | SyncError::Config(_))
    }

    /// Check if the underlying IO error is `NotFound`
    ///
    /// Entries vanishing mid-cycle surface this way.
    pub fn is_not_found(&self) -> bool {
        match self {
            SyncError::PathIo { source, .. } | SyncError::Io(source) => {
                source.kind() == ErrorKind::NotFound
            }
            SyncError::Walk(err) => err
                .io_error()
                .is_some_and(|io| io.kind() == ErrorKind::NotFound),
            _ => false,
        }
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        match self {
            SyncError::PathIo { source, .. } | SyncError::Io(source) => {
                source.kind() == ErrorKind::PermissionDenied
            }
            SyncError::Walk(err) => err
                .io_error()
                .is_some_and(|io| io.kind() == ErrorKind::PermissionDenied),
            _ => false,
        }
    }
}

/// Extension for tagging IO results with the path they touched
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &std::path::Path) -> Result<T, SyncError>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at(self, path: &std::path::Path) -> Result<T, SyncError> {
        self.map_err(|e| SyncError::io(path, e))
    }
}
