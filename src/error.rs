//! Error types shared across the crate.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BroomError>;

#[derive(Debug, Error)]
pub enum BroomError {
    /// The requested path does not exist.
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),

    /// The path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Access to the path was denied.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A session index that is not present in the store.
    #[error("session {index} is out of range ({count} sessions exist)")]
    OutOfRange { index: usize, count: usize },

    /// The triage cursor has moved past the last entry.
    #[error("no entry left to review")]
    NothingLeft,

    /// Reading, writing, or decoding the session store failed.
    #[error("session store error: {0}")]
    Store(String),

    /// Reading or writing the user configuration failed.
    #[error("config error: {0}")]
    Config(String),

    /// Any other I/O failure, tagged with the path it occurred on.
    #[error("I/O error for {1}: {0}")]
    Io(#[source] io::Error, PathBuf),
}

impl BroomError {
    /// Classifies an `io::Error` raised while touching `path`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => BroomError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => BroomError::PermissionDenied(path.to_path_buf()),
            _ => BroomError::Io(err, path.to_path_buf()),
        }
    }
}
