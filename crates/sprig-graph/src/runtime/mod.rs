//! Filesystem runtime abstraction
//!
//! Every file read, stat and directory listing the analyzer performs goes
//! through the `Runtime` trait. The analyzer never touches `std::fs` directly,
//! which keeps the traversal testable and lets hosts (editors, daemons)
//! substitute their own file storage.

pub mod native;

// Test utilities (available in test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

impl RuntimeError {
    /// Map an `std::io::Error` for `path` onto the runtime taxonomy.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => RuntimeError::FileNotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                RuntimeError::PermissionDenied(path.to_path_buf())
            }
            _ => RuntimeError::Io(format!("{}: {}", path.display(), err)),
        }
    }
}

/// File metadata
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Whether this is a directory
    pub is_dir: bool,
    /// Whether this is a file
    pub is_file: bool,
    /// Last modified timestamp (milliseconds since epoch)
    pub modified: Option<u64>,
}

/// Filesystem collaborator used by the analyzer.
///
/// Implementations must be reliable but may fail (permission errors, missing
/// files); the analyzer recovers from every error they return.
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file from the filesystem
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Get file metadata
    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// List the entry names of a directory
    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>>;

    /// Get the current working directory
    fn get_cwd(&self) -> RuntimeResult<PathBuf>;

    /// Whether `path` exists and is a regular file.
    async fn is_file(&self, path: &Path) -> bool {
        if !self.exists(path) {
            return false;
        }
        self.metadata(path).await.is_ok_and(|m| m.is_file)
    }

    /// Whether `path` exists and is a directory.
    async fn is_dir(&self, path: &Path) -> bool {
        if !self.exists(path) {
            return false;
        }
        self.metadata(path).await.is_ok_and(|m| m.is_dir)
    }
}
