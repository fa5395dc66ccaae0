//! Native Runtime Implementation
//!
//! Wraps `std::fs` behind the `Runtime` trait. Blocking calls run on tokio's
//! blocking pool so a traversal never stalls the executor while waiting on
//! disk.

// NativeRuntime is the one place allowed to call std::fs
#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::task;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Native filesystem Runtime implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    /// Create a new NativeRuntime instance.
    pub fn new() -> Self {
        Self
    }
}

fn join_error(e: task::JoinError) -> RuntimeError {
    RuntimeError::Other(format!("Task join error: {}", e))
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            std::fs::read(&path).map_err(|e| RuntimeError::from_io(&path, e))
        })
        .await
        .map_err(join_error)?
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            let metadata =
                std::fs::metadata(&path).map_err(|e| RuntimeError::from_io(&path, e))?;

            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64);

            Ok(FileMetadata {
                size: metadata.len(),
                is_dir: metadata.is_dir(),
                is_file: metadata.is_file(),
                modified,
            })
        })
        .await
        .map_err(join_error)?
    }

    /// Quick metadata check; cheap enough to stay synchronous.
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            let entries = std::fs::read_dir(&path).map_err(|e| RuntimeError::from_io(&path, e))?;

            let mut result = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| {
                    RuntimeError::Io(format!("Failed to read directory entry: {}", e))
                })?;

                if let Some(name) = entry.file_name().to_str() {
                    result.push(name.to_string());
                }
            }

            Ok(result)
        })
        .await
        .map_err(join_error)?
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        std::env::current_dir().map_err(|e| {
            RuntimeError::Io(format!("Failed to get current working directory: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.ts");
        fs::write(&file_path, b"export {}").unwrap();

        let runtime = NativeRuntime::new();
        let content = runtime.read_file(&file_path).await.unwrap();
        assert_eq!(content, b"export {}");
    }

    #[tokio::test]
    async fn test_read_missing_file_maps_to_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let runtime = NativeRuntime::new();
        let result = runtime.read_file(&temp_dir.path().join("nope.ts")).await;
        assert!(matches!(result, Err(RuntimeError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, b"test content").unwrap();

        let runtime = NativeRuntime::new();
        let metadata = runtime.metadata(&file_path).await.unwrap();

        assert!(metadata.is_file);
        assert!(!metadata.is_dir);
        assert_eq!(metadata.size, 12);
        assert!(metadata.modified.is_some());
    }

    #[tokio::test]
    async fn test_is_file_and_is_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("a.ts");
        fs::write(&file_path, b"").unwrap();

        let runtime = NativeRuntime::new();
        assert!(runtime.is_file(&file_path).await);
        assert!(!runtime.is_dir(&file_path).await);
        assert!(runtime.is_dir(temp_dir.path()).await);
        assert!(!runtime.is_file(&temp_dir.path().join("missing.ts")).await);
    }

    #[tokio::test]
    async fn test_read_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("file1.txt"), b"test1").unwrap();
        fs::write(temp_dir.path().join("file2.txt"), b"test2").unwrap();

        let runtime = NativeRuntime::new();
        let mut entries = runtime.read_dir(temp_dir.path()).await.unwrap();
        entries.sort();

        assert_eq!(entries, vec!["file1.txt", "file2.txt"]);
    }
}
