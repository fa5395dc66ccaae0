//! Test utilities for sprig-graph.
//!
//! `TestRuntime` reads the real filesystem inside a temporary directory and
//! adds two hooks tests need: a read counter (to observe the import cache)
//! and a deny list (to simulate unreadable files).

// Test utilities are allowed to use std::fs since they only run on native platforms
#![allow(clippy::disallowed_methods)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Simple test runtime that wraps std::fs for native tests.
///
/// ```rust
/// use tempfile::TempDir;
/// use sprig_graph::test_utils::TestRuntime;
///
/// let temp = TempDir::new().unwrap();
/// let runtime = TestRuntime::new(temp.path().to_path_buf());
/// assert_eq!(runtime.reads(), 0);
/// ```
#[derive(Debug)]
pub struct TestRuntime {
    cwd: PathBuf,
    reads: AtomicUsize,
    denied: Mutex<FxHashSet<PathBuf>>,
}

impl TestRuntime {
    /// Create a new test runtime with the specified working directory.
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            reads: AtomicUsize::new(0),
            denied: Mutex::new(FxHashSet::default()),
        }
    }

    /// Number of successful or failed `read_file` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Make every future read of `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: impl Into<PathBuf>) {
        self.denied.lock().insert(path.into());
    }
}

#[async_trait]
impl Runtime for TestRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.denied.lock().contains(path) {
            return Err(RuntimeError::PermissionDenied(path.to_path_buf()));
        }
        std::fs::read(path).map_err(|e| RuntimeError::from_io(path, e))
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let metadata = std::fs::metadata(path).map_err(|e| RuntimeError::from_io(path, e))?;
        Ok(FileMetadata {
            size: metadata.len(),
            is_file: metadata.is_file(),
            is_dir: metadata.is_dir(),
            modified: metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        let entries: Vec<String> = std::fs::read_dir(path)
            .map_err(|e| RuntimeError::from_io(path, e))?
            .filter_map(|entry| {
                entry
                    .ok()
                    .and_then(|e| e.file_name().to_str().map(String::from))
            })
            .collect();
        Ok(entries)
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_runtime_counts_reads() {
        let temp = TempDir::new().unwrap();
        let cwd = temp.path().to_path_buf();
        let runtime = TestRuntime::new(cwd.clone());

        let file_path = cwd.join("a.ts");
        fs::write(&file_path, b"export {}").unwrap();

        runtime.read_file(&file_path).await.unwrap();
        runtime.read_file(&file_path).await.unwrap();
        assert_eq!(runtime.reads(), 2);
    }

    #[tokio::test]
    async fn test_runtime_deny_list() {
        let temp = TempDir::new().unwrap();
        let cwd = temp.path().to_path_buf();
        let runtime = TestRuntime::new(cwd.clone());

        let file_path = cwd.join("secret.ts");
        fs::write(&file_path, b"export {}").unwrap();
        runtime.deny(&file_path);

        let result = runtime.read_file(&file_path).await;
        assert!(matches!(result, Err(RuntimeError::PermissionDenied(_))));
        // Metadata is still available; only reads are blocked
        assert!(runtime.metadata(&file_path).await.unwrap().is_file);
    }

    #[tokio::test]
    async fn test_runtime_read_dir() {
        let temp = TempDir::new().unwrap();
        let cwd = temp.path().to_path_buf();
        let runtime = TestRuntime::new(cwd.clone());

        fs::write(cwd.join("file1.ts"), b"1").unwrap();
        fs::create_dir(cwd.join("subdir")).unwrap();

        let entries = runtime.read_dir(&cwd).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&"file1.ts".to_string()));
        assert!(entries.contains(&"subdir".to_string()));
    }
}
