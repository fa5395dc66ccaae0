//! Project ignore-file rules.
//!
//! The `.gitignore` at the project root is read through the [`Runtime`] and
//! compiled with the `ignore` crate's gitignore matcher. Compiled rules are
//! cached and reused until the file's modification time changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use parking_lot::RwLock;

use crate::runtime::Runtime;

pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Compiled ignore rules anchored at a project root.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    root: PathBuf,
    matcher: Gitignore,
}

impl IgnoreRules {
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            matcher: Gitignore::empty(),
        }
    }

    /// Compile gitignore-syntax `content`. Invalid lines are skipped.
    pub fn parse(root: impl Into<PathBuf>, content: &str) -> Self {
        let root = root.into();
        let mut builder = GitignoreBuilder::new(&root);
        for line in content.lines() {
            if let Err(e) = builder.add_line(None, line) {
                tracing::debug!(line, error = %e, "skipping invalid ignore rule");
            }
        }
        let matcher = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to compile ignore rules");
            Gitignore::empty()
        });
        Self { root, matcher }
    }

    pub fn len(&self) -> usize {
        self.matcher.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// Whether `path` (or one of its parent directories) is ignored.
    /// Paths outside the root never are.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.matcher.is_empty() || !path.starts_with(&self.root) {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(path, false)
            .is_ignore()
    }
}

#[derive(Debug)]
struct CachedRules {
    root: PathBuf,
    modified: Option<u64>,
    rules: Arc<IgnoreRules>,
}

/// Ignore rules cached across analyses, keyed by root and file mtime.
#[derive(Debug, Default)]
pub struct IgnoreCache {
    entry: RwLock<Option<CachedRules>>,
}

impl IgnoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules for `root`, reading the ignore file only when it changed.
    ///
    /// A missing or unreadable file yields empty rules.
    pub async fn load(&self, root: &Path, runtime: &dyn Runtime) -> Arc<IgnoreRules> {
        let path = root.join(IGNORE_FILE_NAME);
        let modified = if runtime.exists(&path) {
            runtime.metadata(&path).await.ok().map(|m| m.modified)
        } else {
            None
        };

        let Some(modified) = modified else {
            return Arc::new(IgnoreRules::empty(root));
        };

        if let Some(cached) = self.entry.read().as_ref() {
            if cached.root == root && cached.modified == modified {
                return Arc::clone(&cached.rules);
            }
        }

        let rules = match runtime.read_file(&path).await {
            Ok(bytes) => IgnoreRules::parse(root, &String::from_utf8_lossy(&bytes)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignore file unreadable");
                IgnoreRules::empty(root)
            }
        };
        tracing::debug!(path = %path.display(), rules = rules.len(), "loaded ignore rules");

        let rules = Arc::new(rules);
        *self.entry.write() = Some(CachedRules {
            root: root.to_path_buf(),
            modified,
            rules: Arc::clone(&rules),
        });
        rules
    }

    pub fn clear(&self) {
        *self.entry.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_utils::TestRuntime;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn gitignore_semantics() {
        let rules = IgnoreRules::parse("/proj", "# build output\ndist/\n*.log\n!keep.log\n");
        assert!(rules.is_ignored(Path::new("/proj/dist/index.js")));
        assert!(rules.is_ignored(Path::new("/proj/server.log")));
        assert!(!rules.is_ignored(Path::new("/proj/keep.log")));
        assert!(!rules.is_ignored(Path::new("/proj/src/index.ts")));
    }

    #[test]
    fn paths_outside_root_are_not_ignored() {
        let rules = IgnoreRules::parse("/proj", "*.ts\n");
        assert!(!rules.is_ignored(Path::new("/elsewhere/a.ts")));
    }

    #[tokio::test]
    async fn missing_ignore_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let runtime = TestRuntime::new(temp.path().to_path_buf());
        let rules = IgnoreCache::new().load(temp.path(), &runtime).await;
        assert!(rules.is_empty());
    }

    #[tokio::test]
    async fn cached_until_modified() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(IGNORE_FILE_NAME), "generated/\n").unwrap();
        let runtime = TestRuntime::new(temp.path().to_path_buf());
        let cache = IgnoreCache::new();

        let first = cache.load(temp.path(), &runtime).await;
        let second = cache.load(temp.path(), &runtime).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(runtime.reads(), 1);
        assert!(first.is_ignored(&temp.path().join("generated/api.ts")));

        cache.clear();
        cache.load(temp.path(), &runtime).await;
        assert_eq!(runtime.reads(), 2);
    }
}
