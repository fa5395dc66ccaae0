//! Per-file import cache.
//!
//! Extraction results are keyed by path and stamped with the file's
//! modification time at read time. A lookup with a different mtime drops the
//! stale entry; it is never served.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use serde::Serialize;

use crate::import::ImportStatement;

#[derive(Debug, Clone)]
struct CachedImports {
    modified: u64,
    imports: Arc<Vec<ImportStatement>>,
}

/// Hit/miss counters for the import cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Concurrent import cache shared by every analysis of one analyzer.
///
/// Concurrent first population of the same path is harmless: both writers
/// store the same extraction for the same mtime.
#[derive(Debug, Default)]
pub struct ImportCache {
    entries: DashMap<PathBuf, CachedImports>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ImportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached imports for `path` if they were computed at `modified`.
    ///
    /// Files without an mtime are never cached.
    pub fn get(&self, path: &Path, modified: Option<u64>) -> Option<Arc<Vec<ImportStatement>>> {
        let Some(modified) = modified else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        let fresh = self.entries.get(path).and_then(|entry| {
            (entry.modified == modified).then(|| Arc::clone(&entry.imports))
        });

        match fresh {
            Some(imports) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(path = %path.display(), "import cache hit");
                Some(imports)
            }
            None => {
                // Drop a stale entry so it can never be served later.
                self.entries
                    .remove_if(path, |_, entry| entry.modified != modified);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, path: PathBuf, modified: Option<u64>, imports: Arc<Vec<ImportStatement>>) {
        if let Some(modified) = modified {
            self.entries.insert(path, CachedImports { modified, imports });
        }
    }

    pub fn invalidate(&self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
