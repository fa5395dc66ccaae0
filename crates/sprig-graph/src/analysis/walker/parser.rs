//! Reading files and extracting their imports.
//!
//! Reads go through the [`Runtime`] and are capped at the configured size.
//! Extraction results are served from the [`ImportCache`] when the file's
//! modification time has not changed.

use std::path::Path;
use std::sync::Arc;

use crate::analysis::cache::ImportCache;
use crate::analysis::extractors::{ImportExtractor, is_supported};
use crate::import::ImportStatement;
use crate::runtime::{Runtime, RuntimeError};

use super::WalkerError;

/// Reads files and turns them into import lists.
#[derive(Debug)]
pub struct ModuleParser<'a> {
    extractor: &'a dyn ImportExtractor,
    cache: &'a ImportCache,
    source_extensions: &'a [String],
    max_file_size: usize,
}

impl<'a> ModuleParser<'a> {
    pub fn new(
        extractor: &'a dyn ImportExtractor,
        cache: &'a ImportCache,
        source_extensions: &'a [String],
        max_file_size: usize,
    ) -> Self {
        Self {
            extractor,
            cache,
            source_extensions,
            max_file_size,
        }
    }

    /// Imports of `path` in source order.
    ///
    /// Files whose suffix is not a source extension yield an empty list
    /// without being read.
    pub async fn imports(
        &self,
        path: &Path,
        runtime: &dyn Runtime,
    ) -> Result<Arc<Vec<ImportStatement>>, WalkerError> {
        if !is_supported(path, self.source_extensions) {
            return Ok(Arc::new(Vec::new()));
        }

        let metadata = runtime
            .metadata(path)
            .await
            .map_err(|e| WalkerError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;

        // Check file size before reading
        if metadata.size > self.max_file_size as u64 {
            return Err(WalkerError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.size as usize,
                max: self.max_file_size,
            });
        }

        if let Some(imports) = self.cache.get(path, metadata.modified) {
            return Ok(imports);
        }

        let code = self.read_file(path, runtime).await?;
        let imports = Arc::new(self.extractor.extract(&code));
        tracing::trace!(
            path = %path.display(),
            extractor = self.extractor.name(),
            imports = imports.len(),
            "extracted imports"
        );

        self.cache
            .insert(path.to_path_buf(), metadata.modified, Arc::clone(&imports));
        Ok(imports)
    }

    async fn read_file(&self, path: &Path, runtime: &dyn Runtime) -> Result<String, WalkerError> {
        let bytes = runtime
            .read_file(path)
            .await
            .map_err(|e| WalkerError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;

        // The file may have grown since it was stat'ed.
        if bytes.len() > self.max_file_size {
            return Err(WalkerError::FileTooLarge {
                path: path.to_path_buf(),
                size: bytes.len(),
                max: self.max_file_size,
            });
        }

        String::from_utf8(bytes).map_err(|e| WalkerError::ReadFile {
            path: path.to_path_buf(),
            source: RuntimeError::Other(format!("Invalid UTF-8: {}", e)),
        })
    }
}
