//! Module resolution for dependency analysis.
//!
//! Implements a Node.js-style lookup over the [`Runtime`] without a bundler.

mod algorithm;
mod aliases;
mod extensions;

pub use algorithm::{is_bare, resolve_local, resolve_with_alias};
pub use aliases::{ALIAS_CONFIG_FILES, AliasTable, load_alias_table};
pub use extensions::{KNOWN_EXTENSIONS, resolve_candidate, try_extensions, try_index_files};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::analysis::config::{AnalyzerOptions, ResolveResult};
use crate::runtime::{Runtime, RuntimeResult};

/// Module resolver owned by one long-lived analyzer.
///
/// The alias table is loaded on first use and cached until [`reset`]. Two
/// analyses racing on the first load may both read the config file; the
/// second write simply replaces an identical table.
///
/// [`reset`]: ModuleResolver::reset
#[derive(Debug)]
pub struct ModuleResolver {
    project_root: PathBuf,
    explicit: AliasTable,
    load_tsconfig: bool,
    aliases: RwLock<Option<Arc<AliasTable>>>,
}

impl ModuleResolver {
    pub fn new(project_root: impl Into<PathBuf>, options: &AnalyzerOptions) -> Self {
        let project_root = project_root.into();
        let explicit = AliasTable::from_map(project_root.clone(), &options.path_aliases);
        Self {
            project_root,
            explicit,
            load_tsconfig: options.load_tsconfig_aliases,
            aliases: RwLock::new(None),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Resolve a module specifier from a given file.
    ///
    /// 1. Try path aliases (explicit ones, then `tsconfig.json`/`jsconfig.json`)
    /// 2. Classify remaining bare specifiers as external, without I/O
    /// 3. Resolve relative to the importing file (`/x` relative to the project root)
    /// 4. For each candidate: suffix as written, appended suffixes, then index files
    ///
    /// Never fails: runtime errors are logged and reported as `Unresolved`.
    pub async fn resolve(
        &self,
        specifier: &str,
        from: &Path,
        runtime: &dyn Runtime,
    ) -> ResolveResult {
        match self.try_resolve(specifier, from, runtime).await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(
                    specifier,
                    from = %from.display(),
                    error = %e,
                    "resolution failed"
                );
                ResolveResult::Unresolved(specifier.to_string())
            }
        }
    }

    async fn try_resolve(
        &self,
        specifier: &str,
        from: &Path,
        runtime: &dyn Runtime,
    ) -> RuntimeResult<ResolveResult> {
        let aliases = self.aliases(runtime).await;
        if let Some(resolved) = resolve_with_alias(specifier, &aliases, runtime).await? {
            return Ok(resolved);
        }

        if is_bare(specifier) {
            return Ok(ResolveResult::External(specifier.to_string()));
        }

        resolve_local(specifier, from, &self.project_root, runtime).await
    }

    /// The alias table, loading it on first use.
    pub async fn aliases(&self, runtime: &dyn Runtime) -> Arc<AliasTable> {
        if let Some(table) = self.aliases.read().as_ref() {
            return Arc::clone(table);
        }

        let mut table = self.explicit.clone();
        if self.load_tsconfig {
            if let Some(loaded) = load_alias_table(&self.project_root, runtime).await {
                table.extend(loaded);
            }
        }

        let table = Arc::new(table);
        *self.aliases.write() = Some(Arc::clone(&table));
        table
    }

    /// Drop the cached alias table; the next resolution reloads it.
    pub fn reset(&self) {
        *self.aliases.write() = None;
    }
}
