//! Long-lived dependency analyzer.
//!
//! One [`Analyzer`] is created per project and reused for every analysis
//! request. It owns the caches that outlive a single traversal (alias table,
//! ignore rules, per-file imports); everything else (queue, visited set,
//! partial graph) is private to each call, so concurrent analyses for
//! different roots never share mutable state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use path_clean::PathClean;
use tracing::Instrument;

use sprig_config::{ConfigValidator, SchemaValidator, SmartSelectConfig};

use super::AnalyzeError;
use super::cache::{CacheStats, ImportCache};
use super::config::AnalyzerOptions;
use super::control::AnalysisControl;
use super::exclusion::{ExclusionFilter, IgnoreCache};
use super::extractors::{ImportExtractor, ScriptExtractor};
use super::resolver::ModuleResolver;
use super::test_files::TestFileFinder;
use super::walker::{GraphWalker, ModuleParser, normalize_and_validate_path};
use crate::graph::DependencyGraph;
use crate::runtime::Runtime;

/// Dependency analyzer for one project.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sprig_config::SmartSelectConfig;
/// use sprig_graph::{Analyzer, AnalyzerOptions, NativeRuntime};
///
/// # async fn example() -> Result<(), sprig_graph::AnalyzeError> {
/// let analyzer = Analyzer::new(
///     Arc::new(NativeRuntime),
///     AnalyzerOptions::default().with_project_root("/work/app"),
/// )?;
///
/// let config = SmartSelectConfig::default().with_enabled(true).with_max_depth(2);
/// let graph = analyzer.analyze("src/index.ts", &config).await?;
/// println!("{} files, {} cycles", graph.node_count(), graph.cycles.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Analyzer {
    runtime: Arc<dyn Runtime>,
    options: AnalyzerOptions,
    project_root: PathBuf,
    resolver: ModuleResolver,
    extractor: Box<dyn ImportExtractor>,
    imports: ImportCache,
    ignore: IgnoreCache,
}

impl Analyzer {
    /// Create an analyzer. The project root falls back to the runtime's cwd.
    pub fn new(runtime: Arc<dyn Runtime>, options: AnalyzerOptions) -> Result<Self, AnalyzeError> {
        let project_root = match &options.project_root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => runtime.get_cwd()?.join(root),
            None => runtime.get_cwd()?,
        };
        let project_root = project_root.clean();
        let resolver = ModuleResolver::new(project_root.clone(), &options);

        Ok(Self {
            runtime,
            options,
            project_root,
            resolver,
            extractor: Box::new(ScriptExtractor),
            imports: ImportCache::new(),
            ignore: IgnoreCache::new(),
        })
    }

    /// Analyzer over the native filesystem.
    #[cfg(not(target_family = "wasm"))]
    pub fn native(options: AnalyzerOptions) -> Result<Self, AnalyzeError> {
        Self::new(Arc::new(crate::runtime::native::NativeRuntime), options)
    }

    /// Replace the import extraction strategy.
    pub fn with_extractor(mut self, extractor: impl ImportExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self.imports.clear();
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    /// Analyze `root` with default controls (no cancellation, no progress).
    pub async fn analyze(
        &self,
        root: impl AsRef<Path>,
        config: &SmartSelectConfig,
    ) -> Result<DependencyGraph, AnalyzeError> {
        self.analyze_with(root, config, &AnalysisControl::default())
            .await
    }

    /// Analyze `root`, honouring `control`'s cancellation token and progress callback.
    ///
    /// Only configuration misuse is an error. Unreadable files, unresolved
    /// imports, the node ceiling, the deadline and cancellation all produce a
    /// graph; check [`DependencyGraph::status`] and `warnings`.
    pub async fn analyze_with(
        &self,
        root: impl AsRef<Path>,
        config: &SmartSelectConfig,
        control: &AnalysisControl,
    ) -> Result<DependencyGraph, AnalyzeError> {
        SchemaValidator.validate(config)?;
        if !config.enabled {
            return Err(AnalyzeError::Disabled);
        }

        let root = normalize_and_validate_path(root.as_ref(), &self.project_root).map_err(|e| {
            AnalyzeError::RootOutsideProject {
                path: e.path,
                project_root: e.root,
            }
        })?;

        let span = tracing::info_span!("analyze", root = %root.display());
        self.run(root, config, control).instrument(span).await
    }

    async fn run(
        &self,
        root: PathBuf,
        config: &SmartSelectConfig,
        control: &AnalysisControl,
    ) -> Result<DependencyGraph, AnalyzeError> {
        let started = Instant::now();
        tracing::info!(
            max_depth = %config.max_depth,
            include_tests = config.include_tests,
            "analysis started"
        );

        let runtime = self.runtime.as_ref();
        let ignore = if config.respect_ignore_file {
            Some(self.ignore.load(&self.project_root, runtime).await)
        } else {
            None
        };
        let filter = ExclusionFilter::new(&self.project_root, config, ignore);
        let tests = config
            .include_tests
            .then(|| TestFileFinder::new(&self.project_root, &config.test_file_patterns));

        let walker = GraphWalker {
            runtime,
            resolver: &self.resolver,
            parser: ModuleParser::new(
                self.extractor.as_ref(),
                &self.imports,
                &self.options.source_extensions,
                self.options.max_file_size,
            ),
            filter: &filter,
            tests: tests.as_ref(),
            control,
            max_modules: self.options.max_modules,
            timeout: self.options.timeout,
        };
        let mut graph = walker.walk(root, config.max_depth.as_usize()).await;

        let mut warnings = filter.warnings().to_vec();
        if let Some(tests) = &tests {
            warnings.extend_from_slice(tests.warnings());
        }
        warnings.append(&mut graph.warnings);
        graph.warnings = warnings;

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            cycles = graph.cycles.len(),
            status = ?graph.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis finished"
        );
        Ok(graph)
    }

    /// Drop every cache: alias table, ignore rules, per-file imports.
    pub fn reset_caches(&self) {
        self.resolver.reset();
        self.ignore.clear();
        self.imports.clear();
        tracing::debug!("analyzer caches reset");
    }

    /// Forget the cached imports of one file.
    pub fn invalidate(&self, path: &Path) {
        self.imports.invalidate(path);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.imports.stats()
    }
}
