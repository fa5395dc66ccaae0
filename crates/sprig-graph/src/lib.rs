//! # sprig-graph
//!
//! Bounded dependency graphs for JavaScript/TypeScript files, built for
//! "smart selection": pick a file, and the files it imports (and optionally
//! their tests) are selected with it.
//!
//! ## Overview
//!
//! - [`extract_imports`]: regex-based scan of `import`, `export ... from`,
//!   `require()` and `import()` forms, comment-aware
//! - [`ModuleResolver`]: relative, root-anchored and aliased specifiers,
//!   suffix probing, index files; bare specifiers are external
//! - [`ExclusionFilter`]: package-manager directories, `.gitignore`, user globs
//! - [`algorithms`]: bounded breadth-first traversal and cycle detection
//! - [`Analyzer`]: drives the traversal and returns a [`DependencyGraph`]
//! - [`SelectionOrchestrator`]: merges graphs of several roots into one selection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sprig_config::SmartSelectConfig;
//! use sprig_graph::{Analyzer, AnalyzerOptions, SelectionOrchestrator};
//!
//! # async fn example() -> Result<(), sprig_graph::AnalyzeError> {
//! let analyzer = Analyzer::native(AnalyzerOptions::default().with_project_root("/work/app"))?;
//! let config = SmartSelectConfig::default().with_enabled(true).with_tests(true);
//!
//! let graph = analyzer.analyze("src/main.ts", &config).await?;
//! let selection = SelectionOrchestrator::new();
//! let update = selection.apply_root(graph.root().unwrap(), &graph);
//! println!("selected {} files", update.added.len());
//! # Ok(())
//! # }
//! ```
//!
//! All file access goes through the [`Runtime`] trait, so hosts can supply
//! their own file storage.

pub mod algorithms;
pub mod analysis;
pub mod graph;
pub mod import;
pub mod runtime;
pub mod selection;

#[cfg(test)]
mod tests;

pub use algorithms::{BoundedBfs, CycleDetector, Offer, bounded_bfs};
pub use analysis::{
    AnalysisControl, AnalyzeError, Analyzer, AnalyzerOptions, CacheStats, CancellationToken,
    ExclusionFilter, GraphStatistics, ImportExtractor, ModuleResolver, Progress, ResolveResult,
    ScriptExtractor, TestFileFinder, compute_stats, extract_imports,
};
pub use graph::{DependencyGraph, DependencyNode, ExcludeReason, GraphStatus, SelectionKind};
pub use import::{ImportKind, ImportStatement};
pub use selection::{
    SelectionMetadata, SelectionOrchestrator, SelectionRecord, SelectionSession, SelectionUpdate,
};

// Re-export runtime types
pub use runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

#[cfg(not(target_family = "wasm"))]
pub use runtime::native::NativeRuntime;

// Test utilities (available in test builds)
#[cfg(any(test, feature = "test-utils"))]
pub use runtime::test_utils;
