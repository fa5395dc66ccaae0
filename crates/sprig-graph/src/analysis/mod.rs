//! # Analysis Module
//!
//! Builds a bounded [`DependencyGraph`](crate::graph::DependencyGraph) for one
//! root file by reading files through the [`Runtime`](crate::runtime::Runtime)
//! abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Analyzer                             │
//! │     (long-lived: alias table, ignore rules, import cache)    │
//! └────────────────────┬────────────────────────────────────────┘
//!                      │  one per request
//!                      ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       GraphWalker                            │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐       │
//! │  │  Traversal   │  │    Parser    │  │  Validation  │       │
//! │  │ (bounded BFS)│→ │  (extract)   │→ │ (containment)│       │
//! │  └──────────────┘  └──────────────┘  └──────────────┘       │
//! └──────┬─────────────────────┬──────────────────────┬─────────┘
//!        ▼                     ▼                      ▼
//!   ModuleResolver      ExclusionFilter        TestFileFinder
//! ```
//!
//! ## Limits
//!
//! - **Depth**: `maxDepth` hops from the root, or unlimited
//! - **Node ceiling**: `AnalyzerOptions::max_modules` (graph marked truncated)
//! - **Deadline**: `AnalyzerOptions::timeout` (graph marked timed out)
//! - **File size**: files above `MAX_FILE_SIZE` are recorded as unreadable
//!
//! None of these turn into errors. The only failures of
//! [`Analyzer::analyze`] are configuration misuse, see [`AnalyzeError`].

use std::path::PathBuf;

use thiserror::Error;

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod control;
pub mod exclusion;
pub mod extractors;
pub mod resolver;
pub mod stats;
pub mod test_files;
pub mod walker;

#[cfg(test)]
pub(crate) mod tests;

pub use analyzer::Analyzer;
pub use cache::{CacheStats, ImportCache};
pub use config::{AnalyzerOptions, ResolveResult};
pub use control::{AnalysisControl, CancellationToken, Progress, ProgressCallback};
pub use exclusion::ExclusionFilter;
pub use extractors::{ImportExtractor, ScriptExtractor, extract_imports};
pub use resolver::ModuleResolver;
pub use stats::{GraphStatistics, compute_stats};
pub use test_files::TestFileFinder;

/// Error that can occur before an analysis starts.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The configuration failed schema validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] sprig_config::ConfigError),

    /// Smart selection is turned off (`enabled = false`).
    #[error("smart selection is disabled")]
    Disabled,

    /// The requested root lies outside the project root.
    #[error("root '{path}' is outside the project root '{project_root}'")]
    RootOutsideProject { path: PathBuf, project_root: PathBuf },

    /// The runtime could not provide a working directory.
    #[error("failed to determine project root: {0}")]
    Runtime(#[from] crate::runtime::RuntimeError),
}
