//! Graph walker for dependency traversal.
//!
//! Performs bounded BFS from one root, reading each file once, and builds the
//! [`DependencyGraph`] handed back to the analyzer.

mod parser;
mod traversal;
mod validation;

pub use parser::ModuleParser;
pub use validation::{PathTraversalError, normalize_and_validate_path, validate_path_within_root};

use std::path::PathBuf;
use std::time::Duration;

use crate::analysis::control::AnalysisControl;
use crate::analysis::exclusion::ExclusionFilter;
use crate::analysis::resolver::ModuleResolver;
use crate::analysis::test_files::TestFileFinder;
use crate::graph::DependencyGraph;
use crate::runtime::Runtime;

/// Error that can occur while reading one file.
///
/// These never abort a traversal: the file becomes a node with its
/// `error` set and the walk moves on.
#[derive(Debug, thiserror::Error)]
pub enum WalkerError {
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: crate::runtime::RuntimeError,
    },

    #[error("File too large: {path} is {size} bytes (max: {max} bytes)")]
    FileTooLarge { path: PathBuf, size: usize, max: usize },
}

/// Everything one traversal needs, borrowed from the analyzer.
#[derive(Debug)]
pub struct GraphWalker<'a> {
    pub runtime: &'a dyn Runtime,
    pub resolver: &'a ModuleResolver,
    pub parser: ModuleParser<'a>,
    pub filter: &'a ExclusionFilter,
    /// Test-file discovery, `None` when tests are not included.
    pub tests: Option<&'a TestFileFinder>,
    pub control: &'a AnalysisControl,
    pub max_modules: Option<usize>,
    pub timeout: Option<Duration>,
}

impl GraphWalker<'_> {
    /// Walk the dependency graph from `root` up to `max_depth` hops
    /// (`None` for unbounded).
    pub async fn walk(&self, root: PathBuf, max_depth: Option<usize>) -> DependencyGraph {
        traversal::Traversal::new(self).traverse(root, max_depth).await
    }
}
