//! Dependency graph produced by one analysis.
//!
//! Nodes are keyed by absolute path and edges are adjacency maps over the same
//! keys, so import cycles are plain data (`[A, B, A]`) rather than pointer loops.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Why a file ended up in (or next to) a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionKind {
    Manual,
    AutoDependency,
    AutoTest,
}

/// Why a resolved path was dropped from the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExcludeReason {
    /// Installed by a package manager (`node_modules` and friends).
    ExternallyManaged,
    /// Matched the project's ignore file.
    IgnoreRule,
    /// Matched a user exclusion pattern.
    UserPattern,
}

impl std::fmt::Display for ExcludeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExcludeReason::ExternallyManaged => "externally-managed",
            ExcludeReason::IgnoreRule => "ignore-rule",
            ExcludeReason::UserPattern => "user-pattern",
        })
    }
}

/// How a traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphStatus {
    #[default]
    Complete,
    /// The node-count ceiling was reached.
    Truncated,
    /// The wall-clock budget ran out.
    TimedOut,
    /// A newer request superseded this one.
    Cancelled,
}

impl GraphStatus {
    pub fn is_partial(self) -> bool {
        !matches!(self, GraphStatus::Complete)
    }
}

/// One visited file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub path: PathBuf,
    /// Specifiers in source order, including ones that did not resolve.
    pub raw_imports: Vec<String>,
    /// Resolved, non-excluded targets.
    pub resolved_imports: BTreeSet<PathBuf>,
    pub test_files: BTreeSet<PathBuf>,
    /// Hops from the root; fixed at first visit.
    pub depth: usize,
    pub selection_kind: SelectionKind,
    pub excluded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_reason: Option<ExcludeReason>,
    /// Set when the file could not be read; derived fields are then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyNode {
    pub fn new(path: PathBuf, depth: usize) -> Self {
        let selection_kind = if depth == 0 {
            SelectionKind::Manual
        } else {
            SelectionKind::AutoDependency
        };
        Self {
            path,
            raw_imports: Vec::new(),
            resolved_imports: BTreeSet::new(),
            test_files: BTreeSet::new(),
            depth,
            selection_kind,
            excluded: false,
            exclude_reason: None,
            error: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// Traversal result for one root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    pub nodes: BTreeMap<PathBuf, DependencyNode>,
    pub edges: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    /// Inverse of `edges`. Never consulted by selection.
    pub reverse_edges: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    pub roots: BTreeSet<PathBuf>,
    pub cycles: Vec<Vec<PathBuf>>,
    /// Resolved paths that were dropped, with the reason.
    pub excluded: BTreeMap<PathBuf, ExcludeReason>,
    pub status: GraphStatus,
    pub warnings: Vec<String>,
}

impl DependencyGraph {
    pub fn new(root: PathBuf) -> Self {
        let mut roots = BTreeSet::new();
        roots.insert(root);
        Self {
            roots,
            ..Self::default()
        }
    }

    /// The originating root (graphs from `analyze` have exactly one).
    pub fn root(&self) -> Option<&Path> {
        self.roots.iter().next().map(PathBuf::as_path)
    }

    pub fn node(&self, path: &Path) -> Option<&DependencyNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn add_node(&mut self, node: DependencyNode) {
        self.nodes.entry(node.path.clone()).or_insert(node);
    }

    pub fn add_edge(&mut self, from: PathBuf, to: PathBuf) {
        self.edges.entry(from).or_default().insert(to);
    }

    /// Files `path` imports directly.
    pub fn dependencies(&self, path: &Path) -> impl Iterator<Item = &PathBuf> {
        self.edges.get(path).into_iter().flatten()
    }

    /// Files that import `path` directly. Read-only view over `reverse_edges`.
    pub fn dependents(&self, path: &Path) -> impl Iterator<Item = &PathBuf> {
        self.reverse_edges.get(path).into_iter().flatten()
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        self.status.is_partial()
    }

    /// Nodes grouped by depth, shallowest first.
    pub fn nodes_by_depth(&self) -> BTreeMap<usize, Vec<&DependencyNode>> {
        let mut by_depth: BTreeMap<usize, Vec<&DependencyNode>> = BTreeMap::new();
        for node in self.nodes.values() {
            by_depth.entry(node.depth).or_default().push(node);
        }
        by_depth
    }

    /// Drop edges whose target never became a node, then rebuild `reverse_edges`.
    ///
    /// Targets can be missing when traversal stopped before visiting them
    /// (timeout, cancellation, node ceiling) or when they lay past the depth bound.
    pub(crate) fn finalize(&mut self) {
        let nodes = &self.nodes;
        for targets in self.edges.values_mut() {
            targets.retain(|t| nodes.contains_key(t));
        }
        self.edges
            .retain(|from, targets| nodes.contains_key(from) && !targets.is_empty());
        self.cycles
            .retain(|cycle| cycle.iter().all(|p| nodes.contains_key(p)));

        self.reverse_edges.clear();
        for (from, targets) in &self.edges {
            for to in targets {
                self.reverse_edges
                    .entry(to.clone())
                    .or_default()
                    .insert(from.clone());
            }
        }
    }
}
