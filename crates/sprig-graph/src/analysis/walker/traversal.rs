//! BFS traversal logic for graph walking.
//!
//! Expands the graph from one root, level by level, until the depth bound,
//! the node ceiling, the deadline or a cancellation stops it. Whatever was
//! visited by then is returned; nothing here fails the whole analysis.

use std::path::{Path, PathBuf};

use tokio::time::Instant;

use crate::algorithms::{BoundedBfs, CycleDetector, Offer};
use crate::analysis::config::{PROGRESS_INTERVAL, ResolveResult};
use crate::analysis::control::Progress;
use crate::analysis::test_files::DirListings;
use crate::graph::{DependencyGraph, DependencyNode, GraphStatus};

use super::GraphWalker;
use super::validation::normalize_and_validate_path;

struct WalkState {
    bfs: BoundedBfs<PathBuf>,
    cycles: CycleDetector<PathBuf>,
    graph: DependencyGraph,
    listings: DirListings,
}

/// BFS traversal state and logic.
pub struct Traversal<'w, 'a> {
    walker: &'w GraphWalker<'a>,
}

impl<'w, 'a> Traversal<'w, 'a> {
    pub fn new(walker: &'w GraphWalker<'a>) -> Self {
        Self { walker }
    }

    /// Walk from `root`, which must already be normalized.
    pub async fn traverse(&self, root: PathBuf, max_depth: Option<usize>) -> DependencyGraph {
        let walker = self.walker;
        let mut state = WalkState {
            bfs: BoundedBfs::new(root.clone(), max_depth, walker.max_modules),
            cycles: CycleDetector::new(),
            graph: DependencyGraph::new(root.clone()),
            listings: DirListings::new(),
        };

        if let Some(reason) = walker.filter.should_exclude(&root) {
            tracing::debug!(root = %root.display(), %reason, "root is excluded, not expanding");
            let mut node = DependencyNode::new(root.clone(), 0);
            node.excluded = true;
            node.exclude_reason = Some(reason);
            state.graph.add_node(node);
            return state.graph;
        }

        let started = Instant::now();
        let deadline = walker.timeout.map(|t| started + t);
        let mut last_progress = started;
        let mut status = GraphStatus::Complete;

        while let Some((path, depth)) = state.bfs.pop() {
            if walker.control.is_cancelled() {
                tracing::debug!(visited = state.graph.node_count(), "traversal cancelled");
                status = GraphStatus::Cancelled;
                break;
            }

            let now = Instant::now();
            if deadline.is_some_and(|deadline| now >= deadline) {
                tracing::warn!(visited = state.graph.node_count(), "analysis timed out");
                status = GraphStatus::TimedOut;
                break;
            }

            if now.duration_since(last_progress) >= PROGRESS_INTERVAL {
                walker.control.report(Progress {
                    visited: state.graph.node_count(),
                    queued: state.bfs.queued(),
                });
                last_progress = now;
            }

            let visit = self.visit(&path, depth, &mut state);
            let node = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, visit).await.ok(),
                None => Some(visit.await),
            };
            match node {
                Some(node) => state.graph.add_node(node),
                None => {
                    tracing::warn!(
                        path = %path.display(),
                        visited = state.graph.node_count(),
                        "analysis timed out"
                    );
                    status = GraphStatus::TimedOut;
                    break;
                }
            }
        }

        let mut graph = state.graph;
        if status == GraphStatus::Complete && state.bfs.is_truncated() {
            tracing::warn!(max = ?walker.max_modules, "node ceiling reached, graph truncated");
            status = GraphStatus::Truncated;
        }
        match status {
            GraphStatus::Complete => {}
            GraphStatus::Truncated => graph.warnings.push(format!(
                "stopped after {} files: node ceiling reached",
                graph.node_count()
            )),
            GraphStatus::TimedOut => graph.warnings.push(format!(
                "stopped after {} files: time budget exhausted",
                graph.node_count()
            )),
            GraphStatus::Cancelled => graph.warnings.push("analysis was cancelled".to_string()),
        }

        // Root is always present, even when stopped before it was read.
        if !graph.contains(&root) {
            graph.add_node(DependencyNode::new(root, 0));
        }

        graph.status = status;
        graph.cycles = state.cycles.into_cycles();
        graph.finalize();

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            cycles = graph.cycles.len(),
            status = ?graph.status,
            "traversal finished"
        );
        graph
    }

    /// Read one file, resolve its imports and offer them to the queue.
    async fn visit(&self, path: &Path, depth: usize, state: &mut WalkState) -> DependencyNode {
        let walker = self.walker;
        let mut node = DependencyNode::new(path.to_path_buf(), depth);

        let imports = match walker.parser.imports(path, walker.runtime).await {
            Ok(imports) => imports,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                state.graph.warnings.push(e.to_string());
                node.error = Some(e.to_string());
                return node;
            }
        };

        node.raw_imports = imports.iter().map(|i| i.source.clone()).collect();

        for import in imports.iter() {
            let resolved = match walker
                .resolver
                .resolve(&import.source, path, walker.runtime)
                .await
            {
                ResolveResult::Local(resolved) => resolved,
                ResolveResult::External(_) => continue,
                ResolveResult::Unresolved(specifier) => {
                    tracing::debug!(
                        from = %path.display(),
                        specifier = %specifier,
                        line = import.line,
                        "unresolved import"
                    );
                    continue;
                }
            };

            let project_root = walker.resolver.project_root();
            let target = match normalize_and_validate_path(&resolved, project_root) {
                Ok(target) => target,
                Err(e) => {
                    tracing::debug!(error = %e, "import resolves outside the project root");
                    continue;
                }
            };

            if let Some(reason) = walker.filter.should_exclude(&target) {
                tracing::trace!(path = %target.display(), %reason, "excluded");
                state.graph.excluded.insert(target, reason);
                continue;
            }

            if !node.resolved_imports.insert(target.clone()) {
                continue;
            }

            match state.bfs.offer(target.clone(), depth) {
                Offer::Enqueued(_) => {
                    state.cycles.add_edge(path.to_path_buf(), target.clone());
                    state.graph.add_edge(path.to_path_buf(), target);
                }
                Offer::AlreadySeen(_) => {
                    state.cycles.add_edge(path.to_path_buf(), target.clone());
                    if state.cycles.close(&path.to_path_buf(), &target) {
                        tracing::debug!(
                            from = %path.display(),
                            to = %target.display(),
                            "import cycle"
                        );
                    }
                    state.graph.add_edge(path.to_path_buf(), target);
                }
                Offer::TooDeep | Offer::Ceiling => {}
            }
        }

        if let Some(finder) = walker.tests {
            node.test_files = finder
                .find(path, walker.runtime, &mut state.listings)
                .await
                .into_iter()
                .filter(|test| walker.filter.should_exclude(test).is_none())
                .collect();
        }

        node
    }
}
