//! Selection bookkeeping across roots.
//!
//! [`SelectionOrchestrator`] turns per-root graphs into one active selection.
//! Each auto-selected file remembers which roots pulled it in; a file leaves
//! the selection only when the last of those roots is removed, so deselecting
//! one root never drops a dependency another active root still needs.
//!
//! [`SelectionSession`] pairs an orchestrator with an
//! [`Analyzer`](crate::analysis::Analyzer) and handles
//! supersession: a newer request for the same root cancels the older one and
//! the older result is discarded.

mod session;

pub use session::SelectionSession;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};

use crate::graph::{DependencyGraph, SelectionKind};

/// One root's reason for selecting a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub depth: usize,
    pub kind: SelectionKind,
}

/// Bookkeeping for one auto-selected file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    /// Contributing root → how it reached this file.
    pub contributions: BTreeMap<PathBuf, Contribution>,
}

impl SelectionRecord {
    /// Roots responsible for this file's inclusion.
    pub fn selected_by(&self) -> BTreeSet<PathBuf> {
        self.contributions.keys().cloned().collect()
    }

    /// Smallest depth across contributing roots.
    pub fn min_depth(&self) -> Option<usize> {
        self.contributions.values().map(|c| c.depth).min()
    }

    /// `AutoDependency` if any root depends on the file, else `AutoTest`.
    pub fn kind(&self) -> SelectionKind {
        if self
            .contributions
            .values()
            .any(|c| c.kind == SelectionKind::AutoDependency)
        {
            SelectionKind::AutoDependency
        } else {
            SelectionKind::AutoTest
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    fn metadata(&self) -> SelectionMetadata {
        SelectionMetadata {
            selection_kind: self.kind(),
            selected_by: self.selected_by(),
            depth: self.min_depth().unwrap_or(0),
        }
    }
}

/// Per-file metadata sent with a [`SelectionUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionMetadata {
    pub selection_kind: SelectionKind,
    pub selected_by: BTreeSet<PathBuf>,
    pub depth: usize,
}

/// Change to the active selection caused by one root operation.
///
/// `metadata` describes every file the operation touched that is still
/// selected afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionUpdate {
    pub added: BTreeSet<PathBuf>,
    pub removed: BTreeSet<PathBuf>,
    pub metadata: BTreeMap<PathBuf, SelectionMetadata>,
}

impl SelectionUpdate {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.metadata.is_empty()
    }
}

enum Withdrawal {
    Untracked,
    Remaining(SelectionMetadata),
    Emptied,
}

/// Tracks which roots auto-selected which files.
///
/// Records are independent per path and each one is updated under its own
/// map shard lock; there is no global lock. Operations on the same root are
/// serialized by holding that root's entry in `roots` while its records
/// change, always taken before any record lock. Manual selections are not
/// tracked here: the root of a graph is never given a record by its own
/// graph.
#[derive(Debug, Default)]
pub struct SelectionOrchestrator {
    records: DashMap<PathBuf, SelectionRecord>,
    /// Root → files it currently contributes to.
    roots: DashMap<PathBuf, BTreeSet<PathBuf>>,
}

impl SelectionOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `graph` as the contribution of `root`.
    ///
    /// Re-applying a root replaces its previous contribution: files it no
    /// longer reaches are withdrawn as if by [`remove_root`](Self::remove_root).
    pub fn apply_root(&self, root: &Path, graph: &DependencyGraph) -> SelectionUpdate {
        let contributions = contributions_of(root, graph);
        let current: BTreeSet<PathBuf> = contributions.keys().cloned().collect();
        let mut entry = self.roots.entry(root.to_path_buf()).or_default();
        let previous = std::mem::replace(&mut *entry, current.clone());

        let mut update = SelectionUpdate::default();
        for path in previous.difference(&current) {
            self.withdraw_into(path, root, &mut update);
        }

        for (path, contribution) in contributions {
            let mut record = self.records.entry(path.clone()).or_default();
            if record.is_empty() {
                update.added.insert(path.clone());
            }
            record
                .contributions
                .insert(root.to_path_buf(), contribution);
            update.metadata.insert(path, record.metadata());
        }
        drop(entry);

        tracing::debug!(
            root = %root.display(),
            added = update.added.len(),
            removed = update.removed.len(),
            "applied root"
        );
        update
    }

    /// Withdraw everything `root` contributed.
    pub fn remove_root(&self, root: &Path) -> SelectionUpdate {
        let mut update = SelectionUpdate::default();
        let Entry::Occupied(entry) = self.roots.entry(root.to_path_buf()) else {
            return update;
        };
        for path in entry.get() {
            self.withdraw_into(path, root, &mut update);
        }
        entry.remove();

        tracing::debug!(
            root = %root.display(),
            removed = update.removed.len(),
            "removed root"
        );
        update
    }

    fn withdraw_into(&self, path: &Path, root: &Path, update: &mut SelectionUpdate) {
        let outcome = match self.records.get_mut(path) {
            Some(mut record) => {
                record.contributions.remove(root);
                if record.is_empty() {
                    Withdrawal::Emptied
                } else {
                    Withdrawal::Remaining(record.metadata())
                }
            }
            None => Withdrawal::Untracked,
        };

        match outcome {
            Withdrawal::Emptied => {
                // Another root may have re-selected it in between.
                if self.records.remove_if(path, |_, r| r.is_empty()).is_some() {
                    update.removed.insert(path.to_path_buf());
                }
            }
            Withdrawal::Remaining(metadata) => {
                update.metadata.insert(path.to_path_buf(), metadata);
            }
            Withdrawal::Untracked => {}
        }
    }

    pub fn record(&self, path: &Path) -> Option<SelectionRecord> {
        self.records.get(path).map(|r| r.clone())
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.records.contains_key(path)
    }

    /// Every auto-selected file, sorted.
    pub fn selected(&self) -> BTreeSet<PathBuf> {
        self.records.iter().map(|r| r.key().clone()).collect()
    }

    /// Roots currently contributing, sorted.
    pub fn roots(&self) -> BTreeSet<PathBuf> {
        self.roots.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Files `graph` selects for `root`: its non-root, non-excluded nodes plus
/// their test files. A file that is both a dependency and a test is a dependency.
fn contributions_of(root: &Path, graph: &DependencyGraph) -> BTreeMap<PathBuf, Contribution> {
    let mut contributions: BTreeMap<PathBuf, Contribution> = BTreeMap::new();

    for node in graph.nodes.values() {
        if node.excluded {
            continue;
        }
        if node.path != root {
            contributions.insert(
                node.path.clone(),
                Contribution {
                    depth: node.depth,
                    kind: SelectionKind::AutoDependency,
                },
            );
        }
        for test in &node.test_files {
            if test == root || graph.nodes.contains_key(test) {
                continue;
            }
            contributions
                .entry(test.clone())
                .and_modify(|c| c.depth = c.depth.min(node.depth))
                .or_insert(Contribution {
                    depth: node.depth,
                    kind: SelectionKind::AutoTest,
                });
        }
    }

    contributions
}
