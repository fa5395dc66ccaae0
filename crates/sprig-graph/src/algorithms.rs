//! Generic graph algorithms.
//!
//! [`BoundedBfs`] is a breadth-first frontier with a depth bound and a node
//! ceiling. It owns the queue and the visited set but never does I/O, so the
//! async walker can drive it step by step while fetching neighbours itself.
//! [`CycleDetector`] records back-edges as explicit node sequences.
//!
//! [`bounded_bfs`] glues both together for synchronous neighbour functions.

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

/// What happened to a node offered to the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Newly discovered and queued at the given depth.
    Enqueued(usize),
    /// Already discovered; carries its first-seen depth.
    AlreadySeen(usize),
    /// Would exceed the depth bound.
    TooDeep,
    /// The node ceiling is reached; the traversal is now truncated.
    Ceiling,
}

/// Breadth-first frontier with a depth bound and a node ceiling.
///
/// Every node is queued at most once, so each is processed at most once and
/// keeps the depth of its first discovery (its shortest distance from the start).
#[derive(Debug)]
pub struct BoundedBfs<N> {
    queue: VecDeque<(N, usize)>,
    depth_map: FxHashMap<N, usize>,
    visited: usize,
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
    truncated: bool,
}

impl<N: Clone + Eq + Hash> BoundedBfs<N> {
    /// `max_depth: None` means unbounded depth; `max_nodes: None` disables the ceiling.
    pub fn new(start: N, max_depth: Option<usize>, max_nodes: Option<usize>) -> Self {
        let mut depth_map = FxHashMap::default();
        depth_map.insert(start.clone(), 0);
        let mut queue = VecDeque::new();
        queue.push_back((start, 0));
        Self {
            queue,
            depth_map,
            visited: 0,
            max_depth,
            max_nodes,
            truncated: false,
        }
    }

    /// Pop the next node to process with its depth.
    pub fn pop(&mut self) -> Option<(N, usize)> {
        if self
            .max_nodes
            .is_some_and(|max| self.visited >= max && !self.queue.is_empty())
        {
            self.truncated = true;
            return None;
        }
        let item = self.queue.pop_front()?;
        self.visited += 1;
        Some(item)
    }

    /// Offer a neighbour discovered from a node at `parent_depth`.
    pub fn offer(&mut self, node: N, parent_depth: usize) -> Offer {
        if let Some(&depth) = self.depth_map.get(&node) {
            return Offer::AlreadySeen(depth);
        }
        let depth = parent_depth + 1;
        if self.max_depth.is_some_and(|max| depth > max) {
            return Offer::TooDeep;
        }
        if self.max_nodes.is_some_and(|max| self.depth_map.len() >= max) {
            self.truncated = true;
            return Offer::Ceiling;
        }
        self.depth_map.insert(node.clone(), depth);
        self.queue.push_back((node, depth));
        Offer::Enqueued(depth)
    }

    pub fn depth_of(&self, node: &N) -> Option<usize> {
        self.depth_map.get(node).copied()
    }

    pub fn is_seen(&self, node: &N) -> bool {
        self.depth_map.contains_key(node)
    }

    /// Nodes discovered but not yet processed.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Upper bound on recorded cycles; enumeration stops once it is reached.
pub const MAX_CYCLES: usize = 1_000;

/// Records import cycles from back-edges.
///
/// Feed every discovered edge to [`CycleDetector::add_edge`]. When an edge
/// targets an already-discovered node, call [`CycleDetector::close`]: every
/// simple path from the target back to the source over known edges is
/// recorded as a cycle `[to, .., from, to]`. Rotations of the same cycle are
/// stored once.
///
/// The last edge of any cycle to be discovered always points at an
/// already-discovered node, so closing every such edge finds every cycle.
#[derive(Debug)]
pub struct CycleDetector<N> {
    adjacency: FxHashMap<N, Vec<N>>,
    cycles: Vec<Vec<N>>,
    canonical: FxHashSet<Vec<N>>,
}

impl<N: Clone + Eq + Hash + Ord> Default for CycleDetector<N> {
    fn default() -> Self {
        Self {
            adjacency: FxHashMap::default(),
            cycles: Vec::new(),
            canonical: FxHashSet::default(),
        }
    }
}

impl<N: Clone + Eq + Hash + Ord> CycleDetector<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, from: N, to: N) {
        let targets = self.adjacency.entry(from).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    /// Check the back-edge `from -> to` and record the cycles it closes.
    ///
    /// Returns true when at least one new cycle was recorded.
    pub fn close(&mut self, from: &N, to: &N) -> bool {
        let mut recorded = false;
        for mut path in self.simple_paths(to, from) {
            if self.cycles.len() >= MAX_CYCLES {
                break;
            }
            path.push(to.clone());
            recorded |= self.record(path);
        }
        recorded
    }

    pub fn cycles(&self) -> &[Vec<N>] {
        &self.cycles
    }

    pub fn into_cycles(self) -> Vec<Vec<N>> {
        self.cycles
    }

    /// Every simple path `start ⇝ goal` over known edges, both ends included.
    fn simple_paths(&self, start: &N, goal: &N) -> Vec<Vec<N>> {
        if start == goal {
            return vec![vec![start.clone()]];
        }
        let budget = MAX_CYCLES.saturating_sub(self.cycles.len());
        let mut found = Vec::new();
        let mut path = vec![start.clone()];
        let mut on_path: FxHashSet<N> = FxHashSet::from_iter([start.clone()]);
        // Index of the next neighbour to try, one per node on `path`.
        let mut cursors = vec![0usize];

        while let Some(&index) = cursors.last() {
            if found.len() >= budget {
                break;
            }
            let current = &path[path.len() - 1];
            let Some(next) = self.adjacency.get(current).and_then(|t| t.get(index)) else {
                cursors.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(&done);
                }
                continue;
            };
            if let Some(top) = cursors.last_mut() {
                *top += 1;
            }
            if next == goal {
                let mut hit = path.clone();
                hit.push(next.clone());
                found.push(hit);
            } else if on_path.insert(next.clone()) {
                path.push(next.clone());
                cursors.push(0);
            }
        }
        found
    }

    fn record(&mut self, cycle: Vec<N>) -> bool {
        // Body without the closing repeat, rotated to start at its smallest node.
        let body = &cycle[..cycle.len() - 1];
        let pivot = body
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map_or(0, |(i, _)| i);
        let mut key = body[pivot..].to_vec();
        key.extend_from_slice(&body[..pivot]);

        if !self.canonical.insert(key) {
            return false;
        }
        self.cycles.push(cycle);
        true
    }
}

/// Result of [`bounded_bfs`].
#[derive(Debug, Clone)]
pub struct BfsOutcome<N> {
    /// Processed nodes with their depth, in visit order.
    pub order: Vec<(N, usize)>,
    /// Edges between processed or queued nodes.
    pub edges: Vec<(N, N)>,
    pub cycles: Vec<Vec<N>>,
    pub truncated: bool,
}

/// Bounded breadth-first traversal over a synchronous neighbour function.
pub fn bounded_bfs<N, F, I>(
    start: N,
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
    mut neighbors: F,
) -> BfsOutcome<N>
where
    N: Clone + Eq + Hash + Ord,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut bfs = BoundedBfs::new(start, max_depth, max_nodes);
    let mut cycles = CycleDetector::new();
    let mut order = Vec::new();
    let mut edges = Vec::new();

    while let Some((node, depth)) = bfs.pop() {
        for next in neighbors(&node) {
            match bfs.offer(next.clone(), depth) {
                Offer::Enqueued(_) => {
                    cycles.add_edge(node.clone(), next.clone());
                    edges.push((node.clone(), next));
                }
                Offer::AlreadySeen(_) => {
                    cycles.add_edge(node.clone(), next.clone());
                    cycles.close(&node, &next);
                    edges.push((node.clone(), next));
                }
                Offer::TooDeep | Offer::Ceiling => {}
            }
        }
        order.push((node, depth));
    }

    BfsOutcome {
        order,
        edges,
        cycles: cycles.into_cycles(),
        truncated: bfs.is_truncated(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(edges: &[(u32, u32)]) -> impl FnMut(&u32) -> Vec<u32> + '_ {
        move |n| {
            edges
                .iter()
                .filter(|(from, _)| from == n)
                .map(|(_, to)| *to)
                .collect()
        }
    }

    #[test]
    fn depth_bound_stops_expansion() {
        let chain = [(1, 2), (2, 3), (3, 4), (4, 5)];
        let outcome = bounded_bfs(1, Some(2), None, adjacency(&chain));
        let visited: Vec<_> = outcome.order.iter().map(|(n, _)| *n).collect();
        assert_eq!(visited, vec![1, 2, 3]);
        assert!(!outcome.truncated);
    }

    #[test]
    fn zero_depth_yields_only_the_start() {
        let outcome = bounded_bfs(1, Some(0), None, adjacency(&[(1, 2)]));
        assert_eq!(outcome.order, vec![(1, 0)]);
        assert!(outcome.edges.is_empty());
    }

    #[test]
    fn diamond_visits_shared_node_once_at_shortest_depth() {
        let diamond = [(1, 2), (1, 3), (2, 4), (3, 4)];
        let outcome = bounded_bfs(1, None, None, adjacency(&diamond));
        assert_eq!(outcome.order.len(), 4);
        assert_eq!(outcome.order.iter().find(|(n, _)| *n == 4), Some(&(4, 2)));
        assert!(outcome.cycles.is_empty());
    }

    #[test]
    fn two_node_cycle_is_recorded_from_the_back_edge() {
        let outcome = bounded_bfs(1, None, None, adjacency(&[(1, 2), (2, 1)]));
        assert_eq!(outcome.order.len(), 2);
        assert_eq!(outcome.cycles, vec![vec![1, 2, 1]]);
    }

    #[test]
    fn self_import_is_a_cycle() {
        let outcome = bounded_bfs(1, None, None, adjacency(&[(1, 1)]));
        assert_eq!(outcome.cycles, vec![vec![1, 1]]);
    }

    #[test]
    fn longer_cycle_keeps_every_member() {
        let ring = [(1, 2), (2, 3), (3, 1)];
        let outcome = bounded_bfs(1, None, None, adjacency(&ring));
        assert_eq!(outcome.cycles, vec![vec![1, 2, 3, 1]]);
    }

    #[test]
    fn cycles_sharing_a_back_edge_are_all_recorded() {
        let graph = [(1, 2), (1, 3), (2, 4), (3, 4), (4, 1)];
        let outcome = bounded_bfs(1, None, None, adjacency(&graph));
        assert_eq!(outcome.cycles, vec![vec![1, 2, 4, 1], vec![1, 3, 4, 1]]);
    }

    #[test]
    fn nested_cycles_through_one_node() {
        // 2 -> 3 -> 2 and 2 -> 3 -> 4 -> 2, both closed at 2.
        let graph = [(1, 2), (2, 3), (3, 2), (3, 4), (4, 2)];
        let outcome = bounded_bfs(1, None, None, adjacency(&graph));
        assert_eq!(outcome.cycles, vec![vec![2, 3, 2], vec![2, 3, 4, 2]]);
    }

    #[test]
    fn cross_edge_without_path_back_is_not_a_cycle() {
        let diamond = [(1, 2), (1, 3), (3, 2)];
        let outcome = bounded_bfs(1, None, None, adjacency(&diamond));
        assert!(outcome.cycles.is_empty());
    }

    #[test]
    fn node_ceiling_truncates() {
        let fan: Vec<(u32, u32)> = (2..20).map(|n| (1, n)).collect();
        let outcome = bounded_bfs(1, None, Some(5), adjacency(&fan));
        assert_eq!(outcome.order.len(), 5);
        assert!(outcome.truncated);
    }

    #[test]
    fn ceiling_equal_to_graph_size_is_not_truncation() {
        let outcome = bounded_bfs(1, None, Some(3), adjacency(&[(1, 2), (2, 3)]));
        assert_eq!(outcome.order.len(), 3);
        assert!(!outcome.truncated);
    }

    #[test]
    fn rotations_are_stored_once() {
        let mut detector = CycleDetector::new();
        detector.add_edge(1, 2);
        detector.add_edge(2, 1);
        assert!(detector.close(&2, &1));
        assert!(!detector.close(&1, &2));
        assert_eq!(detector.cycles().len(), 1);
    }
}
