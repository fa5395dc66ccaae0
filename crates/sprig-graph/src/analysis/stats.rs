use std::fmt;

use serde::Serialize;

use crate::graph::{DependencyGraph, GraphStatus};

/// Summary counts for one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub nodes: usize,
    pub edges: usize,
    pub cycles: usize,
    pub max_depth: usize,
    pub excluded: usize,
    pub test_files: usize,
    pub unreadable: usize,
    pub status: GraphStatus,
}

pub fn compute_stats(graph: &DependencyGraph) -> GraphStatistics {
    let nodes = graph.nodes.values();
    GraphStatistics {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        cycles: graph.cycles.len(),
        max_depth: nodes.clone().map(|n| n.depth).max().unwrap_or(0),
        excluded: graph.excluded.len(),
        test_files: nodes.clone().map(|n| n.test_files.len()).sum(),
        unreadable: nodes.filter(|n| n.error.is_some()).count(),
        status: graph.status,
    }
}

impl fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files, {} edges, depth {}, {} cycles, {} excluded",
            self.nodes, self.edges, self.max_depth, self.cycles, self.excluded
        )?;
        if self.test_files > 0 {
            write!(f, ", {} test files", self.test_files)?;
        }
        if self.unreadable > 0 {
            write!(f, ", {} unreadable", self.unreadable)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyNode;
    use std::path::PathBuf;

    #[test]
    fn counts_nodes_edges_and_depth() {
        let a = PathBuf::from("/p/a.ts");
        let b = PathBuf::from("/p/b.ts");
        let mut graph = DependencyGraph::new(a.clone());
        graph.add_node(DependencyNode::new(a.clone(), 0));
        let mut node = DependencyNode::new(b.clone(), 1);
        node.error = Some("denied".into());
        graph.add_node(node);
        graph.add_edge(a, b);

        let stats = compute_stats(&graph);
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.unreadable, 1);
        assert_eq!(
            stats.to_string(),
            "2 files, 1 edges, depth 1, 0 cycles, 0 excluded, 1 unreadable"
        );
    }
}
