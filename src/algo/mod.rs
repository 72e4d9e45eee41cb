//! Graph algorithms module
//!
//! Algorithms are implemented in the `sideeffectnet-graph-algorithms` crate.
//! This module provides the integration/adapter layer.

use crate::graph::{NodeKind, SideEffectGraph};
use sideeffectnet_graph_algorithms::{GraphView, NodeId as AlgoNodeId};
use std::collections::HashMap;

// Re-export algorithms
pub use sideeffectnet_graph_algorithms::{betweenness_centrality, BetweennessConfig};

/// Build a GraphView from the graph for algorithm execution
///
/// `kind` restricts the view to one node population; edges are kept only
/// when both endpoints are in the view.
pub fn build_view(graph: &SideEffectGraph, kind: Option<NodeKind>) -> GraphView {
    // 1. Collect relevant nodes
    let nodes: Vec<AlgoNodeId> = graph
        .nodes()
        .filter(|node| kind.map_or(true, |k| node.kind() == k))
        .map(|node| node.id.as_u64())
        .collect();

    // 2. Build index mappings
    let mut index_to_node = Vec::with_capacity(nodes.len());
    let mut node_to_index = HashMap::with_capacity(nodes.len());

    for (idx, &node_id) in nodes.iter().enumerate() {
        index_to_node.push(node_id);
        node_to_index.insert(node_id, idx);
    }

    let node_count = index_to_node.len();

    // 3. Build adjacency lists
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); node_count];

    for edge in graph.edges() {
        let source = node_to_index.get(&edge.source.as_u64());
        let target = node_to_index.get(&edge.target.as_u64());
        if let (Some(&u_idx), Some(&v_idx)) = (source, target) {
            outgoing[u_idx].push(v_idx);
            incoming[v_idx].push(u_idx);
        }
    }

    // 4. Convert to CSR
    GraphView::from_adjacency_list(node_count, index_to_node, node_to_index, outgoing, incoming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_side_effect_graph;
    use crate::ingest::AdverseEventRecord;

    #[test]
    fn test_build_view_full_graph() {
        let records = vec![
            AdverseEventRecord::new("Aspirin", "Nausea", Some(1.0)),
            AdverseEventRecord::new("Ibuprofen", "Nausea", None),
        ];
        let graph = build_side_effect_graph(&records);
        let view = build_view(&graph, None);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.edge_count(), 2);

        let nausea = graph.side_effect_id("Nausea").unwrap().as_u64();
        assert_eq!(view.in_degree(view.node_to_index[&nausea]), 2);
    }

    #[test]
    fn test_build_view_single_kind_drops_edges() {
        let records = vec![AdverseEventRecord::new("Aspirin", "Nausea", Some(1.0))];
        let graph = build_side_effect_graph(&records);
        let view = build_view(&graph, Some(NodeKind::Drug));

        assert_eq!(view.node_count, 1);
        assert_eq!(view.edge_count(), 0);
    }
}
