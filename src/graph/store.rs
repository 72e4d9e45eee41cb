//! In-memory drug/side-effect graph storage
//!
//! Nodes and edges live in insertion-ordered arenas indexed by their dense
//! ids. A key index resolves `NodeKey`s and a pair index keeps at most one
//! edge per (drug, side effect) pair.

use super::edge::Edge;
use super::node::Node;
use super::types::{EdgeId, NodeId, NodeKey, NodeKind};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Invalid edge: source node {0} is not a drug")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} is not a side effect")]
    InvalidEdgeTarget(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Statistics about the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStatistics {
    pub drug_count: usize,
    pub side_effect_count: usize,
    pub edge_count: usize,
    pub edges_with_frequency: usize,
}

/// Directed bipartite graph of drugs and the side effects they cause
#[derive(Debug, Default, Clone)]
pub struct SideEffectGraph {
    /// Node arena, indexed by NodeId
    nodes: Vec<Node>,

    /// Edge arena, indexed by EdgeId
    edges: Vec<Edge>,

    /// Identity index
    key_index: FxHashMap<NodeKey, NodeId>,

    /// (source, target) -> edge
    pair_index: FxHashMap<(NodeId, NodeId), EdgeId>,

    /// Outgoing edges for each node (adjacency list)
    outgoing: Vec<Vec<EdgeId>>,

    /// Incoming edges for each node (adjacency list)
    incoming: Vec<Vec<EdgeId>>,
}

impl SideEffectGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node for `key`, creating it on first use
    pub fn upsert_node(&mut self, key: NodeKey) -> NodeId {
        if let Some(&id) = self.key_index.get(&key) {
            return id;
        }

        let id = NodeId::new(self.nodes.len() as u64);
        self.key_index.insert(key.clone(), id);
        self.nodes.push(Node::new(id, key));
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    pub fn upsert_drug(&mut self, name: impl Into<String>) -> NodeId {
        self.upsert_node(NodeKey::drug(name))
    }

    pub fn upsert_side_effect(&mut self, name: impl Into<String>) -> NodeId {
        self.upsert_node(NodeKey::side_effect(name))
    }

    /// Add the `causes` edge from `drug` to `side_effect`.
    ///
    /// An existing edge takes a later known frequency; a later row without
    /// one keeps the frequency already recorded.
    pub fn upsert_edge(
        &mut self,
        drug: NodeId,
        side_effect: NodeId,
        frequency: Option<f64>,
    ) -> GraphResult<EdgeId> {
        match self.get_node(drug) {
            Some(node) if node.is_drug() => {}
            Some(_) => return Err(GraphError::InvalidEdgeSource(drug)),
            None => return Err(GraphError::NodeNotFound(drug)),
        }
        match self.get_node(side_effect) {
            Some(node) if node.is_side_effect() => {}
            Some(_) => return Err(GraphError::InvalidEdgeTarget(side_effect)),
            None => return Err(GraphError::NodeNotFound(side_effect)),
        }

        if let Some(&edge_id) = self.pair_index.get(&(drug, side_effect)) {
            if frequency.is_some() {
                self.edges[edge_id.index()].frequency = frequency;
            }
            return Ok(edge_id);
        }

        let edge_id = EdgeId::new(self.edges.len() as u64);
        self.edges.push(Edge::new(edge_id, drug, side_effect, frequency));
        self.pair_index.insert((drug, side_effect), edge_id);

        // Update adjacency lists
        self.outgoing[drug.index()].push(edge_id);
        self.incoming[side_effect.index()].push(edge_id);

        Ok(edge_id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn node_id(&self, key: &NodeKey) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    /// Resolve a drug by name
    pub fn drug_id(&self, name: &str) -> Option<NodeId> {
        self.node_id(&NodeKey::drug(name))
    }

    /// Resolve a side effect by name
    pub fn side_effect_id(&self, name: &str) -> Option<NodeId> {
        self.node_id(&NodeKey::side_effect(name))
    }

    /// Edge between the pair, if any
    pub fn find_edge(&self, source: NodeId, target: NodeId) -> Option<&Edge> {
        self.pair_index
            .get(&(source, target))
            .and_then(|&id| self.get_edge(id))
    }

    /// Get all outgoing edges from a node, in insertion order
    pub fn outgoing_edges(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing
            .get(node_id.index())
            .into_iter()
            .flatten()
            .filter_map(|&id| self.get_edge(id))
    }

    /// Get all incoming edges to a node, in insertion order
    pub fn incoming_edges(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming
            .get(node_id.index())
            .into_iter()
            .flatten()
            .filter_map(|&id| self.get_edge(id))
    }

    /// Undirected degree
    pub fn degree(&self, node_id: NodeId) -> usize {
        let out = self.outgoing.get(node_id.index()).map_or(0, Vec::len);
        let inc = self.incoming.get(node_id.index()).map_or(0, Vec::len);
        out + inc
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |node| node.kind() == kind)
    }

    pub fn drugs(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes_of_kind(NodeKind::Drug)
    }

    pub fn side_effects(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes_of_kind(NodeKind::SideEffect)
    }

    /// Side effects of a drug with their recorded frequencies
    pub fn side_effects_of(&self, drug: NodeId) -> impl Iterator<Item = (&Node, Option<f64>)> + '_ {
        self.outgoing_edges(drug)
            .filter_map(|edge| self.get_node(edge.target).map(|node| (node, edge.frequency)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn statistics(&self) -> GraphStatistics {
        let drug_count = self.drugs().count();
        GraphStatistics {
            drug_count,
            side_effect_count: self.nodes.len() - drug_count,
            edge_count: self.edges.len(),
            edges_with_frequency: self.edges.iter().filter(|e| e.has_frequency()).count(),
        }
    }
}
