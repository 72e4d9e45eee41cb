//! Node implementation for the drug/side-effect graph

use super::types::{NodeId, NodeKey, NodeKind};
use serde::{Deserialize, Serialize};

/// A node in the graph
///
/// Nodes carry:
/// - A dense ID
/// - Their identity key (kind + name), fixed at creation
/// - Presentation hints used by renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Kind and name
    pub key: NodeKey,

    /// Display color (hex)
    pub color: String,

    /// Display size
    pub size: u32,
}

impl Node {
    /// Create a new node with the default presentation for its kind
    pub fn new(id: NodeId, key: NodeKey) -> Self {
        let (color, size) = match key.kind {
            NodeKind::Drug => ("#63b6e5", 20),
            NodeKind::SideEffect => ("#f26c6c", 15),
        };

        Node {
            id,
            key,
            color: color.to_string(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn kind(&self) -> NodeKind {
        self.key.kind
    }

    pub fn is_drug(&self) -> bool {
        self.key.kind == NodeKind::Drug
    }

    pub fn is_side_effect(&self) -> bool {
        self.key.kind == NodeKind::SideEffect
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
