//! Edge implementation for the drug/side-effect graph

use super::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// A directed `causes` edge from a drug to one of its side effects
///
/// Edges have:
/// - A unique ID
/// - A source drug node
/// - A target side-effect node
/// - The reported frequency in percent, when one was recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node (the drug)
    pub source: NodeId,

    /// Target node (the side effect)
    pub target: NodeId,

    /// Reported frequency (%); `None` when unknown
    pub frequency: Option<f64>,
}

impl Edge {
    /// Relationship label carried by every edge
    pub const RELATION: &'static str = "causes";

    /// Create a new directed edge
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, frequency: Option<f64>) -> Self {
        Edge {
            id,
            source,
            target,
            frequency,
        }
    }

    pub fn relation(&self) -> &'static str {
        Self::RELATION
    }

    pub fn has_frequency(&self) -> bool {
        self.frequency.is_some()
    }

    /// Check if this edge connects the given nodes (in order)
    pub fn connects(&self, source: NodeId, target: NodeId) -> bool {
        self.source == source && self.target == target
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}
