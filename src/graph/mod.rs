//! Drug / side-effect graph
//!
//! This module implements the bipartite graph model:
//! - Drug and side-effect nodes keyed by (kind, name)
//! - Directed `causes` edges carrying an optional frequency
//! - At most one edge per (drug, side effect) pair, last write wins
//! - Construction from adverse-event records

pub mod builder;
pub mod edge;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use builder::{build_side_effect_graph, GraphBuilder};
pub use edge::Edge;
pub use node::Node;
pub use store::{GraphError, GraphResult, GraphStatistics, SideEffectGraph};
pub use types::{EdgeId, NodeId, NodeKey, NodeKind};
