pub mod common;
pub mod centrality;

pub use common::{GraphView, NodeId};
pub use centrality::{betweenness_centrality, BetweennessConfig};
