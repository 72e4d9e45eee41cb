//! Betweenness-centrality ranking of drugs and side effects

use crate::algo::{betweenness_centrality, build_view, BetweennessConfig};
use crate::graph::{NodeId, NodeKind, SideEffectGraph};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityScore {
    pub node: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub score: f64,
}

/// Centrality of every node, in node order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentralityRanking {
    scores: Vec<CentralityScore>,
}

impl CentralityRanking {
    pub fn get(&self, node: NodeId) -> Option<f64> {
        self.scores
            .get(node.index())
            .filter(|s| s.node == node)
            .map(|s| s.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CentralityScore> + '_ {
        self.scores.iter()
    }

    /// The `k` most central nodes of `kind`, highest first
    pub fn top(&self, kind: NodeKind, k: usize) -> Vec<&CentralityScore> {
        let mut picked: Vec<&CentralityScore> =
            self.scores.iter().filter(|s| s.kind == kind).collect();
        picked.sort_by(|a, b| b.score.total_cmp(&a.score));
        picked.truncate(k);
        picked
    }

    pub fn top_drugs(&self, k: usize) -> Vec<&CentralityScore> {
        self.top(NodeKind::Drug, k)
    }

    pub fn top_side_effects(&self, k: usize) -> Vec<&CentralityScore> {
        self.top(NodeKind::SideEffect, k)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Betweenness centrality over the undirected view of the whole graph.
///
/// With a sample size below the node count and no seed, two calls can return
/// different scores. An empty graph yields an empty ranking.
pub fn centrality_ranking(graph: &SideEffectGraph, config: &BetweennessConfig) -> CentralityRanking {
    let view = build_view(graph, None);
    let raw = betweenness_centrality(&view, config);

    let scores: Vec<CentralityScore> = graph
        .nodes()
        .map(|node| CentralityScore {
            node: node.id,
            name: node.name().to_string(),
            kind: node.kind(),
            score: raw.get(&node.id.as_u64()).copied().unwrap_or(0.0),
        })
        .collect();

    debug!(
        "Computed centrality for {} nodes (sample size {:?})",
        scores.len(),
        config.sample_size
    );
    CentralityRanking { scores }
}
