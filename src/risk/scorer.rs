//! Risk scorer
//!
//! Produces a scored view of a graph instead of writing scores back onto
//! the nodes, so the graph itself is never mutated after construction.

use super::{RiskScoreRecord, RiskTable};
use crate::graph::{NodeId, SideEffectGraph};
use indexmap::IndexMap;
use tracing::debug;

/// Round to 4 decimal places
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Computes drug risk scores from outgoing edge frequencies
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        RiskScorer
    }

    /// Mean recorded frequency of a drug's side effects, rounded to 4 places.
    ///
    /// Edges without a frequency are left out entirely. A drug with no
    /// recorded frequency scores 0.0.
    pub fn score_drug(&self, graph: &SideEffectGraph, drug: NodeId) -> f64 {
        let (total, count) = graph
            .outgoing_edges(drug)
            .filter_map(|edge| edge.frequency)
            .fold((0.0, 0usize), |(total, count), freq| (total + freq, count + 1));

        if count == 0 {
            0.0
        } else {
            round4(total / count as f64)
        }
    }

    /// Score every drug node, in node order
    pub fn score(&self, graph: &SideEffectGraph) -> RiskScores {
        let scores: IndexMap<NodeId, f64> = graph
            .drugs()
            .map(|drug| (drug.id, self.score_drug(graph, drug.id)))
            .collect();

        debug!("Scored {} drugs", scores.len());
        RiskScores { scores }
    }

    /// Score the graph and bundle it with its scores
    pub fn apply(&self, graph: SideEffectGraph) -> ScoredGraph {
        let scores = self.score(&graph);
        ScoredGraph { graph, scores }
    }
}

/// Drug node -> risk score, in node order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskScores {
    scores: IndexMap<NodeId, f64>,
}

impl RiskScores {
    pub fn get(&self, drug: NodeId) -> Option<f64> {
        self.scores.get(&drug).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.scores.iter().map(|(&id, &score)| (id, score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// A graph together with the risk scores computed from it
#[derive(Debug, Clone)]
pub struct ScoredGraph {
    graph: SideEffectGraph,
    scores: RiskScores,
}

impl ScoredGraph {
    pub fn graph(&self) -> &SideEffectGraph {
        &self.graph
    }

    pub fn scores(&self) -> &RiskScores {
        &self.scores
    }

    /// Score of a drug node; `None` for side effects and unknown ids
    pub fn risk_score(&self, node: NodeId) -> Option<f64> {
        self.scores.get(node)
    }

    pub fn risk_score_of(&self, drug_name: &str) -> Option<f64> {
        self.graph
            .drug_id(drug_name)
            .and_then(|id| self.scores.get(id))
    }

    /// One record per drug, in node order
    pub fn records(&self) -> Vec<RiskScoreRecord> {
        self.scores
            .iter()
            .filter_map(|(id, score)| {
                self.graph
                    .get_node(id)
                    .map(|node| RiskScoreRecord::new(node.name(), score))
            })
            .collect()
    }

    pub fn risk_table(&self) -> RiskTable {
        self.records().into_iter().collect()
    }

    pub fn into_parts(self) -> (SideEffectGraph, RiskScores) {
        (self.graph, self.scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_side_effect_graph;
    use crate::ingest::AdverseEventRecord;

    #[test]
    fn test_mean_excludes_missing_frequencies() {
        let records = vec![
            AdverseEventRecord::new("Aspirin", "Nausea", Some(10.0)),
            AdverseEventRecord::new("Aspirin", "Headache", Some(20.0)),
            AdverseEventRecord::new("Aspirin", "Rash", Some(30.0)),
            AdverseEventRecord::new("Aspirin", "Dizziness", None),
        ];
        let scored = RiskScorer::new().apply(build_side_effect_graph(&records));

        assert_eq!(scored.risk_score_of("Aspirin"), Some(20.0));
    }

    #[test]
    fn test_drug_without_frequencies_scores_zero() {
        let mut graph = build_side_effect_graph(&[AdverseEventRecord::new("Aspirin", "Nausea", None)]);
        let lonely = graph.upsert_drug("Placebo");
        let scored = RiskScorer::new().apply(graph);

        assert_eq!(scored.risk_score_of("Aspirin"), Some(0.0));
        assert_eq!(scored.risk_score(lonely), Some(0.0));
    }

    #[test]
    fn test_rounding_to_four_places() {
        let records = vec![
            AdverseEventRecord::new("Aspirin", "Nausea", Some(1.0)),
            AdverseEventRecord::new("Aspirin", "Headache", Some(1.0)),
            AdverseEventRecord::new("Aspirin", "Rash", Some(2.0)),
        ];
        let scored = RiskScorer::new().apply(build_side_effect_graph(&records));

        assert_eq!(scored.risk_score_of("Aspirin"), Some(1.3333));
    }

    #[test]
    fn test_side_effects_have_no_score() {
        let records = vec![AdverseEventRecord::new("Aspirin", "Nausea", Some(4.0))];
        let scored = RiskScorer::new().apply(build_side_effect_graph(&records));
        let nausea = scored.graph().side_effect_id("Nausea").unwrap();

        assert_eq!(scored.risk_score(nausea), None);
        assert_eq!(scored.scores().len(), 1);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let records = vec![
            AdverseEventRecord::new("Aspirin", "Nausea", Some(3.5)),
            AdverseEventRecord::new("Warfarin", "Bleeding", Some(7.25)),
            AdverseEventRecord::new("Warfarin", "Nausea", None),
        ];
        let graph = build_side_effect_graph(&records);
        let scorer = RiskScorer::new();

        assert_eq!(scorer.score(&graph), scorer.score(&graph));
    }
}
