//! Pairwise combination-risk hypotheses
//!
//! For every pair of selected drugs, find the side effects both cause and
//! rank them by the mean of the two reported frequencies.

use crate::graph::{NodeId, SideEffectGraph};
use crate::risk::scorer::round4;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Number of shared effects kept per hypothesis
pub const TOP_SHARED_EFFECTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedEffect {
    pub side_effect: String,
    /// `(freq(d1, se) + freq(d2, se)) / 2`, unknown frequencies as 0
    pub average_frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskHypothesis {
    pub drug_pair: (String, String),
    pub overlap_count: usize,
    /// Every shared side effect, in the first drug's edge order
    pub shared_effects: Vec<String>,
    /// Highest-scoring shared effects, at most [`TOP_SHARED_EFFECTS`]
    pub top_shared_effects: Vec<SharedEffect>,
}

impl RiskHypothesis {
    /// `"Nausea (score: 12.5), Rash (score: 3)"`
    pub fn top_effects_summary(&self) -> String {
        self.top_shared_effects
            .iter()
            .map(|e| format!("{} (score: {})", e.side_effect, e.average_frequency))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rank drug pairs by how many side effects they share.
///
/// Pairs are formed in selection order and kept when they share at least
/// `min_overlap` side effects. Drugs absent from the graph share nothing.
/// The result is sorted by `overlap_count`, highest first; equal counts keep
/// pair order.
pub fn generate_risk_hypotheses<S: AsRef<str>>(
    graph: &SideEffectGraph,
    selected_drugs: &[S],
    min_overlap: usize,
) -> Vec<RiskHypothesis> {
    let mut hypotheses = Vec::new();

    for (i, first) in selected_drugs.iter().enumerate() {
        for second in &selected_drugs[i + 1..] {
            let (d1, d2) = (first.as_ref(), second.as_ref());
            if let Some(hypothesis) = pair_hypothesis(graph, d1, d2, min_overlap) {
                hypotheses.push(hypothesis);
            }
        }
    }

    hypotheses.sort_by(|a, b| b.overlap_count.cmp(&a.overlap_count));
    hypotheses
}

fn pair_hypothesis(
    graph: &SideEffectGraph,
    d1: &str,
    d2: &str,
    min_overlap: usize,
) -> Option<RiskHypothesis> {
    let id1 = graph.drug_id(d1);
    let id2 = graph.drug_id(d2);

    let second_targets: FxHashSet<NodeId> = id2
        .map(|id| graph.outgoing_edges(id).map(|e| e.target).collect())
        .unwrap_or_default();

    let shared: Vec<NodeId> = id1
        .map(|id| {
            graph
                .outgoing_edges(id)
                .map(|e| e.target)
                .filter(|target| second_targets.contains(target))
                .collect()
        })
        .unwrap_or_default();

    if shared.len() < min_overlap {
        return None;
    }

    let frequency = |drug: Option<NodeId>, effect: NodeId| -> f64 {
        drug.and_then(|d| graph.find_edge(d, effect))
            .and_then(|e| e.frequency)
            .unwrap_or(0.0)
    };

    let mut scored: Vec<SharedEffect> = Vec::with_capacity(shared.len());
    let mut shared_effects = Vec::with_capacity(shared.len());
    for &effect in &shared {
        let name = graph
            .get_node(effect)
            .map(|n| n.name().to_string())
            .unwrap_or_default();
        let average = round4((frequency(id1, effect) + frequency(id2, effect)) / 2.0);
        shared_effects.push(name.clone());
        scored.push(SharedEffect {
            side_effect: name,
            average_frequency: average,
        });
    }

    scored.sort_by(|a, b| b.average_frequency.total_cmp(&a.average_frequency));
    scored.truncate(TOP_SHARED_EFFECTS);

    Some(RiskHypothesis {
        drug_pair: (d1.to_string(), d2.to_string()),
        overlap_count: shared.len(),
        shared_effects,
        top_shared_effects: scored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_side_effect_graph;
    use crate::ingest::AdverseEventRecord;

    fn graph() -> SideEffectGraph {
        let records = vec![
            AdverseEventRecord::new("A", "nausea", Some(10.0)),
            AdverseEventRecord::new("A", "rash", Some(4.0)),
            AdverseEventRecord::new("A", "fatigue", None),
            AdverseEventRecord::new("B", "nausea", Some(20.0)),
            AdverseEventRecord::new("B", "rash", Some(2.0)),
            AdverseEventRecord::new("B", "fatigue", Some(6.0)),
            AdverseEventRecord::new("C", "nausea", Some(1.0)),
        ];
        build_side_effect_graph(&records)
    }

    #[test]
    fn test_min_overlap_filter_and_ordering() {
        let hypotheses = generate_risk_hypotheses(&graph(), &["A", "C", "B"], 2);

        // (A, C) shares one effect and is dropped; (C, B) too
        assert_eq!(hypotheses.len(), 1);
        assert_eq!(hypotheses[0].drug_pair, ("A".to_string(), "B".to_string()));
        assert_eq!(hypotheses[0].overlap_count, 3);
    }

    #[test]
    fn test_larger_overlap_ranks_first() {
        let hypotheses = generate_risk_hypotheses(&graph(), &["A", "C", "B"], 1);
        let counts: Vec<usize> = hypotheses.iter().map(|h| h.overlap_count).collect();
        assert_eq!(counts, vec![3, 1, 1]);
        assert_eq!(hypotheses[1].drug_pair, ("A".to_string(), "C".to_string()));
    }

    #[test]
    fn test_shared_effect_averages() {
        let hypotheses = generate_risk_hypotheses(&graph(), &["A", "B"], 2);
        let top = &hypotheses[0].top_shared_effects;

        let summary: Vec<(&str, f64)> = top
            .iter()
            .map(|e| (e.side_effect.as_str(), e.average_frequency))
            .collect();
        // Missing frequency on (A, fatigue) counts as 0; ties keep edge order
        assert_eq!(summary, vec![("nausea", 15.0), ("rash", 3.0), ("fatigue", 3.0)]);
        assert_eq!(
            hypotheses[0].top_effects_summary(),
            "nausea (score: 15), rash (score: 3), fatigue (score: 3)"
        );
    }

    #[test]
    fn test_top_effects_capped() {
        let mut records = Vec::new();
        for i in 0..8 {
            let effect = format!("effect-{}", i);
            records.push(AdverseEventRecord::new("X", effect.as_str(), Some(i as f64)));
            records.push(AdverseEventRecord::new("Y", effect.as_str(), Some(i as f64)));
        }
        let graph = build_side_effect_graph(&records);
        let hypotheses = generate_risk_hypotheses(&graph, &["X", "Y"], 2);

        assert_eq!(hypotheses[0].overlap_count, 8);
        assert_eq!(hypotheses[0].shared_effects.len(), 8);
        assert_eq!(hypotheses[0].top_shared_effects.len(), TOP_SHARED_EFFECTS);
        assert_eq!(hypotheses[0].top_shared_effects[0].side_effect, "effect-7");
    }

    #[test]
    fn test_unknown_drugs_share_nothing() {
        let hypotheses = generate_risk_hypotheses(&graph(), &["A", "Missing"], 0);
        assert_eq!(hypotheses.len(), 1);
        assert_eq!(hypotheses[0].overlap_count, 0);

        assert!(generate_risk_hypotheses(&graph(), &["A", "Missing"], 1).is_empty());
    }
}
