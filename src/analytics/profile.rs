//! Single-drug profile and two-drug comparison

use super::{AnalyticsError, AnalyticsResult, RiskLevel};
use crate::ingest::SideEffectLookup;
use crate::narrative::NarrativeRequest;
use crate::risk::{RiskTable, ScoredGraph};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideEffectEntry {
    pub name: String,
    pub frequency: Option<f64>,
}

/// A drug's score, band and reported side effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugProfile {
    pub drug: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub side_effects: Vec<SideEffectEntry>,
}

pub fn drug_profile(scored: &ScoredGraph, drug: &str) -> AnalyticsResult<DrugProfile> {
    let graph = scored.graph();
    let id = graph
        .drug_id(drug)
        .ok_or_else(|| AnalyticsError::UnknownDrug(drug.to_string()))?;
    let risk_score = scored.risk_score(id).unwrap_or(0.0);

    let side_effects = graph
        .side_effects_of(id)
        .map(|(node, frequency)| SideEffectEntry {
            name: node.name().to_string(),
            frequency,
        })
        .collect();

    Ok(DrugProfile {
        drug: drug.to_string(),
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
        side_effects,
    })
}

/// Two drugs side by side; unknown drugs score 0 and have no side effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairComparison {
    pub drug_a: String,
    pub risk_a: f64,
    pub drug_b: String,
    pub risk_b: f64,
    /// Side effects of both, in `drug_a`'s order without repeats
    pub shared_effects: Vec<String>,
}

impl PairComparison {
    pub fn overlap_count(&self) -> usize {
        self.shared_effects.len()
    }

    /// Request for the hypothesis text service, listing at most
    /// `max_effects` shared effects
    pub fn narrative_request(&self, max_effects: usize) -> NarrativeRequest {
        NarrativeRequest {
            drug_a: self.drug_a.clone(),
            risk_a: self.risk_a,
            drug_b: self.drug_b.clone(),
            risk_b: self.risk_b,
            overlap_count: self.overlap_count(),
            top_overlap_effects: self.shared_effects.iter().take(max_effects).cloned().collect(),
        }
    }
}

pub fn compare_pair(
    drug_a: &str,
    drug_b: &str,
    risk_table: &RiskTable,
    lookup: &SideEffectLookup,
) -> PairComparison {
    let effects_b: IndexSet<&str> = lookup.side_effects(drug_b).iter().map(String::as_str).collect();
    let shared: IndexSet<&str> = lookup
        .side_effects(drug_a)
        .iter()
        .map(String::as_str)
        .filter(|effect| effects_b.contains(effect))
        .collect();

    PairComparison {
        drug_a: drug_a.to_string(),
        risk_a: risk_table.get(drug_a).unwrap_or(0.0),
        drug_b: drug_b.to_string(),
        risk_b: risk_table.get(drug_b).unwrap_or(0.0),
        shared_effects: shared.into_iter().map(str::to_string).collect(),
    }
}
