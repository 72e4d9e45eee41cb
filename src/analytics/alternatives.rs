//! Safer-alternative search

use super::{AnalyticsError, AnalyticsResult};
use crate::ingest::SideEffectLookup;
use crate::risk::RiskTable;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A drug sharing side effects with the target at a strictly lower risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaferAlternative {
    pub drug: String,
    /// Distinct side effects shared with the target
    pub overlap_count: usize,
    pub risk_score: f64,
    pub risk_reduction: f64,
}

/// Drugs that share at least one side effect with `drug` and score lower.
///
/// Ordered by shared side effects, then by risk reduction, both descending.
/// A candidate missing from the risk table counts as infinitely risky and is
/// never suggested.
pub fn safer_alternatives(
    drug: &str,
    risk_table: &RiskTable,
    lookup: &SideEffectLookup,
) -> AnalyticsResult<Vec<SaferAlternative>> {
    let target_effects = lookup
        .get(drug)
        .ok_or_else(|| AnalyticsError::UnknownDrug(drug.to_string()))?;
    let target_risk = risk_table
        .get(drug)
        .ok_or_else(|| AnalyticsError::UnknownDrug(drug.to_string()))?;

    let target_set: FxHashSet<&str> = target_effects.iter().map(String::as_str).collect();

    let mut suggestions = Vec::new();
    for (other, effects) in lookup.iter() {
        if other == drug {
            continue;
        }

        let candidate_set: FxHashSet<&str> = effects.iter().map(String::as_str).collect();
        let overlap_count = candidate_set
            .iter()
            .filter(|effect| target_set.contains(*effect))
            .count();
        if overlap_count == 0 {
            continue;
        }

        let candidate_risk = risk_table.get(other).unwrap_or(f64::INFINITY);
        if candidate_risk < target_risk {
            suggestions.push(SaferAlternative {
                drug: other.to_string(),
                overlap_count,
                risk_score: candidate_risk,
                risk_reduction: target_risk - candidate_risk,
            });
        }
    }

    suggestions.sort_by(|a, b| {
        b.overlap_count
            .cmp(&a.overlap_count)
            .then_with(|| b.risk_reduction.total_cmp(&a.risk_reduction))
    });

    Ok(suggestions)
}
