//! Ranked risk views

use super::RiskLevel;
use crate::risk::{ranked_records, sort_by_risk_desc, RiskScoreRecord, RiskTable, ScoredGraph};
use serde::{Deserialize, Serialize};

/// Riskiest drugs listed in a [`RangeSummary`]
pub const RANGE_TOP_DRUGS: usize = 5;

/// Every drug with its score, highest first (ties in insertion order)
pub fn ranked_risk_list(scored: &ScoredGraph) -> Vec<RiskScoreRecord> {
    ranked_records(scored)
}

/// The `n` riskiest drugs
pub fn top_risks(scored: &ScoredGraph, n: usize) -> Vec<RiskScoreRecord> {
    let mut ranked = ranked_risk_list(scored);
    ranked.truncate(n);
    ranked
}

/// Drugs whose score lies in `[min, max]`, highest first
pub fn within_range(table: &RiskTable, min: f64, max: f64) -> Vec<RiskScoreRecord> {
    let mut records: Vec<RiskScoreRecord> = table
        .iter()
        .filter(|&(_, score)| score >= min && score <= max)
        .map(|(drug, score)| RiskScoreRecord::new(drug, score))
        .collect();
    sort_by_risk_desc(&mut records);
    records
}

/// Aggregate view of the drugs scoring inside a band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// `None` when the band is empty
    pub average_risk: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub top: Vec<RiskScoreRecord>,
}

/// Summarize the drugs scoring in `[min, max]`.
///
/// Missing bounds default to the lowest and highest score in the table.
pub fn explore_range(table: &RiskTable, min: Option<f64>, max: Option<f64>) -> RangeSummary {
    let (lowest, highest) = table
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, score)| {
            (lo.min(score), hi.max(score))
        });
    let min = min.unwrap_or(lowest);
    let max = max.unwrap_or(highest);

    let mut top = within_range(table, min, max);
    let count = top.len();
    let average_risk = if count == 0 {
        None
    } else {
        Some(top.iter().map(|r| r.risk_score).sum::<f64>() / count as f64)
    };
    top.truncate(RANGE_TOP_DRUGS);

    RangeSummary {
        min,
        max,
        count,
        average_risk,
        risk_level: average_risk.map(RiskLevel::from_score),
        top,
    }
}
