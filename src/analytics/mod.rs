//! Analytics over the scored graph and the side-effect lookup
//!
//! Every function here is a pure query over its inputs. [`AnalyticsContext`]
//! bundles the inputs built once per run and memoizes centrality.

pub mod alternatives;
pub mod centrality;
pub mod context;
pub mod hypotheses;
pub mod polypharmacy;
pub mod profile;
pub mod ranking;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use alternatives::{safer_alternatives, SaferAlternative};
pub use centrality::{centrality_ranking, CentralityRanking, CentralityScore};
pub use context::AnalyticsContext;
pub use hypotheses::{generate_risk_hypotheses, RiskHypothesis, SharedEffect, TOP_SHARED_EFFECTS};
pub use polypharmacy::{polypharmacy_aggregate, PolypharmacyReport};
pub use profile::{compare_pair, drug_profile, DrugProfile, PairComparison, SideEffectEntry};
pub use ranking::{
    explore_range, ranked_risk_list, top_risks, within_range, RangeSummary, RANGE_TOP_DRUGS,
};

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Unknown drug: {0}")]
    UnknownDrug(String),

    #[error("At least {required} drugs are required, got {given}")]
    NotEnoughDrugs { required: usize, given: usize },
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Scores above this are `High`
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
/// Scores above this (and up to the high threshold) are `Medium`
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Fixed banding of a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score > MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.4), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.41), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.7), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.71), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(42.0), RiskLevel::High);
        assert_eq!(RiskLevel::High.to_string(), "High");
    }
}
