//! Polypharmacy aggregation
//!
//! Combined view of two or more drugs taken together: the union and the
//! common intersection of their side effects, plus average and peak risk.

use super::{AnalyticsError, AnalyticsResult, RiskLevel};
use crate::ingest::SideEffectLookup;
use crate::risk::RiskTable;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolypharmacyReport {
    pub drugs: Vec<String>,
    /// Union of all side effects, first-seen order
    pub combined_effects: Vec<String>,
    /// Side effects reported for every selected drug
    pub overlap_effects: Vec<String>,
    pub average_risk: f64,
    pub max_risk: f64,
    pub risk_level: RiskLevel,
}

/// Aggregate a selection of at least two drugs.
///
/// Drugs missing from the risk table contribute a risk of 0; drugs missing
/// from the lookup contribute no side effects (and so empty the overlap).
pub fn polypharmacy_aggregate<S: AsRef<str>>(
    drugs: &[S],
    risk_table: &RiskTable,
    lookup: &SideEffectLookup,
) -> AnalyticsResult<PolypharmacyReport> {
    if drugs.len() < 2 {
        return Err(AnalyticsError::NotEnoughDrugs {
            required: 2,
            given: drugs.len(),
        });
    }

    let mut combined: IndexSet<&str> = IndexSet::new();
    let mut overlap: Option<IndexSet<&str>> = None;
    let mut total_risk = 0.0;
    let mut max_risk = f64::NEG_INFINITY;

    for drug in drugs {
        let drug = drug.as_ref();
        let effects: IndexSet<&str> = lookup.side_effects(drug).iter().map(String::as_str).collect();

        combined.extend(effects.iter().copied());
        overlap = Some(match overlap {
            None => effects,
            Some(mut common) => {
                common.retain(|effect| effects.contains(effect));
                common
            }
        });

        let risk = risk_table.get(drug).unwrap_or(0.0);
        total_risk += risk;
        max_risk = max_risk.max(risk);
    }

    let average_risk = total_risk / drugs.len() as f64;

    Ok(PolypharmacyReport {
        drugs: drugs.iter().map(|d| d.as_ref().to_string()).collect(),
        combined_effects: combined.into_iter().map(str::to_string).collect(),
        overlap_effects: overlap
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect(),
        average_risk,
        max_risk,
        risk_level: RiskLevel::from_score(average_risk),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> SideEffectLookup {
        vec![
            ("A", "nausea"),
            ("A", "rash"),
            ("B", "nausea"),
            ("B", "fatigue"),
            ("C", "nausea"),
            ("D", "insomnia"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_union_and_intersection() {
        let risks: RiskTable = vec![("A", 0.9), ("B", 0.6), ("C", 0.3)].into_iter().collect();
        let report = polypharmacy_aggregate(&["A", "B", "C"], &risks, &lookup()).unwrap();

        assert_eq!(report.overlap_effects, vec!["nausea"]);
        assert_eq!(report.combined_effects, vec!["nausea", "rash", "fatigue"]);
        assert!((report.average_risk - 0.6).abs() < 1e-12);
        assert_eq!(report.max_risk, 0.9);
        assert_eq!(report.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_disjoint_pair_has_empty_overlap() {
        let report = polypharmacy_aggregate(&["A", "B", "D"], &RiskTable::new(), &lookup()).unwrap();
        assert!(report.overlap_effects.is_empty());
        assert_eq!(report.combined_effects.len(), 4);
    }

    #[test]
    fn test_missing_drugs_count_as_zero_risk() {
        let risks: RiskTable = vec![("A", 0.9)].into_iter().collect();
        let report = polypharmacy_aggregate(&["A", "Unknown"], &risks, &lookup()).unwrap();

        assert!((report.average_risk - 0.45).abs() < 1e-12);
        assert_eq!(report.max_risk, 0.9);
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert!(report.overlap_effects.is_empty());
    }

    #[test]
    fn test_high_and_low_bands() {
        let risks: RiskTable = vec![("A", 0.8), ("B", 0.75), ("C", 0.1)].into_iter().collect();

        let high = polypharmacy_aggregate(&["A", "B"], &risks, &lookup()).unwrap();
        assert_eq!(high.risk_level, RiskLevel::High);

        let low = polypharmacy_aggregate(&["C", "D"], &risks, &lookup()).unwrap();
        assert_eq!(low.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_requires_two_drugs() {
        assert_eq!(
            polypharmacy_aggregate(&["A"], &RiskTable::new(), &lookup()),
            Err(AnalyticsError::NotEnoughDrugs { required: 2, given: 1 })
        );
    }
}
