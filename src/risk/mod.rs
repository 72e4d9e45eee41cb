//! Per-drug risk scoring
//!
//! A drug's risk score is the mean reported frequency (%) of its side effects,
//! counting only edges with a recorded frequency.

pub mod export;
pub mod scorer;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use export::{
    export_risk_scores, ranked_records, read_risk_table, read_risk_table_from, write_risk_scores,
    ExportError, ExportResult,
};
pub use scorer::{RiskScorer, RiskScores, ScoredGraph};

/// A derived (drug, score) pair; also the row shape of the exported table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreRecord {
    pub drug_name: String,
    pub risk_score: f64,
}

impl RiskScoreRecord {
    pub fn new(drug_name: impl Into<String>, risk_score: f64) -> Self {
        Self {
            drug_name: drug_name.into(),
            risk_score,
        }
    }
}

/// Sort by score, highest first. Stable: ties keep their current order.
pub fn sort_by_risk_desc(records: &mut [RiskScoreRecord]) {
    records.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
}

/// Drug name -> risk score, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskTable {
    scores: IndexMap<String, f64>,
}

impl RiskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a score
    pub fn insert(&mut self, drug: impl Into<String>, score: f64) {
        self.scores.insert(drug.into(), score);
    }

    pub fn get(&self, drug: &str) -> Option<f64> {
        self.scores.get(drug).copied()
    }

    pub fn contains(&self, drug: &str) -> bool {
        self.scores.contains_key(drug)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores.iter().map(|(drug, &score)| (drug.as_str(), score))
    }

    pub fn drugs(&self) -> impl Iterator<Item = &str> + '_ {
        self.scores.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn to_records(&self) -> Vec<RiskScoreRecord> {
        self.iter()
            .map(|(drug, score)| RiskScoreRecord::new(drug, score))
            .collect()
    }
}

impl FromIterator<RiskScoreRecord> for RiskTable {
    fn from_iter<I: IntoIterator<Item = RiskScoreRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.insert(record.drug_name, record.risk_score);
        }
        table
    }
}

impl<D: Into<String>> FromIterator<(D, f64)> for RiskTable {
    fn from_iter<I: IntoIterator<Item = (D, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (drug, score) in iter {
            table.insert(drug, score);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut records = vec![
            RiskScoreRecord::new("Aspirin", 0.3),
            RiskScoreRecord::new("Ibuprofen", 0.5),
            RiskScoreRecord::new("Paracetamol", 0.2),
            RiskScoreRecord::new("Warfarin", 0.8),
            RiskScoreRecord::new("Amoxicillin", 0.5),
        ];
        sort_by_risk_desc(&mut records);

        let order: Vec<&str> = records.iter().map(|r| r.drug_name.as_str()).collect();
        assert_eq!(order, vec!["Warfarin", "Ibuprofen", "Amoxicillin", "Aspirin", "Paracetamol"]);
    }

    #[test]
    fn test_risk_table_last_insert_wins() {
        let table: RiskTable = vec![("Aspirin", 0.3), ("Warfarin", 0.8), ("Aspirin", 0.4)]
            .into_iter()
            .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Aspirin"), Some(0.4));
        assert_eq!(table.get("Unknown"), None);
        assert_eq!(table.drugs().collect::<Vec<_>>(), vec!["Aspirin", "Warfarin"]);
    }
}
