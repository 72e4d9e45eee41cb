//! Adverse-event table ingestion
//!
//! Reads the cleaned `drug_name, side_effect, freq_pct` table and derives the
//! per-drug side-effect lookup used by the overlap analytics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// One reported drug / side-effect observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdverseEventRecord {
    pub drug_name: String,
    pub side_effect: String,
    /// Raw frequency cell; may be empty or non-numeric
    #[serde(default)]
    pub freq_pct: Option<String>,
}

impl AdverseEventRecord {
    pub fn new(
        drug_name: impl Into<String>,
        side_effect: impl Into<String>,
        freq_pct: Option<f64>,
    ) -> Self {
        Self {
            drug_name: drug_name.into(),
            side_effect: side_effect.into(),
            freq_pct: freq_pct.map(|f| f.to_string()),
        }
    }

    /// Record with an unparsed frequency cell
    pub fn raw(
        drug_name: impl Into<String>,
        side_effect: impl Into<String>,
        freq_pct: Option<&str>,
    ) -> Self {
        Self {
            drug_name: drug_name.into(),
            side_effect: side_effect.into(),
            freq_pct: freq_pct.map(str::to_string),
        }
    }

    /// Frequency in percent, if the cell holds a finite number
    pub fn frequency(&self) -> Option<f64> {
        self.freq_pct
            .as_deref()
            .map(str::trim)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|f| f.is_finite())
    }
}

/// Read the adverse-event table from a CSV file
pub fn read_records(path: impl AsRef<Path>) -> IngestResult<Vec<AdverseEventRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = read_records_from(file)?;
    info!("Loaded {} adverse-event rows from {:?}", records.len(), path);
    Ok(records)
}

/// Read the adverse-event table from any CSV source.
///
/// Extra columns are ignored. Names are trimmed; rows left without a drug
/// or side-effect name are skipped.
pub fn read_records_from<R: Read>(reader: R) -> IngestResult<Vec<AdverseEventRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in csv_reader.deserialize::<AdverseEventRecord>() {
        let record = result?;
        if record.drug_name.is_empty() || record.side_effect.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    if skipped > 0 {
        warn!("Skipped {} rows with an empty drug or side-effect name", skipped);
    }

    Ok(records)
}

/// Drug name -> side effects reported for it, in source order.
///
/// Duplicates are kept. Drugs are ordered by first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideEffectLookup {
    entries: IndexMap<String, Vec<String>>,
}

impl SideEffectLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[AdverseEventRecord]) -> Self {
        let mut lookup = Self::new();
        for record in records {
            lookup.insert(record.drug_name.clone(), record.side_effect.clone());
        }
        lookup
    }

    pub fn insert(&mut self, drug: impl Into<String>, side_effect: impl Into<String>) {
        self.entries
            .entry(drug.into())
            .or_default()
            .push(side_effect.into());
    }

    pub fn get(&self, drug: &str) -> Option<&[String]> {
        self.entries.get(drug).map(Vec::as_slice)
    }

    /// Side effects of `drug`, empty when unknown
    pub fn side_effects(&self, drug: &str) -> &[String] {
        self.get(drug).unwrap_or(&[])
    }

    pub fn contains(&self, drug: &str) -> bool {
        self.entries.contains_key(drug)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries
            .iter()
            .map(|(drug, effects)| (drug.as_str(), effects.as_slice()))
    }

    pub fn drugs(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D: Into<String>, S: Into<String>> FromIterator<(D, S)> for SideEffectLookup {
    fn from_iter<I: IntoIterator<Item = (D, S)>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for (drug, side_effect) in iter {
            lookup.insert(drug, side_effect);
        }
        lookup
    }
}
