//! Risk table export
//!
//! Writes `drug_name,risk_score` rows sorted by score (highest first) and
//! reads such a table back.

use super::{sort_by_risk_desc, RiskScoreRecord, RiskTable, ScoredGraph};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Failures while writing or reading exported artifacts
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Write error: {0}")]
    Write(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// All drugs with their scores, highest first; ties keep node order
pub fn ranked_records(scored: &ScoredGraph) -> Vec<RiskScoreRecord> {
    let mut records = scored.records();
    sort_by_risk_desc(&mut records);
    records
}

/// Write records as CSV in the given order
pub fn write_risk_scores<W: Write>(records: &[RiskScoreRecord], writer: W) -> ExportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record(["drug_name", "risk_score"])?;
    }
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export the ranked risk table to `path`, returning the rows written
pub fn export_risk_scores(
    scored: &ScoredGraph,
    path: impl AsRef<Path>,
) -> ExportResult<Vec<RiskScoreRecord>> {
    let path = path.as_ref();
    let records = ranked_records(scored);

    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_risk_scores(&records, file)?;

    info!("Drug risk scores saved to: {:?} ({} drugs)", path, records.len());
    Ok(records)
}

/// Read an exported risk table
pub fn read_risk_table(path: impl AsRef<Path>) -> ExportResult<RiskTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_risk_table_from(file)
}

pub fn read_risk_table_from<R: Read>(reader: R) -> ExportResult<RiskTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut table = RiskTable::new();
    for result in csv_reader.deserialize::<RiskScoreRecord>() {
        let record = result?;
        table.insert(record.drug_name, record.risk_score);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_side_effect_graph;
    use crate::ingest::AdverseEventRecord;
    use crate::risk::RiskScorer;

    fn scored() -> ScoredGraph {
        let records = vec![
            AdverseEventRecord::new("Aspirin", "Nausea", Some(3.0)),
            AdverseEventRecord::new("Warfarin", "Bleeding", Some(8.0)),
            AdverseEventRecord::new("Paracetamol", "Rash", Some(2.0)),
            AdverseEventRecord::new("Ibuprofen", "Nausea", Some(3.0)),
        ];
        RiskScorer::new().apply(build_side_effect_graph(&records))
    }

    #[test]
    fn test_ranked_records_order() {
        let ranked = ranked_records(&scored());
        let order: Vec<&str> = ranked.iter().map(|r| r.drug_name.as_str()).collect();
        assert_eq!(order, vec!["Warfarin", "Aspirin", "Ibuprofen", "Paracetamol"]);
    }

    #[test]
    fn test_write_has_header_and_rows() {
        let mut buffer = Vec::new();
        write_risk_scores(&ranked_records(&scored()), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "drug_name,risk_score");
        assert_eq!(lines[1], "Warfarin,8.0");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let mut buffer = Vec::new();
        write_risk_scores(&[], &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap().trim(), "drug_name,risk_score");
    }

    #[test]
    fn test_export_to_unwritable_path_is_io_error() {
        let err = export_risk_scores(&scored(), "/nonexistent-dir/scores.csv").unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_read_back() {
        let mut buffer = Vec::new();
        write_risk_scores(&ranked_records(&scored()), &mut buffer).unwrap();
        let table = read_risk_table_from(buffer.as_slice()).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.get("Paracetamol"), Some(2.0));
    }

    #[test]
    fn test_bad_score_reports_its_line() {
        let data = "drug_name,risk_score\nAspirin,0.3\nWarfarin,high\n";
        let err = read_risk_table_from(data.as_bytes()).unwrap_err();

        assert!(matches!(err, ExportError::Csv(_)));
        let message = err.to_string();
        assert!(message.contains("line: 3"), "{}", message);
        assert!(!message.starts_with("CSV error: CSV"), "{}", message);
    }
}
