//! Graph construction from adverse-event records

use super::store::SideEffectGraph;
use crate::ingest::AdverseEventRecord;
use tracing::debug;

/// Folds adverse-event records into a [`SideEffectGraph`].
///
/// Each record contributes one drug node, one side-effect node and the
/// `causes` edge between them. A later record for the same pair replaces the
/// edge's frequency only when it carries one; unparseable frequencies count as
/// absent.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: SideEffectGraph,
    rows: usize,
    missing_frequency: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record
    pub fn add_record(&mut self, record: &AdverseEventRecord) -> &mut Self {
        let drug = self.graph.upsert_drug(record.drug_name.as_str());
        let side_effect = self.graph.upsert_side_effect(record.side_effect.as_str());

        let frequency = record.frequency();
        if frequency.is_none() {
            self.missing_frequency += 1;
        }

        // Endpoints were just created with the right kinds
        if let Err(e) = self.graph.upsert_edge(drug, side_effect, frequency) {
            debug!("Skipping record {:?}: {}", record, e);
        }

        self.rows += 1;
        self
    }

    pub fn add_records<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a AdverseEventRecord>,
    ) -> &mut Self {
        for record in records {
            self.add_record(record);
        }
        self
    }

    pub fn build(self) -> SideEffectGraph {
        debug!(
            "Built graph from {} rows ({} without frequency): {} nodes, {} edges",
            self.rows,
            self.missing_frequency,
            self.graph.node_count(),
            self.graph.edge_count()
        );
        self.graph
    }
}

/// Build a graph from a sequence of records
pub fn build_side_effect_graph<'a>(
    records: impl IntoIterator<Item = &'a AdverseEventRecord>,
) -> SideEffectGraph {
    let mut builder = GraphBuilder::new();
    builder.add_records(records);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_creates_both_kinds() {
        let records = vec![
            AdverseEventRecord::new("Aspirin", "Nausea", Some(10.5)),
            AdverseEventRecord::new("Aspirin", "Headache", Some(5.2)),
            AdverseEventRecord::new("Ibuprofen", "Nausea", None),
        ];
        let graph = build_side_effect_graph(&records);

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.drugs().count(), 2);
        assert_eq!(graph.side_effects().count(), 2);

        let ibuprofen = graph.drug_id("Ibuprofen").unwrap();
        let nausea = graph.side_effect_id("Nausea").unwrap();
        assert_eq!(graph.find_edge(ibuprofen, nausea).unwrap().frequency, None);
    }

    #[test]
    fn test_malformed_frequency_does_not_fail_build() {
        let records = vec![
            AdverseEventRecord::raw("Aspirin", "Nausea", Some("often")),
            AdverseEventRecord::raw("Aspirin", "Rash", Some("2.5")),
        ];
        let graph = build_side_effect_graph(&records);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.statistics().edges_with_frequency, 1);
    }

    #[test]
    fn test_duplicate_rows_last_write_wins() {
        let records = vec![
            AdverseEventRecord::new("Aspirin", "Nausea", Some(10.0)),
            AdverseEventRecord::new("Aspirin", "Nausea", Some(30.0)),
        ];
        let graph = build_side_effect_graph(&records);
        let aspirin = graph.drug_id("Aspirin").unwrap();
        let nausea = graph.side_effect_id("Nausea").unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.find_edge(aspirin, nausea).unwrap().frequency, Some(30.0));
    }

    #[test]
    fn test_drug_and_side_effect_may_share_a_name() {
        let records = vec![
            AdverseEventRecord::new("Histamine", "Flushing", Some(1.0)),
            AdverseEventRecord::new("Loratadine", "Histamine", Some(2.0)),
        ];
        let graph = build_side_effect_graph(&records);

        assert_eq!(graph.node_count(), 4);
        assert!(graph.drug_id("Histamine").is_some());
        assert!(graph.side_effect_id("Histamine").is_some());
    }
}
