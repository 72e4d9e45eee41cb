//! SideEffectNet
//!
//! Drug safety analytics over a drug / side-effect graph built from
//! adverse-event reports.
//!
//! # Architecture
//!
//! - `ingest`: reads the cleaned `drug_name, side_effect, freq_pct` table
//! - `graph`: bipartite graph with typed (kind, name) node identity
//! - `risk`: per-drug risk scores and the exported risk table
//! - `analytics`: rankings, safer alternatives, polypharmacy, centrality,
//!   pairwise hypotheses
//! - `snapshot`: node/edge projection for visualization
//! - `narrative`: hypothesis text from a hosted or local LLM
//! - `config`: YAML run configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use sideeffectnet::{AdverseEventRecord, AnalyticsContext};
//!
//! let records = vec![
//!     AdverseEventRecord::new("Warfarin", "Bleeding", Some(0.9)),
//!     AdverseEventRecord::new("Warfarin", "Nausea", Some(0.7)),
//!     AdverseEventRecord::new("Aspirin", "Bleeding", Some(0.3)),
//! ];
//!
//! let ctx = AnalyticsContext::from_records(&records);
//! assert_eq!(ctx.risk_table().get("Warfarin"), Some(0.8));
//!
//! let safer = ctx.safer_alternatives("Warfarin").unwrap();
//! assert_eq!(safer[0].drug, "Aspirin");
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod analytics;
pub mod config;
pub mod graph;
pub mod ingest;
pub mod narrative;
pub mod risk;
pub mod snapshot;

// Re-export main types for convenience
pub use graph::{
    build_side_effect_graph, Edge, EdgeId, GraphBuilder, GraphError, GraphResult,
    GraphStatistics, Node, NodeId, NodeKey, NodeKind, SideEffectGraph,
};

pub use ingest::{
    read_records, read_records_from, AdverseEventRecord, IngestError, IngestResult,
    SideEffectLookup,
};

pub use risk::{
    export_risk_scores, read_risk_table, ExportError, ExportResult, RiskScoreRecord, RiskScorer,
    RiskScores, RiskTable, ScoredGraph,
};

pub use analytics::{
    AnalyticsContext, AnalyticsError, AnalyticsResult, CentralityRanking, DrugProfile,
    PairComparison, PolypharmacyReport, RiskHypothesis, RiskLevel, SaferAlternative,
};

pub use algo::BetweennessConfig;

pub use snapshot::{EdgeView, GraphSnapshot, NodeView};

pub use narrative::{
    LlmNarrativeClient, NarrativeError, NarrativeRequest, NarrativeResult, NarrativeService,
};

pub use config::{ConfigError, ConfigResult, LlmProvider, SideEffectNetConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
