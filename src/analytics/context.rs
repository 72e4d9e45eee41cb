//! Analytics context
//!
//! Everything the analytics queries read, built once per run and passed by
//! reference: the scored graph, its risk table and the side-effect lookup.
//! Deterministic centrality runs are memoized per configuration.

use super::{
    centrality_ranking, compare_pair, drug_profile, explore_range, generate_risk_hypotheses,
    polypharmacy_aggregate, safer_alternatives, AnalyticsResult, CentralityRanking, DrugProfile,
    PairComparison, PolypharmacyReport, RangeSummary, RiskHypothesis, SaferAlternative,
};
use crate::algo::BetweennessConfig;
use crate::graph::{build_side_effect_graph, SideEffectGraph};
use crate::ingest::{AdverseEventRecord, SideEffectLookup};
use crate::risk::{RiskScoreRecord, RiskScorer, RiskTable, ScoredGraph};
use std::collections::HashMap;
use tracing::debug;

pub struct AnalyticsContext {
    scored: ScoredGraph,
    risk_table: RiskTable,
    lookup: SideEffectLookup,
    centrality_cache: HashMap<BetweennessConfig, CentralityRanking>,
}

impl AnalyticsContext {
    /// Bundle a scored graph with a lookup; the risk table is derived from
    /// the scores.
    pub fn new(scored: ScoredGraph, lookup: SideEffectLookup) -> Self {
        let risk_table = scored.risk_table();
        Self::with_risk_table(scored, risk_table, lookup)
    }

    /// Use an externally supplied risk table, e.g. one read back from the
    /// exported CSV.
    pub fn with_risk_table(scored: ScoredGraph, risk_table: RiskTable, lookup: SideEffectLookup) -> Self {
        Self {
            scored,
            risk_table,
            lookup,
            centrality_cache: HashMap::new(),
        }
    }

    /// Build, score and index a record set in one go
    pub fn from_records(records: &[AdverseEventRecord]) -> Self {
        let scored = RiskScorer::new().apply(build_side_effect_graph(records));
        let lookup = SideEffectLookup::from_records(records);
        Self::new(scored, lookup)
    }

    pub fn scored(&self) -> &ScoredGraph {
        &self.scored
    }

    pub fn graph(&self) -> &SideEffectGraph {
        self.scored.graph()
    }

    pub fn risk_table(&self) -> &RiskTable {
        &self.risk_table
    }

    pub fn lookup(&self) -> &SideEffectLookup {
        &self.lookup
    }

    pub fn top_risks(&self, n: usize) -> Vec<RiskScoreRecord> {
        super::top_risks(&self.scored, n)
    }

    /// Drugs scoring in `[min, max]`; open bounds follow the table's extremes
    pub fn explore(&self, min: Option<f64>, max: Option<f64>) -> RangeSummary {
        explore_range(&self.risk_table, min, max)
    }

    pub fn drug_profile(&self, drug: &str) -> AnalyticsResult<DrugProfile> {
        drug_profile(&self.scored, drug)
    }

    pub fn safer_alternatives(&self, drug: &str) -> AnalyticsResult<Vec<SaferAlternative>> {
        safer_alternatives(drug, &self.risk_table, &self.lookup)
    }

    pub fn polypharmacy<S: AsRef<str>>(&self, drugs: &[S]) -> AnalyticsResult<PolypharmacyReport> {
        polypharmacy_aggregate(drugs, &self.risk_table, &self.lookup)
    }

    pub fn risk_hypotheses<S: AsRef<str>>(&self, drugs: &[S], min_overlap: usize) -> Vec<RiskHypothesis> {
        generate_risk_hypotheses(self.scored.graph(), drugs, min_overlap)
    }

    pub fn compare(&self, drug_a: &str, drug_b: &str) -> PairComparison {
        compare_pair(drug_a, drug_b, &self.risk_table, &self.lookup)
    }

    /// Centrality ranking for `config`.
    ///
    /// Deterministic configurations are computed once and served from the
    /// cache afterwards; unseeded sampled runs are recomputed on every call.
    pub fn centrality(&mut self, config: &BetweennessConfig) -> &CentralityRanking {
        let node_count = self.scored.graph().node_count();
        let graph = self.scored.graph();

        if !config.is_deterministic(node_count) {
            self.centrality_cache.remove(config);
        }

        self.centrality_cache.entry(*config).or_insert_with(|| {
            debug!("Computing centrality for {:?}", config);
            centrality_ranking(graph, config)
        })
    }

    pub fn cached_centrality_runs(&self) -> usize {
        self.centrality_cache.len()
    }
}
