use async_trait::async_trait;
use sideeffectnet::analytics::{centrality_ranking, RiskLevel};
use sideeffectnet::{
    read_records_from, AnalyticsContext, AnalyticsError, BetweennessConfig, NarrativeRequest,
    NarrativeResult, NarrativeService,
};
use std::sync::Mutex;

const TABLE: &str = "\
drug_name,side_effect,freq_pct
Warfarin,Bleeding,0.9
Warfarin,Bruising,0.8
Warfarin,Nausea,0.7
Aspirin,Bleeding,0.5
Aspirin,Nausea,0.3
Aspirin,Tinnitus,0.1
Ibuprofen,Nausea,0.4
Ibuprofen,Bruising,0.6
Heparin,Bleeding,0.95
Heparin,Bruising,0.95
Loratadine,Drowsiness,0.2
";

fn context() -> AnalyticsContext {
    let records = read_records_from(TABLE.as_bytes()).unwrap();
    AnalyticsContext::from_records(&records)
}

#[test]
fn test_top_risks() {
    let ctx = context();
    let top = ctx.top_risks(2);
    let names: Vec<&str> = top.iter().map(|r| r.drug_name.as_str()).collect();
    assert_eq!(names, vec!["Heparin", "Warfarin"]);
    assert_eq!(ctx.top_risks(100).len(), 5);
}

#[test]
fn test_explore_band() {
    let ctx = context();
    // Heparin 0.95, Warfarin 0.8, Ibuprofen 0.5, Aspirin 0.3, Loratadine 0.2
    let summary = ctx.explore(Some(0.3), Some(0.8));
    assert_eq!(summary.count, 3);
    assert!((summary.average_risk.unwrap() - 1.6 / 3.0).abs() < 1e-9);
    assert_eq!(summary.risk_level, Some(RiskLevel::Medium));
    let names: Vec<&str> = summary.top.iter().map(|r| r.drug_name.as_str()).collect();
    assert_eq!(names, vec!["Warfarin", "Ibuprofen", "Aspirin"]);

    assert_eq!(ctx.explore(None, None).count, 5);
}

#[test]
fn test_safer_alternatives_for_warfarin() {
    let ctx = context();
    let alternatives = ctx.safer_alternatives("Warfarin").unwrap();
    let names: Vec<&str> = alternatives.iter().map(|a| a.drug.as_str()).collect();

    // Aspirin (0.3) and Ibuprofen (0.5) share two effects each; Heparin is
    // riskier and Loratadine shares nothing
    assert_eq!(names, vec!["Aspirin", "Ibuprofen"]);
    assert!(alternatives.iter().all(|a| a.risk_score < 0.8));
}

#[test]
fn test_unknown_drug_errors() {
    let ctx = context();
    assert_eq!(
        ctx.safer_alternatives("Nothing").unwrap_err(),
        AnalyticsError::UnknownDrug("Nothing".to_string())
    );
    assert!(ctx.drug_profile("Nothing").is_err());
}

#[test]
fn test_polypharmacy_report() {
    let ctx = context();
    let report = ctx.polypharmacy(&["Warfarin", "Aspirin", "Ibuprofen"]).unwrap();

    assert_eq!(report.overlap_effects, vec!["Nausea"]);
    assert_eq!(report.combined_effects.len(), 4);
    assert!((report.average_risk - 1.6 / 3.0).abs() < 1e-9);
    assert_eq!(report.max_risk, 0.8);
    assert_eq!(report.risk_level, RiskLevel::Medium);

    assert!(matches!(
        ctx.polypharmacy(&["Warfarin"]),
        Err(AnalyticsError::NotEnoughDrugs { .. })
    ));
}

#[test]
fn test_hypotheses_filter_and_order() {
    let ctx = context();
    let drugs = ["Aspirin", "Heparin", "Warfarin", "Loratadine"];
    let hypotheses = ctx.risk_hypotheses(&drugs, 2);

    let pairs: Vec<(&str, &str, usize)> = hypotheses
        .iter()
        .map(|h| (h.drug_pair.0.as_str(), h.drug_pair.1.as_str(), h.overlap_count))
        .collect();
    assert_eq!(
        pairs,
        vec![("Aspirin", "Warfarin", 2), ("Heparin", "Warfarin", 2)]
    );

    let top = &hypotheses[1].top_shared_effects;
    assert_eq!(top[0].side_effect, "Bleeding");
    assert_eq!(top[0].average_frequency, 0.925);
}

#[test]
fn test_centrality_is_deterministic_and_cached() {
    let mut ctx = context();
    let exact = BetweennessConfig::exact();

    let direct = centrality_ranking(ctx.graph(), &exact);
    let cached = ctx.centrality(&exact).clone();
    assert_eq!(direct, cached);
    assert_eq!(ctx.cached_centrality_runs(), 1);

    let top_effect = &cached.top_side_effects(1)[0];
    assert!(top_effect.score > 0.0);
    // Loratadine's component is a single edge
    let loratadine = ctx.graph().drug_id("Loratadine").unwrap();
    assert_eq!(cached.get(loratadine), Some(0.0));
}

#[test]
fn test_seeded_sampling_is_reproducible() {
    let ctx = context();
    let sampled = BetweennessConfig::sampled(4, Some(11));

    let first = centrality_ranking(ctx.graph(), &sampled);
    let second = centrality_ranking(ctx.graph(), &sampled);
    assert_eq!(first, second);
}

#[test]
fn test_drug_profile_and_comparison() {
    let ctx = context();
    let profile = ctx.drug_profile("Warfarin").unwrap();
    assert_eq!(profile.risk_score, 0.8);
    assert_eq!(profile.risk_level, RiskLevel::High);
    assert_eq!(profile.side_effects.len(), 3);

    let comparison = ctx.compare("Warfarin", "Heparin");
    assert_eq!(comparison.shared_effects, vec!["Bleeding", "Bruising"]);
    assert_eq!(comparison.risk_b, 0.95);

    let unknown = ctx.compare("Warfarin", "Nothing");
    assert_eq!(unknown.risk_b, 0.0);
    assert_eq!(unknown.overlap_count(), 0);
}

struct RecordingService {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl NarrativeService for RecordingService {
    async fn narrate(&self, request: &NarrativeRequest) -> NarrativeResult<String> {
        let prompt = request.render_prompt();
        self.prompts.lock().unwrap().push(prompt);
        Ok(format!("{} hypotheses", request.overlap_count))
    }
}

#[tokio::test]
async fn test_narrative_request_flow() {
    let ctx = context();
    let service = RecordingService {
        prompts: Mutex::new(Vec::new()),
    };

    let request = ctx.compare("Warfarin", "Aspirin").narrative_request(10);
    let text = service.narrate(&request).await.unwrap();
    assert_eq!(text, "2 hypotheses");

    let prompts = service.prompts.lock().unwrap();
    assert!(prompts[0].contains("Warfarin (Risk: 0.80) + Aspirin (Risk: 0.30)"));
    assert!(prompts[0].contains("Bleeding, Nausea"));
}
