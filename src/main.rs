use anyhow::Context;
use sideeffectnet::{
    build_side_effect_graph, export_risk_scores, read_records, GraphSnapshot, RiskScorer,
    SideEffectNetConfig,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "sideeffectnet.yaml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = SideEffectNetConfig::load(&config_path)
        .with_context(|| format!("loading config {}", config_path))?;
    let data = &config.data;

    println!("SideEffectNet v{}", sideeffectnet::version());
    println!("==========================================");
    println!();

    // 1. Build the graph
    let records = read_records(&data.input_csv)
        .with_context(|| format!("reading {}", data.input_csv.display()))?;
    let graph = build_side_effect_graph(&records);

    println!("Total nodes: {}", graph.node_count());
    println!("Total edges: {}", graph.edge_count());

    for edge in graph.edges().take(5) {
        let source = graph.get_node(edge.source).map(|n| n.name()).unwrap_or_default();
        let target = graph.get_node(edge.target).map(|n| n.name()).unwrap_or_default();
        println!("{} --({})--> {}", source, edge.relation(), target);
    }

    // 2. Score drugs
    let scored = RiskScorer::new().apply(graph);

    // 3. Export scores
    let ranked = export_risk_scores(&scored, &data.risk_csv)
        .with_context(|| format!("writing {}", data.risk_csv.display()))?;

    // 4. Snapshot for visualization
    GraphSnapshot::from_scored(&scored, Some(data.snapshot_max_nodes))
        .write_json(&data.snapshot_json)
        .with_context(|| format!("writing {}", data.snapshot_json.display()))?;

    println!();
    println!("Top Drugs by Risk Score (Weighted by freq_pct):");
    for record in ranked.iter().take(config.analytics.top_k) {
        println!("{} - Risk Score: {:.2}", record.drug_name, record.risk_score);
    }

    Ok(())
}
