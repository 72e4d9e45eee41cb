//! SideEffectNet CLI: drug safety queries over an adverse-event table
//!
//! Builds the graph from the configured CSV on every invocation and answers
//! one query.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use sideeffectnet::{
    build_side_effect_graph, export_risk_scores, read_records, read_risk_table, AnalyticsContext,
    BetweennessConfig, GraphSnapshot, LlmNarrativeClient, NarrativeService, NodeKind, RiskScorer,
    SideEffectLookup, SideEffectNetConfig,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared effects sent along with a narrative request
const NARRATIVE_MAX_EFFECTS: usize = 10;

#[derive(Parser)]
#[command(name = "sideeffectnet", version, about = "SideEffectNet drug safety analytics")]
struct Cli {
    /// YAML configuration file
    #[arg(long, default_value = "sideeffectnet.yaml", global = true, env = "SIDEEFFECTNET_CONFIG")]
    config: PathBuf,

    /// Adverse-event CSV (overrides the config)
    #[arg(long, global = true, env = "SIDEEFFECTNET_INPUT")]
    input: Option<PathBuf>,

    /// Use a previously exported risk table instead of rescoring
    #[arg(long, global = true)]
    risk_table: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Riskiest drugs
    Top {
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Drugs whose risk score lies in a band
    Explore {
        /// Lower bound (defaults to the lowest score)
        #[arg(long)]
        min: Option<f64>,
        /// Upper bound (defaults to the highest score)
        #[arg(long)]
        max: Option<f64>,
    },
    /// Risk score and side effects of one drug
    Lookup { drug: String },
    /// Lower-risk drugs sharing side effects with DRUG
    Alternatives { drug: String },
    /// Combined side effects and risk of several drugs
    Polypharmacy {
        #[arg(required = true, num_args = 2..)]
        drugs: Vec<String>,
    },
    /// Most central drugs and side effects
    Centrality {
        #[arg(short, long)]
        k: Option<usize>,
        /// Number of pivot nodes (overrides the config)
        #[arg(long, conflicts_with = "exact")]
        sample_size: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Use every node as a pivot
        #[arg(long)]
        exact: bool,
    },
    /// Drug pairs sharing many side effects
    Hypotheses {
        #[arg(required = true, num_args = 2..)]
        drugs: Vec<String>,
        #[arg(long)]
        min_overlap: Option<usize>,
    },
    /// Compare two drugs
    Compare { drug_a: String, drug_b: String },
    /// Ask the configured LLM for interaction hypotheses
    Narrate { drug_a: String, drug_b: String },
    /// Write the risk table and graph snapshot
    Export {
        #[arg(long)]
        risk_csv: Option<PathBuf>,
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SideEffectNetConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(input) = cli.input {
        config.data.input_csv = input;
    }

    let mut ctx = load_context(&config, cli.risk_table.as_deref())?;
    let format = &cli.format;
    let top_k = config.analytics.top_k;

    match cli.command {
        Commands::Top { n } => run_top(&ctx, n.unwrap_or(top_k), format),
        Commands::Explore { min, max } => run_explore(&ctx, min, max, format),
        Commands::Lookup { drug } => run_lookup(&ctx, &drug, format),
        Commands::Alternatives { drug } => run_alternatives(&ctx, &drug, format),
        Commands::Polypharmacy { drugs } => run_polypharmacy(&ctx, &drugs, format),
        Commands::Centrality { k, sample_size, seed, exact } => {
            let betweenness = if exact {
                BetweennessConfig::exact()
            } else {
                let mut analytics = config.analytics.clone();
                if sample_size.is_some() {
                    analytics.centrality_sample_size = sample_size;
                }
                if seed.is_some() {
                    analytics.centrality_seed = seed;
                }
                analytics.betweenness()
            };
            run_centrality(&mut ctx, &betweenness, k.unwrap_or(top_k), format)
        }
        Commands::Hypotheses { drugs, min_overlap } => {
            let min_overlap = min_overlap.unwrap_or(config.analytics.min_overlap);
            run_hypotheses(&ctx, &drugs, min_overlap, format)
        }
        Commands::Compare { drug_a, drug_b } => run_compare(&ctx, &drug_a, &drug_b, format),
        Commands::Narrate { drug_a, drug_b } => run_narrate(&ctx, &config, &drug_a, &drug_b).await,
        Commands::Export { risk_csv, snapshot } => {
            let risk_csv = risk_csv.unwrap_or_else(|| config.data.risk_csv.clone());
            let snapshot = snapshot.unwrap_or_else(|| config.data.snapshot_json.clone());
            run_export(&ctx, &risk_csv, &snapshot, config.data.snapshot_max_nodes)
        }
    }
}

fn load_context(config: &SideEffectNetConfig, risk_table: Option<&Path>) -> anyhow::Result<AnalyticsContext> {
    let input = &config.data.input_csv;
    let records = read_records(input).with_context(|| format!("reading {}", input.display()))?;

    let ctx = match risk_table {
        Some(path) => {
            let table = read_risk_table(path).with_context(|| format!("reading {}", path.display()))?;
            let scored = RiskScorer::new().apply(build_side_effect_graph(&records));
            AnalyticsContext::with_risk_table(scored, table, SideEffectLookup::from_records(&records))
        }
        None => AnalyticsContext::from_records(&records),
    };
    Ok(ctx)
}

fn run_top(ctx: &AnalyticsContext, n: usize, format: &OutputFormat) -> anyhow::Result<()> {
    let top = ctx.top_risks(n);
    let rows = top
        .iter()
        .enumerate()
        .map(|(i, r)| vec![(i + 1).to_string(), r.drug_name.clone(), format!("{:.4}", r.risk_score)])
        .collect();
    emit(format, serde_json::to_value(&top)?, &["rank", "drug_name", "risk_score"], rows)
}

fn run_explore(
    ctx: &AnalyticsContext,
    min: Option<f64>,
    max: Option<f64>,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let summary = ctx.explore(min, max);

    if let OutputFormat::Table = format {
        match (summary.average_risk, summary.risk_level) {
            (Some(average), Some(level)) => println!(
                "{} drugs in [{:.4}, {:.4}], average risk {:.3} ({})",
                summary.count, summary.min, summary.max, average, level
            ),
            _ => println!("No drugs in [{:.4}, {:.4}]", summary.min, summary.max),
        }
    }
    let rows = summary
        .top
        .iter()
        .enumerate()
        .map(|(i, r)| vec![(i + 1).to_string(), r.drug_name.clone(), format!("{:.4}", r.risk_score)])
        .collect();
    emit(format, serde_json::to_value(&summary)?, &["rank", "drug_name", "risk_score"], rows)
}

fn run_lookup(ctx: &AnalyticsContext, drug: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let profile = ctx.drug_profile(drug)?;

    if let OutputFormat::Table = format {
        println!("{}: risk {:.4} ({})", profile.drug, profile.risk_score, profile.risk_level);
    }
    let rows = profile
        .side_effects
        .iter()
        .map(|e| vec![e.name.clone(), format_optional(e.frequency)])
        .collect();
    emit(format, serde_json::to_value(&profile)?, &["side_effect", "freq_pct"], rows)
}

fn run_alternatives(ctx: &AnalyticsContext, drug: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let alternatives = ctx.safer_alternatives(drug)?;
    let rows = alternatives
        .iter()
        .map(|a| {
            vec![
                a.drug.clone(),
                a.overlap_count.to_string(),
                format!("{:.4}", a.risk_score),
                format!("{:.4}", a.risk_reduction),
            ]
        })
        .collect();
    emit(
        format,
        serde_json::to_value(&alternatives)?,
        &["drug", "shared_effects", "risk_score", "risk_reduction"],
        rows,
    )
}

fn run_polypharmacy(ctx: &AnalyticsContext, drugs: &[String], format: &OutputFormat) -> anyhow::Result<()> {
    let report = ctx.polypharmacy(drugs)?;
    let rows = vec![
        vec!["drugs".to_string(), report.drugs.join("; ")],
        vec!["average_risk".to_string(), format!("{:.4}", report.average_risk)],
        vec!["max_risk".to_string(), format!("{:.4}", report.max_risk)],
        vec!["risk_level".to_string(), report.risk_level.to_string()],
        vec!["combined_effects".to_string(), report.combined_effects.len().to_string()],
        vec!["overlap_effects".to_string(), report.overlap_effects.join("; ")],
    ];
    emit(format, serde_json::to_value(&report)?, &["metric", "value"], rows)
}

fn run_centrality(
    ctx: &mut AnalyticsContext,
    config: &BetweennessConfig,
    k: usize,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let ranking = ctx.centrality(config);
    let top: Vec<_> = ranking
        .top(NodeKind::Drug, k)
        .into_iter()
        .chain(ranking.top(NodeKind::SideEffect, k))
        .collect();

    let rows = top
        .iter()
        .map(|s| vec![s.kind.as_str().to_string(), s.name.clone(), format!("{:.6}", s.score)])
        .collect();
    emit(format, serde_json::to_value(&top)?, &["kind", "name", "betweenness"], rows)
}

fn run_hypotheses(
    ctx: &AnalyticsContext,
    drugs: &[String],
    min_overlap: usize,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let hypotheses = ctx.risk_hypotheses(drugs, min_overlap);
    let rows = hypotheses
        .iter()
        .map(|h| {
            vec![
                format!("{} + {}", h.drug_pair.0, h.drug_pair.1),
                h.overlap_count.to_string(),
                h.top_effects_summary(),
            ]
        })
        .collect();
    emit(
        format,
        serde_json::to_value(&hypotheses)?,
        &["drug_pair", "overlap_count", "top_shared_effects"],
        rows,
    )
}

fn run_compare(ctx: &AnalyticsContext, drug_a: &str, drug_b: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let comparison = ctx.compare(drug_a, drug_b);
    let rows = vec![
        vec![comparison.drug_a.clone(), format!("{:.4}", comparison.risk_a)],
        vec![comparison.drug_b.clone(), format!("{:.4}", comparison.risk_b)],
        vec!["shared_effects".to_string(), comparison.overlap_count().to_string()],
    ];
    emit(format, serde_json::to_value(&comparison)?, &["item", "value"], rows)
}

async fn run_narrate(
    ctx: &AnalyticsContext,
    config: &SideEffectNetConfig,
    drug_a: &str,
    drug_b: &str,
) -> anyhow::Result<()> {
    let request = ctx.compare(drug_a, drug_b).narrative_request(NARRATIVE_MAX_EFFECTS);
    let client = LlmNarrativeClient::new(&config.narrative)?;
    let text = client.narrate(&request).await?;
    println!("{}", text.trim());
    Ok(())
}

fn run_export(
    ctx: &AnalyticsContext,
    risk_csv: &Path,
    snapshot: &Path,
    max_nodes: usize,
) -> anyhow::Result<()> {
    let written = export_risk_scores(ctx.scored(), risk_csv)
        .with_context(|| format!("writing {}", risk_csv.display()))?;
    GraphSnapshot::from_scored(ctx.scored(), Some(max_nodes))
        .write_json(snapshot)
        .with_context(|| format!("writing {}", snapshot.display()))?;

    println!("Wrote {} risk scores to {}", written.len(), risk_csv.display());
    println!("Wrote graph snapshot to {}", snapshot.display());
    Ok(())
}

fn emit(
    format: &OutputFormat,
    json: serde_json::Value,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Csv => {
            println!("{}", headers.join(","));
            for row in &rows {
                let cells: Vec<String> = row.iter().map(|c| format_csv_value(c)).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(headers);
            let count = rows.len();
            for row in rows {
                table.add_row(row);
            }

            println!("{}", table);
            println!("{} row(s)", count);
        }
    }

    Ok(())
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
