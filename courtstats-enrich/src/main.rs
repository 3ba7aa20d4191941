//! courtstats-enrich - operator entry point
//!
//! Reads a player in display form, normalizes it into storage form, fills
//! missing fields from the knowledge base and prints the outcome.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courtstats_common::config::load_config;
use courtstats_common::normalize::{normalize_into_storage, normalize_to_display};
use courtstats_common::PlayerView;
use courtstats_enrich::knowledge_base::ClaimCache;
use courtstats_enrich::Enricher;

/// Command-line arguments for courtstats-enrich
#[derive(Parser, Debug)]
#[command(name = "courtstats-enrich")]
#[command(about = "Fill missing player fields from Wikidata")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "COURTSTATS_CONFIG")]
    config: Option<PathBuf>,

    /// Player JSON file in display form
    #[arg(short, long)]
    input: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let view: PlayerView = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid player JSON in {}", args.input.display()))?;

    let record = normalize_into_storage(&view);
    info!(player_id = %record.player_id, "Enriching player");

    let cache = Arc::new(ClaimCache::with_capacity_limit(
        config.knowledge_base.cache_max_entries,
    ));
    let enricher = Enricher::from_config(&config.knowledge_base, cache)
        .context("Failed to initialize knowledge base client")?;

    let outcome = enricher.enrich(record).await;
    info!(
        player_id = %outcome.record.player_id,
        changed = outcome.changed,
        "Enrichment complete"
    );

    let output = json!({
        "changed": outcome.changed,
        "record": outcome.record,
        "display": normalize_to_display(&outcome.record),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize outcome")?
    );

    Ok(())
}
