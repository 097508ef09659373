//! `faqmatch`: answer questions from the command line or stdin.
//!
//! Each query prints one JSON line: the ranked answer list, or
//! `{"query": ..., "error": ...}` when nothing cleared the threshold.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use faqmatch::{FaqConfig, MatchEngine, load_engine};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "faqmatch", version, about = "Answer free-text questions from FAQ sources")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, env = "FAQMATCH_CONFIG", default_value = "config/config.yaml")]
    config: PathBuf,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, env = "FAQMATCH_JSON_LOGS")]
    json_logs: bool,

    /// Seed the result cache with every corpus question before answering.
    #[arg(long)]
    warm_cache: bool,

    /// Queries to answer. Read one per line from stdin when none are given.
    queries: Vec<String>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn answer(engine: &MatchEngine, query: &str) -> anyhow::Result<String> {
    let line = match engine.find_best_answer(query) {
        Ok(results) => serde_json::to_string(&results)?,
        Err(err) if err.is_not_found() => {
            json!({ "query": query, "error": err.to_string() }).to_string()
        }
        Err(err) => return Err(err.into()),
    };
    Ok(line)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut config = FaqConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.matcher.warm_cache |= cli.warm_cache;

    let (engine, report) = load_engine(&config).await?;
    if report.loaded.is_empty() {
        tracing::warn!(failed = report.failed.len(), "no_sources_loaded");
    }

    if !cli.queries.is_empty() {
        for query in &cli.queries {
            println!("{}", answer(&engine, query)?);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        println!("{}", answer(&engine, &line)?);
    }
    Ok(())
}
