//! ratio-loader: compute fundamental ratios for a NASDAQ-100 style dataset.
//!
//! Reads a wide CSV of raw statement line items, builds the metric table and
//! prints dashboard summaries, rankings or the long-format table as JSON.
//!
//! Usage:
//!   cargo run -p ratio-loader -- --input ndx.csv summary
//!   cargo run -p ratio-loader -- --input ndx.csv rank --metric debt_to_equity --sector Technology --limit 10
//!   cargo run -p ratio-loader -- --input ndx.csv export --from 2019 --to 2023 > rows.json
//!   cargo run -p ratio-loader -- --input ndx.csv options --sector Technology

mod cli;
mod ingest;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use fundamental_metrics::{Dataset, MetricEngine};
use ratio_core::ScoreThresholds;
use serde::Serialize;

use cli::{Cli, Command};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ratio_loader=info,fundamental_metrics=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let thresholds = ScoreThresholds::from_env().context("Invalid score thresholds in environment")?;
    let engine = MetricEngine::with_thresholds(thresholds)?;

    let records = ingest::read_records(&cli.input)?;
    let dataset = Dataset::new(records).context("Failed to build dataset")?;
    let table = engine.compute(&dataset);
    tracing::info!(
        companies = dataset.companies().count(),
        records = table.len(),
        "Metric table ready"
    );

    match &cli.command {
        Command::Summary(args) => match report::summary(&table, engine.thresholds(), args) {
            Some(summary) => print_json(&summary, cli.pretty)?,
            None => tracing::warn!("Dataset is empty, nothing to summarise"),
        },
        Command::Rank(args) => print_json(&report::ranked(&table, args), cli.pretty)?,
        Command::Export(args) => print_json(&report::export(&table, args), cli.pretty)?,
        Command::Options(args) => print_json(&report::options(&table, args), cli.pretty)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
