//! `ratewin`: trailing-window aggregates for a rate series.
//!
//! Loads a JSON or binary series (optionally through the content-hash
//! cache), validates it, computes every requested lookback and prints a
//! JSON report. Timings go to stderr through `tracing`; set `RUST_LOG`
//! to change verbosity.

mod args;
mod report;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let report = report::run(&cli)?;
    let json = serde_json::to_string_pretty(&report).context("cannot serialize report")?;

    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("cannot write report to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
