//! tuskguard-collar-sim - replay simulated collar telemetry
//!
//! Reads a collar simulation file (`{"data": [...]}`) and writes each report
//! as one JSON line at a fixed interval, ready to pipe into `tuskguard`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;
use tuskguard_gateway::CollarSimulation;

/// Replay simulated collar reports as JSON lines
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Collar simulation file
    file: PathBuf,

    /// Delay between reports in milliseconds
    #[arg(long, default_value = "5000")]
    interval_ms: u64,

    /// Replay the file this many times
    #[arg(long, default_value = "1")]
    repeat: usize,

    /// Verbose output on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let simulation = CollarSimulation::from_file(&args.file)
        .with_context(|| format!("Failed to load collar simulation: {:?}", args.file))?;

    let interval = Duration::from_millis(args.interval_ms);
    let mut out = BufWriter::new(tokio::io::stdout());
    let mut sent = 0usize;

    for _ in 0..args.repeat {
        for payload in simulation.payloads() {
            if sent > 0 && !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }

            out.write_all(payload.as_bytes()).await?;
            out.write_all(b"\n").await?;
            out.flush().await.context("Failed to write report")?;
            sent += 1;

            info!(report = sent, "Sent collar report");
        }
    }

    info!(total = sent, "Collar simulation finished");
    Ok(())
}
