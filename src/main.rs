use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tuskguard_core::config::{AppConfig, LogFormat, LoggingConfig};
use tuskguard_core::station::StationRegistry;
use tuskguard_gateway::{
    CollarSimulation, FanoutNotifier, JsonLinesNotifier, LogNotifier, Notifier, StationGateway,
};

/// Tuskguard - wildlife geofence gateway for collar telemetry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "TUSKGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Station file (JSON or YAML); repeat for several stations
    #[arg(short, long = "station")]
    stations: Vec<PathBuf>,

    /// Replay a collar simulation file instead of reading JSON lines from stdin
    #[arg(short, long)]
    reports: Option<PathBuf>,

    /// Delay between replayed reports in milliseconds
    #[arg(long, default_value = "0")]
    interval_ms: u64,

    /// Append events to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the default communication radius in meters
    #[arg(long)]
    radius: Option<f64>,

    /// Override the log level
    #[arg(long, env = "TUSKGUARD_LOG")]
    log_level: Option<String>,

    /// Also log every published event
    #[arg(long)]
    log_events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_config_builder(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.logging);

    let station_files = if args.stations.is_empty() {
        config.stations.clone()
    } else {
        args.stations.clone()
    };
    let stations = StationRegistry::load(&station_files).context("Failed to load stations")?;

    let notifier = build_notifier(&config).context("Failed to open event output")?;
    let gateway = StationGateway::from_config(&config.monitoring, stations, notifier);

    info!(
        stations = gateway.stations().len(),
        radius_m = config.monitoring.communication_radius_meters,
        checked_zones = ?config.monitoring.checked_zones,
        "Tuskguard gateway started"
    );

    let interval = Duration::from_millis(args.interval_ms);
    tokio::select! {
        result = run(&gateway, args.reports.as_deref(), interval) => result?,
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal, stopping gateway...");
        }
    }

    info!(stats = %gateway.metrics().snapshot(), "Tuskguard gateway stopped");
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(radius) = args.radius {
        config.monitoring.communication_radius_meters = radius;
    }
    if let Some(path) = &args.output {
        config.output.file = Some(path.clone());
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.log_events {
        config.output.log_events = true;
    }
}

/// Logs go to stderr so stdout carries only telemetry events.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(logging.file_line)
        .with_line_number(logging.file_line);

    let _ = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}

fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>> {
    let events: Arc<dyn Notifier> = match &config.output.file {
        Some(path) => Arc::new(
            JsonLinesNotifier::append_to(path)
                .with_context(|| format!("Failed to open {:?}", path))?,
        ),
        None => Arc::new(JsonLinesNotifier::stdout()),
    };

    if config.output.log_events {
        Ok(Arc::new(FanoutNotifier::new(vec![events, Arc::new(LogNotifier)])))
    } else {
        Ok(events)
    }
}

async fn run(
    gateway: &StationGateway,
    replay: Option<&std::path::Path>,
    interval: Duration,
) -> Result<()> {
    match replay {
        Some(path) => {
            let simulation = CollarSimulation::from_file(path)
                .with_context(|| format!("Failed to load collar simulation: {:?}", path))?;
            info!(reports = simulation.len(), "Replaying collar simulation");

            for (i, payload) in simulation.payloads().enumerate() {
                if i > 0 && !interval.is_zero() {
                    tokio::time::sleep(interval).await;
                }
                handle_line(gateway, &payload);
            }
        }
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
                handle_line(gateway, &line);
            }
        }
    }
    Ok(())
}

fn handle_line(gateway: &StationGateway, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    // Undecodable lines are logged and counted by the gateway
    if let Ok(outcome) = gateway.handle_payload(line.as_bytes()) {
        debug!(
            subject = %outcome.subject,
            in_range = outcome.in_range_count(),
            breaches = outcome.breaches().count(),
            events = outcome.events_published(),
            "Report handled"
        );
    }
}
