//! SOS Sentinel CLI
//!
//! Runs a monitoring session against a mock or replayed classifier and
//! renders the gauge and event log to the terminal.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use sos_sentinel::{
    ChannelSink, Config, EventRecord, FixedLocation, LocationProvider, LocationSample, MockSource,
    Monitor, NoLocation, ObservationSource, ReplaySource, SessionSnapshot, TracingSink,
    MONITORING_NOTICE, VERSION,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sos-sentinel")]
#[command(version = VERSION)]
#[command(about = "Distress scoring and one-shot emergency alerting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a monitoring session
    Start {
        /// Where observations come from
        #[arg(long, value_enum, default_value_t = SourceKind::Mock)]
        source: SourceKind,

        /// JSON-lines fixture for the replay source
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Seed for the mock classifier
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many ticks (runs until Ctrl+C otherwise)
        #[arg(long)]
        ticks: Option<u32>,

        /// Alert threshold override
        #[arg(long)]
        threshold: Option<u32>,

        /// Tick interval override in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Latitude reported by the location capability
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude reported by the location capability
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Write the final session snapshot to the data directory
        #[arg(long)]
        export: bool,

        /// Explicit path for the exported snapshot (implies --export)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the monitoring notice
    Notice,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    Mock,
    Replay,
}

struct StartArgs {
    source: SourceKind,
    replay: Option<PathBuf>,
    seed: Option<u64>,
    ticks: Option<u32>,
    threshold: Option<u32>,
    interval_ms: Option<u64>,
    location: Option<(f64, f64)>,
    export: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            source,
            replay,
            seed,
            ticks,
            threshold,
            interval_ms,
            lat,
            lon,
            export,
            output,
        } => {
            let export = match (export, output) {
                (_, Some(path)) => Some(Some(path)),
                (true, None) => Some(None),
                (false, None) => None,
            };
            cmd_start(StartArgs {
                source,
                replay,
                seed,
                ticks,
                threshold,
                interval_ms,
                location: lat.zip(lon),
                export,
            })
            .await
        }
        Commands::Config => cmd_config(),
        Commands::Init { force } => cmd_init(force),
        Commands::Notice => {
            println!("{MONITORING_NOTICE}");
            Ok(())
        }
    }
}

async fn cmd_start(args: StartArgs) -> anyhow::Result<()> {
    println!("SOS Sentinel v{VERSION}");
    println!();

    let mut config = Config::load().context("loading configuration")?;
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(ms) = args.interval_ms {
        config.tick_interval = Duration::from_millis(ms);
    }
    if let Some((lat, lon)) = args.location {
        config.location = Some(LocationSample::new(lat, lon)?);
    }
    config.validate()?;

    let source: Box<dyn ObservationSource> = match args.source {
        SourceKind::Mock => match args.seed {
            Some(seed) => Box::new(MockSource::with_seed(seed)),
            None => Box::new(MockSource::new()),
        },
        SourceKind::Replay => {
            let Some(path) = args.replay.as_ref() else {
                bail!("--source replay requires --replay <PATH>");
            };
            let source = ReplaySource::from_path(path)
                .with_context(|| format!("reading replay fixture {path:?}"))?;
            println!("  Replaying {} observations from {:?}", source.remaining(), path);
            Box::new(source)
        }
    };

    let location: Arc<dyn LocationProvider> = match config.location {
        Some(sample) => Arc::new(FixedLocation(sample)),
        None => Arc::new(NoLocation),
    };

    println!("  Threshold: {}/{}", config.threshold, config.max_score);
    println!("  Tick interval: {}ms", config.tick_interval.as_millis());
    println!("  Emergency gestures: {}", config.emergency_gestures.join(", "));
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Alerts go to the log as well as the terminal
    let (sink, alerts) = ChannelSink::channel();
    let mut monitor = Monitor::new(&config, source, location, Arc::new((TracingSink, sink)));
    let mut updates = monitor.subscribe();

    let run_for = args
        .ticks
        .map(|n| config.tick_interval * n + config.tick_interval / 2);
    let deadline = async move {
        match run_for {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    monitor.start().await;
    let mut printed: HashSet<uuid::Uuid> = HashSet::new();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                render(&snapshot, &mut printed);
                for alert in alerts.try_iter() {
                    println!();
                    println!("  !!! {} {}", alert.title, alert.description);
                    println!();
                }
                if !snapshot.active {
                    break;
                }
            }
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    monitor.stop().await;
    let snapshot = monitor.snapshot().await;
    render(&snapshot, &mut printed);

    println!();
    println!("Final: {}", snapshot.gauge_line());
    println!("Events recorded: {}", snapshot.events.len());

    if let Some(output) = args.export {
        let path = output.unwrap_or_else(|| {
            config
                .data_path
                .join(format!("session_{}.json", Utc::now().format("%Y%m%d_%H%M%S")))
        });
        export_snapshot(&snapshot, &path)?;
        println!("Exported session snapshot to {path:?}");
    }

    Ok(())
}

/// Print records not yet shown (oldest first) followed by the gauge.
fn render(snapshot: &SessionSnapshot, printed: &mut HashSet<uuid::Uuid>) {
    let fresh: Vec<&EventRecord> = snapshot
        .events
        .iter()
        .filter(|r| !printed.contains(&r.id))
        .collect();
    if fresh.is_empty() {
        return;
    }

    for record in fresh.iter().rev() {
        println!("{}", record.display_line());
        printed.insert(record.id);
    }

    let emotion = snapshot
        .current_emotion
        .as_ref()
        .map(|e| format!("{} {}%", e.label, e.confidence_pct()))
        .unwrap_or_else(|| "-".to_string());
    let gesture = snapshot
        .current_gesture
        .as_ref()
        .map(|g| g.description())
        .unwrap_or("-");
    println!("    {} | {} | {}", snapshot.gauge_line(), emotion, gesture);
}

fn export_snapshot(snapshot: &SessionSnapshot, path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json).with_context(|| format!("writing {path:?}"))?;
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let config = Config::load()?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = Config::config_path();
    if path.exists() && !force {
        bail!("{path:?} already exists (use --force to overwrite)");
    }
    Config::default().save()?;
    println!("Wrote default configuration to {path:?}");
    Ok(())
}
