//! WLAN Replay
//!
//! Replays a recorded session through the selection engine and prints every
//! selection and recovery trigger.
//!
//! # Usage
//!
//! ```bash
//! wlan-replay demos/roaming.json
//! wlan-replay --config engine.json --format json demos/roaming.json
//! ```

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wlan_engine::EngineConfig;

mod session;

use session::{Event, Replay, Session};

#[derive(Parser)]
#[command(name = "wlan-replay")]
#[command(version)]
#[command(about = "Replay a recorded WLAN session", long_about = None)]
struct Cli {
    /// Engine configuration file
    #[arg(long, env = "WLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Session file
    session: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            tracing::warn!("no config given, using defaults");
            EngineConfig::default()
        }
    };

    let content = std::fs::read_to_string(&cli.session)
        .with_context(|| format!("reading session {}", cli.session.display()))?;
    let session: Session = serde_json::from_str(&content)
        .with_context(|| format!("parsing session {}", cli.session.display()))?;
    tracing::info!(
        profiles = session.profiles.len(),
        steps = session.steps.len(),
        "replaying session"
    );

    for event in Replay::run(config, session)? {
        print_event(&event, cli.format)?;
    }
    Ok(())
}

fn print_event(event: &Event, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
        OutputFormat::Text => match event {
            Event::Observed {
                step,
                new_bssids,
                evicted,
            } => println!("[{step:>4}] scan: {new_bssids} new, {evicted} evicted"),
            Event::Selected {
                step,
                candidate: Some(candidate),
            } => {
                let kind = if candidate.is_saved() { "saved" } else { "opportunistic" };
                let observation = candidate.observation();
                println!(
                    "[{step:>4}] select: {} {} ({kind}, score {})",
                    observation.ssid,
                    observation.bssid,
                    candidate.score()
                );
            }
            Event::Selected {
                step,
                candidate: None,
            } => println!("[{step:>4}] select: none"),
            Event::Triggered { step, trigger } => println!(
                "[{step:>4}] recovery: triggered {} after {} failure, {} access points",
                trigger.id, trigger.last_failure, trigger.tracked
            ),
        },
    }
    Ok(())
}
