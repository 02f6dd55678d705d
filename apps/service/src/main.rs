#![warn(clippy::all)]

mod config;
mod error;
mod monitoring;
mod ssh_config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use config::Settings;
use logger::init_tracing;
use monitoring::engine::ReachabilityEngine;
use monitoring::probe::TcpProbe;
use monitoring::scheduler::PollScheduler;
use monitoring::types::PollSnapshot;

/// SSH host reachability monitor.
///
/// Reads SSH-client config files, probes every enabled host on a schedule
/// and publishes an aggregate reachability snapshot.
#[derive(Debug, Parser)]
#[command(name = "sshpulse", version)]
struct Cli {
    /// Settings file (default: ~/.config/sshpulse/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single poll cycle, print the snapshot, and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings =
        Settings::from_config(cli.config.as_deref()).context("loading settings failed")?;
    info!(files = settings.config_files.len(), refresh = settings.refresh_interval().label(),
          "settings loaded");

    let engine = Arc::new(ReachabilityEngine::new(
        settings.config_files.clone(),
        Arc::new(settings.initial_overrides()),
        Arc::new(TcpProbe::new(settings.probe_timeout())),
        settings.overlap,
    ));

    if cli.once {
        let snapshot = engine.run_cycle().await;
        print_snapshot(&snapshot);
        return Ok(());
    }

    let mut scheduler = PollScheduler::new(Arc::clone(&engine));
    scheduler.start(settings.refresh_interval().duration());

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    info!("shutting down");
    scheduler.stop();

    Ok(())
}

fn print_snapshot(snapshot: &PollSnapshot) {
    for entry in &snapshot.hosts {
        let state = if !entry.enabled {
            "disabled"
        } else if entry.online {
            "online"
        } else {
            "offline"
        };
        println!("{:<24} {:<32} {:>5}  [{}]  {}", entry.host, entry.host_name, entry.port, entry.group, state);
    }
    println!("status: {}", snapshot.status);
}
