//! hwstats-collector - version 0.1.0
//!
//! Hardware statistics collection daemon with tracing logging. This is
//! the main entry point that initializes logging, arms the collection
//! timer, and runs the periodic collection loop.

mod cli;
mod commands;
mod config;
mod startup_checks;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn, Level};

use hwstats_collector::collectors::{self, StatSource};
use hwstats_collector::schedule::{PeriodicTrigger, TriggerError};
use hwstats_collector::sink::UnixSocketConnector;

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_collect};
use config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_PERIOD_SECS,
    DEFAULT_SINK_SOCKET, DEFAULT_SYSFS_ROOT, DEFAULT_WARMUP_SECS,
};

/// Resolves the effective log level (CLI > config file > info).
fn effective_log_level(config: &Config, args: &Args) -> Level {
    if let Some(cli_level) = args.log_level {
        return match cli_level {
            LogLevel::Off => Level::ERROR,
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        };
    }

    match config.log_level.as_deref() {
        Some("off") | Some("error") => Level::ERROR,
        Some("warn") => Level::WARN,
        Some("debug") => Level::DEBUG,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config, args: &Args) {
    let log_level = effective_log_level(config, args);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {}", log_level);
}

/// The daemon's collection loop: wait for the next tick, run one cycle,
/// repeat. Only a timer failure breaks the loop.
fn collection_loop(
    trigger: PeriodicTrigger,
    sources: Vec<StatSource>,
    connector: UnixSocketConnector,
) -> Result<(), TriggerError> {
    loop {
        trigger.wait()?;
        info!("Collection cycle started");
        if let Err(e) = collectors::run_cycle(&sources, &connector) {
            warn!("Telemetry sink unavailable - skipping this cycle: {}", e);
        }
    }
}

/// Completes when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    let config = resolve_config(&args)?;

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&config, &args);

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::Check => command_check(&config),
            Commands::Collect { dry_run } => command_collect(*dry_run, &config),
        };
    }

    info!("Starting hwstats-collector");

    let sysfs_root = config
        .sysfs_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSFS_ROOT));
    let sources = collectors::source_table(&sysfs_root);
    startup_checks::report_source_status(&sources);

    let sink_socket = config
        .sink_socket
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SINK_SOCKET));
    let connector = UnixSocketConnector::new(sink_socket);

    let warmup = Duration::from_secs(config.warmup_secs.unwrap_or(DEFAULT_WARMUP_SECS));
    let period = Duration::from_secs(config.period_secs.unwrap_or(DEFAULT_PERIOD_SECS));

    // Arming the timer is the only fatal startup step; without a working
    // timer there is no fallback cadence.
    let trigger = match PeriodicTrigger::new(warmup, period) {
        Ok(trigger) => trigger,
        Err(e) => {
            error!("Unable to arm collection timer: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Collection timer armed: first cycle in {:?}, then every {:?}",
        warmup, period
    );

    let loop_task = tokio::task::spawn_blocking(move || collection_loop(trigger, sources, connector));

    tokio::select! {
        result = loop_task => {
            match result {
                Ok(Err(e)) => error!("Collection timer failed: {}", e),
                Ok(Ok(())) => error!("Collection loop exited unexpectedly"),
                Err(e) => error!("Collection loop panicked: {}", e),
            }
            std::process::exit(1);
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, exiting...");
            // The collection thread is parked in a timer wait for up to a
            // full period; exiting the process is what releases it.
            std::process::exit(0);
        }
    }
}
