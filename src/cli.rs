//! CLI arguments and subcommands for hwstats-collector.
//!
//! This module defines the command-line interface structure using the clap
//! library, including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "hwstats-collector",
    about = "Collection daemon for sysfs hardware health counters",
    long_about = "Collection daemon for sysfs hardware health counters.\n\n\
                  Periodically samples storage slow-I/O counts, the battery \
                  charge-cycle histogram, the audio codec failure flag, and \
                  speaker impedance from sysfs, and forwards the parsed values \
                  to the local telemetry collection service.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Root directory the sysfs source paths are resolved against
    #[arg(long)]
    pub sysfs_root: Option<PathBuf>,

    /// Unix socket of the telemetry collection service
    #[arg(long)]
    pub sink_socket: Option<PathBuf>,

    /// Seconds to wait after startup before the first collection cycle
    #[arg(long)]
    pub warmup_secs: Option<u64>,

    /// Seconds between collection cycles
    #[arg(long)]
    pub period_secs: Option<u64>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate source readability, sink availability, and configuration
    Check,

    /// Run a single collection cycle immediately
    Collect {
        /// Print reports to stdout instead of delivering them
        #[arg(long)]
        dry_run: bool,
    },
}
