//! Collect command implementation.
//!
//! Runs one collection cycle immediately, outside the daemon schedule.
//! Useful for verifying a deployment without waiting out the warm-up
//! delay or the 24 hour period.

use std::path::PathBuf;

use hwstats_collector::collectors::{run_cycle, source_table};
use hwstats_collector::sink::{RecordingConnector, UnixSocketConnector};

use crate::config::{Config, DEFAULT_SINK_SOCKET, DEFAULT_SYSFS_ROOT};

/// Runs a single collection cycle. With `dry_run`, reports are printed to
/// stdout as JSON lines instead of being delivered to the service.
pub fn command_collect(dry_run: bool, config: &Config) -> anyhow::Result<()> {
    let sysfs_root = config
        .sysfs_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSFS_ROOT));
    let sources = source_table(&sysfs_root);

    if dry_run {
        let connector = RecordingConnector::new();
        run_cycle(&sources, &connector)?;

        for report in connector.reports() {
            println!("{}", serde_json::to_string(&report)?);
        }
        return Ok(());
    }

    let sink_socket = config
        .sink_socket
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SINK_SOCKET));
    let connector = UnixSocketConnector::new(sink_socket);

    match run_cycle(&sources, &connector) {
        Ok(()) => {
            println!("✅ Collection cycle completed");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
