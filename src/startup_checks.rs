//! Startup validation for hwstats-collector.
//!
//! Probes the configured sources before the daemon enters its collection
//! loop. Nothing here is fatal: a missing source is simply skipped on
//! every cycle, and a stopped collection service only costs cycles until
//! it comes back.

use hwstats_collector::collectors::StatSource;
use nix::unistd::geteuid;
use std::fs;
use tracing::{info, warn};

/// Logs the accessibility of every configured source and whether counter
/// resets will be possible.
pub fn report_source_status(sources: &[StatSource]) {
    let mut readable = 0usize;

    for source in sources {
        match fs::metadata(&source.path) {
            Ok(_) => readable += 1,
            Err(e) => warn!(
                "Source {} not accessible at startup ({}): {}",
                source.name,
                source.path.display(),
                e
            ),
        }
    }

    info!(
        "{}/{} stat sources accessible at startup",
        readable,
        sources.len()
    );

    let has_counters = sources.iter().any(|s| s.kind.clears_after_read());
    if has_counters && !geteuid().is_root() {
        warn!("Not running as root - slow-I/O counter resets may fail");
    }
}
