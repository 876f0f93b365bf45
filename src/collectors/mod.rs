//! Collectors for the monitored hardware statistics.
//!
//! One module per statistic kind: battery charge cycles, codec health,
//! storage slow-I/O counters, and speaker impedance. The fixed source
//! table and the per-cycle report dispatcher also live here.

pub mod charge_cycles;
pub mod codec;
pub mod slow_io;
pub mod speaker;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::sink::{IoOperation, SinkConnector, SinkError, StatsSink};

// Source paths, relative to the sysfs root so deployments and tests can
// redirect the whole set at once.
const SLOWIO_READ_CNT_PATH: &str = "sys/devices/platform/soc/1d84000.ufshc/slowio_read_cnt";
const SLOWIO_WRITE_CNT_PATH: &str = "sys/devices/platform/soc/1d84000.ufshc/slowio_write_cnt";
const SLOWIO_UNMAP_CNT_PATH: &str = "sys/devices/platform/soc/1d84000.ufshc/slowio_unmap_cnt";
const SLOWIO_SYNC_CNT_PATH: &str = "sys/devices/platform/soc/1d84000.ufshc/slowio_sync_cnt";

const CYCLE_COUNT_BINS_PATH: &str = "sys/class/power_supply/maxfg/cycle_counts_bins";

const IMPEDANCE_PATH: &str = "sys/class/misc/msm_cirrus_playback/resistance_left_right";
const CODEC_STATE_PATH: &str =
    "sys/devices/platform/soc/171c0000.slim/tavil-slim-pgd/tavil_codec/codec_state";

/// Parsing rule applied to one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Whitespace-separated bucket counts, forwarded as one comma-joined
    /// string.
    ChargeCycleHistogram,
    /// Single token, `"0"` when healthy.
    CodecFailureFlag,
    /// Single integer counter, rewritten to `"0"` after a successful read.
    SlowIoCounter(IoOperation),
    /// Two floating-point channel readings in ohms.
    SpeakerImpedance,
}

impl SourceKind {
    /// Whether the source file is reset after a successful read, so each
    /// cycle reports only newly accumulated events.
    pub fn clears_after_read(&self) -> bool {
        matches!(self, SourceKind::SlowIoCounter(_))
    }
}

/// A configured statistic: a file path bound to a parsing rule.
#[derive(Debug, Clone)]
pub struct StatSource {
    pub name: &'static str,
    pub path: PathBuf,
    pub kind: SourceKind,
}

/// Builds the fixed source table with every path resolved against
/// `sysfs_root`. Table order is reporting order.
pub fn source_table(sysfs_root: &Path) -> Vec<StatSource> {
    let entry = |name, rel: &str, kind| StatSource {
        name,
        path: sysfs_root.join(rel),
        kind,
    };

    vec![
        entry(
            "battery_charge_cycles",
            CYCLE_COUNT_BINS_PATH,
            SourceKind::ChargeCycleHistogram,
        ),
        entry("codec_state", CODEC_STATE_PATH, SourceKind::CodecFailureFlag),
        entry(
            "slowio_read",
            SLOWIO_READ_CNT_PATH,
            SourceKind::SlowIoCounter(IoOperation::Read),
        ),
        entry(
            "slowio_write",
            SLOWIO_WRITE_CNT_PATH,
            SourceKind::SlowIoCounter(IoOperation::Write),
        ),
        entry(
            "slowio_unmap",
            SLOWIO_UNMAP_CNT_PATH,
            SourceKind::SlowIoCounter(IoOperation::Unmap),
        ),
        entry(
            "slowio_sync",
            SLOWIO_SYNC_CNT_PATH,
            SourceKind::SlowIoCounter(IoOperation::Sync),
        ),
        entry("speaker_impedance", IMPEDANCE_PATH, SourceKind::SpeakerImpedance),
    ]
}

/// Errors that abort collection of a single source. The dispatcher logs
/// them and continues with the rest of the table.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("unable to read {}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse {raw:?} from {} as an integer", path.display())]
    ParseCount { path: PathBuf, raw: String },
    #[error("unable to parse impedance pair from {raw:?} in {}", path.display())]
    ParseImpedance { path: PathBuf, raw: String },
}

/// Reads the full contents of a source file.
pub(crate) fn read_source(path: &Path) -> Result<String, CollectorError> {
    fs::read_to_string(path).map_err(|source| CollectorError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and reports one source. An error covers exactly this source; no
/// partially parsed value is ever reported.
pub fn collect_source(source: &StatSource, sink: &mut dyn StatsSink) -> Result<(), CollectorError> {
    match source.kind {
        SourceKind::ChargeCycleHistogram => charge_cycles::collect(&source.path, sink),
        SourceKind::CodecFailureFlag => codec::collect(&source.path, sink),
        SourceKind::SlowIoCounter(operation) => slow_io::collect(&source.path, operation, sink),
        SourceKind::SpeakerImpedance => speaker::collect(&source.path, sink),
    }
}

/// Runs one full collection cycle: acquire a sink handle, walk the source
/// table in order, release the handle.
///
/// Sink acquisition failure aborts the cycle before any source file is
/// touched. A failing source never blocks the ones after it. The handle
/// is dropped unconditionally when the cycle ends.
pub fn run_cycle(sources: &[StatSource], connector: &dyn SinkConnector) -> Result<(), SinkError> {
    let mut sink = connector.acquire()?;

    for source in sources {
        if let Err(e) = collect_source(source, sink.as_mut()) {
            warn!("Skipping {} for this cycle: {}", source.name, e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_table_order_is_reporting_order() {
        let sources = source_table(Path::new("/"));
        let names: Vec<&str> = sources.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "battery_charge_cycles",
                "codec_state",
                "slowio_read",
                "slowio_write",
                "slowio_unmap",
                "slowio_sync",
                "speaker_impedance",
            ]
        );
    }

    #[test]
    fn test_source_table_resolves_against_root() {
        let sources = source_table(Path::new("/tmp/fake-sysfs"));
        assert!(sources
            .iter()
            .all(|s| s.path.starts_with("/tmp/fake-sysfs/sys")));
    }

    #[test]
    fn test_only_counters_clear_after_read() {
        for source in source_table(Path::new("/")) {
            let is_counter = matches!(source.kind, SourceKind::SlowIoCounter(_));
            assert_eq!(source.kind.clears_after_read(), is_counter);
        }
    }
}
