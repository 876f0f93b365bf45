//! Storage slow-I/O counter collector.
//!
//! The UFS host controller counts requests that exceeded its latency
//! threshold, one counter per operation kind. Counters accumulate between
//! cycles and are cleared after every successful read so each cycle
//! reports only new events.

use std::fs;
use std::path::Path;
use tracing::warn;

use super::{read_source, CollectorError};
use crate::sink::{IoOperation, StatsSink};

/// Reads one slow-I/O counter, reports it when nonzero, and clears it.
///
/// The counter is rewritten to `"0"` after any successful parse, a parsed
/// zero included, so the file always starts the next window normalized.
/// A failed reset write is logged but does not retract the report already
/// sent.
pub fn collect(
    path: &Path,
    operation: IoOperation,
    sink: &mut dyn StatsSink,
) -> Result<(), CollectorError> {
    let raw = read_source(path)?;
    let count: i64 = raw.trim().parse().map_err(|_| CollectorError::ParseCount {
        path: path.to_path_buf(),
        raw: raw.trim().to_string(),
    })?;

    if count > 0 {
        sink.report_slow_io(operation, count);
    }

    if let Err(e) = fs::write(path, "0") {
        warn!(
            "Unable to clear slow-I/O counter {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Report, RecordingConnector, SinkConnector};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn collect_counter(contents: &str) -> (Vec<Report>, String, bool) {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();

        let connector = RecordingConnector::new();
        let mut sink = connector.acquire().unwrap();
        let result = collect(file.path(), IoOperation::Read, sink.as_mut());
        drop(sink);

        let after = fs::read_to_string(file.path()).unwrap();
        (connector.reports(), after, result.is_ok())
    }

    #[test]
    fn test_nonzero_counter_is_reported_and_reset() {
        let (reports, after, ok) = collect_counter("5\n");
        assert!(ok);
        assert_eq!(
            reports,
            vec![Report::SlowIo {
                operation: IoOperation::Read,
                count: 5
            }]
        );
        assert_eq!(after, "0");
    }

    #[test]
    fn test_zero_counter_is_reset_without_report() {
        let (reports, after, ok) = collect_counter("0");
        assert!(ok);
        assert!(reports.is_empty());
        assert_eq!(after, "0");
    }

    #[test]
    fn test_unparseable_counter_is_skipped_and_left_alone() {
        let (reports, after, ok) = collect_counter("abc");
        assert!(!ok);
        assert!(reports.is_empty());
        assert_eq!(after, "abc");
    }
}
