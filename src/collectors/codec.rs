//! Audio codec health collector.
//!
//! The codec driver latches a failure flag over the reporting window; any
//! value other than `"0"` means the codec failed since the last cycle.

use std::path::Path;

use super::{read_source, CollectorError};
use crate::sink::{HardwareComponent, HardwareErrorCode, StatsSink};

/// Sub-index distinguishing instances of one component; the platform has
/// a single codec.
const CODEC_INDEX: u32 = 0;

/// Reads the codec state flag and reports a hardware failure when it is
/// anything other than healthy. A healthy codec produces no report.
pub fn collect(path: &Path, sink: &mut dyn StatsSink) -> Result<(), CollectorError> {
    let raw = read_source(path)?;
    if raw.trim() == "0" {
        return Ok(());
    }

    sink.report_hardware_failure(
        HardwareComponent::Codec,
        CODEC_INDEX,
        HardwareErrorCode::Complete,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Report, RecordingConnector, SinkConnector};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn collect_state(state: &str) -> Vec<Report> {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", state).unwrap();

        let connector = RecordingConnector::new();
        let mut sink = connector.acquire().unwrap();
        collect(file.path(), sink.as_mut()).unwrap();
        drop(sink);

        connector.reports()
    }

    #[test]
    fn test_healthy_codec_reports_nothing() {
        assert!(collect_state("0").is_empty());
        assert!(collect_state("0\n").is_empty());
    }

    #[test]
    fn test_failed_codec_reports_exactly_once() {
        let expected = vec![Report::HardwareFailure {
            component: HardwareComponent::Codec,
            index: 0,
            code: HardwareErrorCode::Complete,
        }];
        assert_eq!(collect_state("1"), expected);
        assert_eq!(collect_state("3"), expected);
        assert_eq!(collect_state("error"), expected);
    }
}
