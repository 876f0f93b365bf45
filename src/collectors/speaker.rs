//! Speaker impedance collector.
//!
//! The amplifier driver stores the last measured impedance of the left
//! and right speakers as two floating-point ohm values. Both channels are
//! reported independently, converted to milliohms.

use std::path::Path;

use super::{read_source, CollectorError};
use crate::sink::StatsSink;

/// Ohms to milliohms.
const MILLIOHM_SCALE: f32 = 1000.0;

/// Splits a raw reading into its two channel values. Comma and whitespace
/// separators are both accepted. Anything other than exactly two parseable
/// values is rejected.
pub fn parse_impedance_pair(raw: &str) -> Option<(f32, f32)> {
    let mut values = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty());

    let left = values.next()?.parse().ok()?;
    let right = values.next()?.parse().ok()?;
    if values.next().is_some() {
        return None;
    }
    Some((left, right))
}

/// Reads both speaker impedance channels and reports them in milliohms.
/// Either channel failing to parse drops the whole reading.
pub fn collect(path: &Path, sink: &mut dyn StatsSink) -> Result<(), CollectorError> {
    let raw = read_source(path)?;
    let (left, right) =
        parse_impedance_pair(&raw).ok_or_else(|| CollectorError::ParseImpedance {
            path: path.to_path_buf(),
            raw: raw.trim().to_string(),
        })?;

    sink.report_speaker_impedance(0, (left * MILLIOHM_SCALE).round() as i32);
    sink.report_speaker_impedance(1, (right * MILLIOHM_SCALE).round() as i32);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Report, RecordingConnector, SinkConnector};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_impedance_pair() {
        assert_eq!(parse_impedance_pair("4.5,5.25"), Some((4.5, 5.25)));
        assert_eq!(parse_impedance_pair("3.9 4.1\n"), Some((3.9, 4.1)));
        assert_eq!(parse_impedance_pair("4.5, 5.25"), Some((4.5, 5.25)));
        assert_eq!(parse_impedance_pair("4.5"), None);
        assert_eq!(parse_impedance_pair("a,b"), None);
        assert_eq!(parse_impedance_pair("1.0,2.0,3.0"), None);
        assert_eq!(parse_impedance_pair(""), None);
    }

    #[test]
    fn test_collect_reports_both_channels_scaled() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "4.5,5.25\n").unwrap();

        let connector = RecordingConnector::new();
        let mut sink = connector.acquire().unwrap();
        collect(file.path(), sink.as_mut()).unwrap();
        drop(sink);

        assert_eq!(
            connector.reports(),
            vec![
                Report::SpeakerImpedance {
                    channel: 0,
                    milliohms: 4500
                },
                Report::SpeakerImpedance {
                    channel: 1,
                    milliohms: 5250
                },
            ]
        );
    }

    #[test]
    fn test_collect_rejects_single_channel_reading() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "4.5").unwrap();

        let connector = RecordingConnector::new();
        let mut sink = connector.acquire().unwrap();
        let result = collect(file.path(), sink.as_mut());
        drop(sink);

        assert!(result.is_err());
        assert!(connector.reports().is_empty());
    }
}
