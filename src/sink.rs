//! Telemetry sink interface.
//!
//! The collection service that ultimately stores hardware statistics runs
//! out of process; this module defines the reporting boundary the
//! collectors talk to. A [`SinkConnector`] hands out one [`StatsSink`]
//! handle per collection cycle, and dropping the handle releases it.
//! Report calls are fire-and-forget: delivery problems are logged, never
//! surfaced to the caller.

use serde::Serialize;
use std::io::{LineWriter, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

/// I/O operation kinds for slow-I/O reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IoOperation {
    Read,
    Write,
    Unmap,
    Sync,
}

/// Hardware components that can be named in a failure report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareComponent {
    Codec,
}

/// Error codes attached to hardware failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareErrorCode {
    /// The component failed completely.
    Complete,
}

/// One report as delivered to the collection service.
///
/// On the wire each report is a single JSON object on its own line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Report {
    ChargeCycles {
        histogram: String,
    },
    HardwareFailure {
        component: HardwareComponent,
        index: u32,
        code: HardwareErrorCode,
    },
    SlowIo {
        operation: IoOperation,
        count: i64,
    },
    SpeakerImpedance {
        channel: u32,
        milliohms: i32,
    },
}

/// Fire-and-forget reporting operations of the telemetry service, one per
/// metric kind. No report returns an acknowledgment.
pub trait StatsSink {
    fn report_charge_cycles(&mut self, histogram: &str);
    fn report_hardware_failure(
        &mut self,
        component: HardwareComponent,
        index: u32,
        code: HardwareErrorCode,
    );
    fn report_slow_io(&mut self, operation: IoOperation, count: i64);
    fn report_speaker_impedance(&mut self, channel: u32, milliohms: i32);
}

/// Sink acquisition failure. This aborts a collection cycle but is never
/// fatal; the next cycle retries from scratch.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot connect to telemetry service at {}: {}", path.display(), source)]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Hands out a fresh sink handle for each collection cycle. Handles are
/// released by dropping them; release never fails observably.
pub trait SinkConnector {
    fn acquire(&self) -> Result<Box<dyn StatsSink>, SinkError>;
}

/// Production connector: a best-effort, non-blocking connect to the
/// collection service's Unix socket. Fails immediately when the service
/// is not currently running.
pub struct UnixSocketConnector {
    socket_path: PathBuf,
}

impl UnixSocketConnector {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }
}

impl SinkConnector for UnixSocketConnector {
    fn acquire(&self) -> Result<Box<dyn StatsSink>, SinkError> {
        match UnixStream::connect(&self.socket_path) {
            Ok(stream) => Ok(Box::new(UnixSocketSink::new(stream))),
            Err(source) => Err(SinkError::Unavailable {
                path: self.socket_path.clone(),
                source,
            }),
        }
    }
}

/// Sink handle writing newline-delimited JSON to the service socket.
pub struct UnixSocketSink {
    writer: LineWriter<UnixStream>,
}

impl UnixSocketSink {
    fn new(stream: UnixStream) -> Self {
        Self {
            writer: LineWriter::new(stream),
        }
    }

    fn send(&mut self, report: &Report) {
        match serde_json::to_string(report) {
            Ok(line) => {
                if let Err(e) = writeln!(self.writer, "{}", line) {
                    warn!("Failed to deliver report to telemetry service: {}", e);
                }
            }
            Err(e) => warn!("Failed to encode report {:?}: {}", report, e),
        }
    }
}

impl StatsSink for UnixSocketSink {
    fn report_charge_cycles(&mut self, histogram: &str) {
        self.send(&Report::ChargeCycles {
            histogram: histogram.to_string(),
        });
    }

    fn report_hardware_failure(
        &mut self,
        component: HardwareComponent,
        index: u32,
        code: HardwareErrorCode,
    ) {
        self.send(&Report::HardwareFailure {
            component,
            index,
            code,
        });
    }

    fn report_slow_io(&mut self, operation: IoOperation, count: i64) {
        self.send(&Report::SlowIo { operation, count });
    }

    fn report_speaker_impedance(&mut self, channel: u32, milliohms: i32) {
        self.send(&Report::SpeakerImpedance { channel, milliohms });
    }
}

/// Connector handing out in-memory sinks that record reports instead of
/// delivering them. All handles share one report log; used by tests and
/// the `collect --dry-run` path.
#[derive(Debug, Default, Clone)]
pub struct RecordingConnector {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports recorded so far, across all handles.
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().expect("report log lock poisoned").clone()
    }
}

impl SinkConnector for RecordingConnector {
    fn acquire(&self) -> Result<Box<dyn StatsSink>, SinkError> {
        Ok(Box::new(RecordingSink {
            reports: Arc::clone(&self.reports),
        }))
    }
}

/// In-memory sink handle produced by [`RecordingConnector`].
pub struct RecordingSink {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl RecordingSink {
    fn record(&mut self, report: Report) {
        self.reports
            .lock()
            .expect("report log lock poisoned")
            .push(report);
    }
}

impl StatsSink for RecordingSink {
    fn report_charge_cycles(&mut self, histogram: &str) {
        self.record(Report::ChargeCycles {
            histogram: histogram.to_string(),
        });
    }

    fn report_hardware_failure(
        &mut self,
        component: HardwareComponent,
        index: u32,
        code: HardwareErrorCode,
    ) {
        self.record(Report::HardwareFailure {
            component,
            index,
            code,
        });
    }

    fn report_slow_io(&mut self, operation: IoOperation, count: i64) {
        self.record(Report::SlowIo { operation, count });
    }

    fn report_speaker_impedance(&mut self, channel: u32, milliohms: i32) {
        self.record(Report::SpeakerImpedance { channel, milliohms });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_serialize_as_tagged_json() {
        let report = Report::SlowIo {
            operation: IoOperation::Unmap,
            count: 7,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"event":"slow_io","operation":"unmap","count":7}"#);

        let report = Report::HardwareFailure {
            component: HardwareComponent::Codec,
            index: 0,
            code: HardwareErrorCode::Complete,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"event":"hardware_failure","component":"codec","index":0,"code":"complete"}"#
        );
    }

    #[test]
    fn test_recording_connector_shares_one_log() {
        let connector = RecordingConnector::new();

        let mut sink = connector.acquire().unwrap();
        sink.report_charge_cycles("1,2,3");
        drop(sink);

        let mut sink = connector.acquire().unwrap();
        sink.report_speaker_impedance(0, 4500);
        drop(sink);

        assert_eq!(
            connector.reports(),
            vec![
                Report::ChargeCycles {
                    histogram: "1,2,3".to_string()
                },
                Report::SpeakerImpedance {
                    channel: 0,
                    milliohms: 4500
                },
            ]
        );
    }

    #[test]
    fn test_unix_connector_fails_when_service_is_down() {
        let connector = UnixSocketConnector::new("/nonexistent/telemetryd.sock");
        assert!(connector.acquire().is_err());
    }
}
