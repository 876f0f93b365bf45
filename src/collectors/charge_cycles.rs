//! Battery charge-cycle histogram collector.
//!
//! The fuel gauge exposes bucketed charge-cycle counts, the nth bucket
//! counting how often the battery charged through the n-th capacity band.
//! The whole histogram is forwarded as one comma-delimited string.

use std::path::Path;

use super::{read_source, CollectorError};
use crate::sink::StatsSink;

/// Collapses whitespace-separated bucket counts into the comma-delimited
/// form the telemetry service expects. Runs of whitespace become a single
/// comma; leading and trailing separators are dropped.
pub fn normalize_histogram(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(",")
}

/// Reads the cycle-count bins and forwards them as a histogram report.
pub fn collect(path: &Path, sink: &mut dyn StatsSink) -> Result<(), CollectorError> {
    let raw = read_source(path)?;
    sink.report_charge_cycles(&normalize_histogram(&raw));
    Ok(())
}
