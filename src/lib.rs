//! Hardware Statistics Collector Library
//!
//! This library provides the collection pipeline of hwstats-collector: the
//! fixed table of sysfs-backed statistic sources, the per-source parsing
//! rules, the per-cycle report dispatcher, and the boot-time scheduler
//! that drives it. The telemetry service is reached through a pluggable
//! sink boundary, allowing downstream consumers and tests to substitute
//! their own transport.
//!
//! # Features
//!
//! - **Fixed Source Table**: one descriptor per monitored counter, built
//!   once at startup
//! - **Error Isolation**: a source that cannot be read or parsed is
//!   skipped for the cycle without affecting the others
//! - **Clear-On-Read Counters**: slow-I/O counters are reset after each
//!   successful read so every cycle reports only new events
//! - **Pluggable Sink**: Unix-socket delivery in production, in-memory
//!   recording for tests and dry runs
//!
//! # Usage
//!
//! ```no_run
//! use hwstats_collector::collectors::{run_cycle, source_table};
//! use hwstats_collector::sink::UnixSocketConnector;
//! use std::path::Path;
//!
//! let sources = source_table(Path::new("/"));
//! let connector = UnixSocketConnector::new("/run/telemetryd/telemetryd.sock");
//!
//! // One full collection cycle: acquire the sink, read and report every
//! // source in order, release the sink.
//! if let Err(e) = run_cycle(&sources, &connector) {
//!     eprintln!("telemetry service unavailable: {}", e);
//! }
//! ```

pub mod collectors;
pub mod schedule;
pub mod sink;

// Re-export main types for convenience
pub use collectors::{run_cycle, source_table, CollectorError, SourceKind, StatSource};
pub use schedule::{PeriodicTrigger, TriggerError};
pub use sink::{Report, SinkConnector, SinkError, StatsSink, UnixSocketConnector};
