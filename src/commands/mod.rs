//! CLI command implementations for hwstats-collector.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: source and sink validation
//! - `collect`: run a single collection cycle outside the daemon schedule

pub mod check;
pub mod collect;

// Re-export command functions
pub use check::command_check;
pub use collect::command_collect;
