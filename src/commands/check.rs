//! Check command implementation.
//!
//! Validates source readability, sink availability, and configuration.

use std::fs;
use std::path::PathBuf;

use hwstats_collector::collectors::source_table;
use hwstats_collector::sink::{SinkConnector, UnixSocketConnector};

use crate::config::{
    validate_effective_config, Config, DEFAULT_SINK_SOCKET, DEFAULT_SYSFS_ROOT,
};

/// Validates sources, sink, and configuration.
pub fn command_check(config: &Config) -> anyhow::Result<()> {
    println!("🔍 hwstats-collector - System Check");
    println!("====================================");

    let mut all_ok = true;

    let sysfs_root = config
        .sysfs_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSFS_ROOT));

    println!("\n📁 Checking stat sources under {}...", sysfs_root.display());
    for source in source_table(&sysfs_root) {
        match fs::read_to_string(&source.path) {
            Ok(_) => println!("   ✅ {} readable ({})", source.name, source.path.display()),
            Err(e) => {
                println!(
                    "   ❌ {} not readable ({}): {}",
                    source.name,
                    source.path.display(),
                    e
                );
                all_ok = false;
            }
        }
    }

    let sink_socket = config
        .sink_socket
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SINK_SOCKET));

    println!("\n📡 Checking telemetry sink...");
    match UnixSocketConnector::new(sink_socket.clone()).acquire() {
        Ok(_) => println!(
            "   ✅ Collection service reachable at {}",
            sink_socket.display()
        ),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    if all_ok {
        println!("\n✅ All checks passed");
        Ok(())
    } else {
        println!("\n❌ Some checks failed");
        std::process::exit(1);
    }
}
