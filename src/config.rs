//! Configuration management for hwstats-collector.
//!
//! This module handles loading, merging, and validating configuration from
//! files and CLI arguments. It supports YAML, JSON, and TOML formats. A
//! daemon started with no flags and no config file runs with the shipped
//! defaults: the fixed source set sampled every 24 hours after a 30 second
//! warm-up.

use crate::cli::{Args, ConfigFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// Default configuration constants
pub const DEFAULT_SYSFS_ROOT: &str = "/";
pub const DEFAULT_SINK_SOCKET: &str = "/run/telemetryd/telemetryd.sock";
pub const DEFAULT_WARMUP_SECS: u64 = 30;
pub const DEFAULT_PERIOD_SECS: u64 = 60 * 60 * 24;

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse config file {}: {}", path.display(), message)]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Daemon configuration. Unset fields fall back to the shipped defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory the sysfs source paths are resolved against
    #[serde(alias = "sysfs-root")]
    pub sysfs_root: Option<PathBuf>,

    /// Unix socket of the telemetry collection service
    #[serde(alias = "sink-socket")]
    pub sink_socket: Option<PathBuf>,

    /// Seconds to wait after startup before the first collection cycle
    #[serde(alias = "warmup-secs")]
    pub warmup_secs: Option<u64>,

    /// Seconds between collection cycles
    #[serde(alias = "period-secs")]
    pub period_secs: Option<u64>,

    /// Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sysfs_root: Some(PathBuf::from(DEFAULT_SYSFS_ROOT)),
            sink_socket: Some(PathBuf::from(DEFAULT_SINK_SOCKET)),
            warmup_secs: Some(DEFAULT_WARMUP_SECS),
            period_secs: Some(DEFAULT_PERIOD_SECS),
            log_level: Some("info".into()),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    // A zero period would turn the timer into a one-shot; there is no
    // fallback cadence, so reject it up front.
    if cfg.period_secs == Some(0) {
        return Err(ConfigError::Invalid(
            "period_secs must be at least 1".into(),
        ));
    }

    if let Some(root) = &cfg.sysfs_root {
        if root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("sysfs_root must not be empty".into()));
        }
    }

    if let Some(socket) = &cfg.sink_socket {
        if socket.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("sink_socket must not be empty".into()));
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "invalid log_level '{}', expected off/error/warn/info/debug/trace",
                    other
                )));
            }
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Override with CLI args
    if let Some(root) = &args.sysfs_root {
        config.sysfs_root = Some(root.clone());
    }
    if let Some(socket) = &args.sink_socket {
        config.sink_socket = Some(socket.clone());
    }
    if let Some(warmup) = args.warmup_secs {
        config.warmup_secs = Some(warmup);
    }
    if let Some(period) = args.period_secs {
        config.period_secs = Some(period);
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            // Try default locations
            let defaults = [
                "/etc/hwstats-collector/config.yaml",
                "/etc/hwstats-collector/config.yml",
                "/etc/hwstats-collector/config.toml",
                "./hwstats-collector.yaml",
                "./hwstats-collector.yml",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    let parsed: Result<Config, String> = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
        Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
        // Default to YAML
        _ => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
    };

    match parsed {
        Ok(config) => {
            info!("Loaded configuration from: {}", path.display());
            Ok(config)
        }
        Err(message) => Err(ConfigError::Parse { path, message }),
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> anyhow::Result<()> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_effective_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let config = Config {
            period_secs: Some(0),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_err());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let config = Config {
            log_level: Some("loud".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let args = Args::parse_from([
            "hwstats-collector",
            "--no-config",
            "--period-secs",
            "3600",
            "--sysfs-root",
            "/tmp/fake-sysfs",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.period_secs, Some(3600));
        assert_eq!(config.sysfs_root, Some(PathBuf::from("/tmp/fake-sysfs")));
        // Untouched fields keep their defaults.
        assert_eq!(config.warmup_secs, Some(DEFAULT_WARMUP_SECS));
    }

    #[test]
    fn test_yaml_config_parses() {
        let config: Config =
            serde_yaml::from_str("period-secs: 600\nsink-socket: /tmp/telemetryd.sock\n").unwrap();
        assert_eq!(config.period_secs, Some(600));
        assert_eq!(config.sink_socket, Some(PathBuf::from("/tmp/telemetryd.sock")));
        assert_eq!(config.warmup_secs, None);
    }
}
