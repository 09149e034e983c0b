//! CLI argument definitions for the Anaid relay server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Config file used when neither `--config` nor `ANAID_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "anaid.toml";

/// Anaid: customer support chat relay for Mandrinados Anaid.
#[derive(Parser, Debug)]
#[command(name = "anaid", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// HTTP listen port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Write the default configuration to the config path and exit.
    #[arg(long = "init-config")]
    pub init_config: bool,
}

impl CliArgs {
    /// Priority: --config flag > ANAID_CONFIG env var > ./anaid.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_config_path_with<F>(&self, lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = lookup("ANAID_CONFIG").filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Priority: --port flag > PORT env var (set by the hosting platform) >
    /// config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        self.resolve_port_with(config_port, |name| std::env::var(name).ok())
    }

    pub fn resolve_port_with<F>(&self, config_port: u16, lookup: F) -> u16
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = self.port {
            return p;
        }
        if let Some(val) = lookup("PORT") {
            match val.trim().parse::<u16>() {
                Ok(p) => return p,
                Err(_) => tracing::warn!(value = %val, "Ignoring invalid PORT"),
            }
        }
        config_port
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}
