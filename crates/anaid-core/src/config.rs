use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the chat relay.
///
/// Loaded from `anaid.toml` by default. Credentials are never stored here;
/// only the paths of the fallback files that hold them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnaidConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
}

impl AnaidConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnaidConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Deployment environment label reported by `/health`.
    /// Falls back to `RAILWAY_ENVIRONMENT`, then "local".
    pub environment: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            environment: None,
        }
    }
}

impl GeneralConfig {
    /// Resolve the environment label, consulting `lookup` for
    /// `RAILWAY_ENVIRONMENT` when the config leaves it unset.
    pub fn resolve_environment<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        self.environment
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| lookup("RAILWAY_ENVIRONMENT").filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "local".to_string())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
        }
    }
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Provider API root.
    pub base_url: String,
    /// Upper bound on a single completion call.
    pub timeout_secs: u64,
    /// Longest accepted chat message, in characters.
    pub max_message_chars: usize,
    /// Fallback file holding the API key when no env var is set.
    pub api_key_file: PathBuf,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 60,
            max_message_chars: 4000,
            api_key_file: PathBuf::from("api_key.txt"),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Transcript mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP relay host, reached over implicit TLS.
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Envelope sender; also the SMTP login user.
    pub sender: String,
    /// Company mailbox receiving transcripts.
    pub recipient: String,
    pub timeout_secs: u64,
    /// Fallback file holding the SMTP password when `EMAIL_PASSWORD` is unset.
    pub password_file: PathBuf,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.hostinger.com".to_string(),
            smtp_port: 465,
            sender: "bot@mandrinadosanaid.com".to_string(),
            recipient: "info@mandrinadosanaid.com".to_string(),
            timeout_secs: 30,
            password_file: PathBuf::from("email_key.txt"),
        }
    }
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session store bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum live sessions; the least recently used is evicted beyond this.
    pub max_sessions: usize,
    /// Sessions untouched for longer than this are expired.
    pub idle_timeout_minutes: u64,
    /// Period of the background expiry sweep.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_timeout_minutes: 120,
            sweep_interval_secs: 300,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_minutes * 60)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}
