//! Credential loading for the model provider and the mail transport.
//!
//! Credentials come from environment variables first, then from a plain-text
//! file next to the process (`api_key.txt`, `email_key.txt`). They are read
//! once at startup. Blank values count as absent.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Environment variables consulted for the model provider key, in order.
pub const MODEL_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Environment variables consulted for the SMTP password.
pub const MAIL_PASSWORD_VARS: &[&str] = &["EMAIL_PASSWORD"];

/// A secret string whose `Debug`/`Display` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Env(String),
    File(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Env(name) => write!(f, "env:{}", name),
            CredentialSource::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// Resolve a credential from the process environment, then from `file`.
pub fn resolve_secret(vars: &[&str], file: &Path) -> Option<(Secret, CredentialSource)> {
    resolve_secret_with(|name| std::env::var(name).ok(), vars, file)
}

/// Resolve a credential using `lookup` for environment access.
pub fn resolve_secret_with<F>(
    lookup: F,
    vars: &[&str],
    file: &Path,
) -> Option<(Secret, CredentialSource)>
where
    F: Fn(&str) -> Option<String>,
{
    for name in vars {
        if let Some(value) = lookup(name) {
            let value = value.trim();
            if !value.is_empty() {
                return Some((
                    Secret::new(value),
                    CredentialSource::Env(name.to_string()),
                ));
            }
        }
    }

    match std::fs::read_to_string(file) {
        Ok(contents) => {
            let value = contents.trim();
            if value.is_empty() {
                warn!(path = %file.display(), "Credential file is empty");
                return None;
            }
            Some((
                Secret::new(value),
                CredentialSource::File(file.to_path_buf()),
            ))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %file.display(), error = %e, "Failed to read credential file");
            None
        }
    }
}

/// Log the outcome of a credential lookup without revealing the value.
pub fn log_resolution(what: &str, resolved: &Option<(Secret, CredentialSource)>) {
    match resolved {
        Some((_, source)) => info!(credential = what, source = %source, "Credential loaded"),
        None => warn!(credential = what, "Credential not configured"),
    }
}
