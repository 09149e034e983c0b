use thiserror::Error;

/// Top-level error type for the relay's shared infrastructure.
///
/// Subsystem crates (`anaid-chat`, `anaid-mail`) define their own error
/// types; this one covers configuration and process bootstrap.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnaidError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AnaidError {
    fn from(err: toml::de::Error) -> Self {
        AnaidError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AnaidError {
    fn from(err: toml::ser::Error) -> Self {
        AnaidError::Config(err.to_string())
    }
}

/// A specialized `Result` type for core operations.
pub type Result<T> = std::result::Result<T, AnaidError>;
