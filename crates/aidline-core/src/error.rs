use thiserror::Error;

/// Top-level error type shared by the Aidline crates.
///
/// Subsystem crates define their own error enums and convert from this one
/// so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AidlineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

impl From<toml::de::Error> for AidlineError {
    fn from(err: toml::de::Error) -> Self {
        AidlineError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AidlineError {
    fn from(err: toml::ser::Error) -> Self {
        AidlineError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AidlineError {
    fn from(err: serde_json::Error) -> Self {
        AidlineError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Aidline operations.
pub type Result<T> = std::result::Result<T, AidlineError>;
