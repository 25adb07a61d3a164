//! Error types for Tackline.

use thiserror::Error;

/// Main error type for Tackline operations.
///
/// Lookups of unknown or deleted objects are not errors; they surface as
/// `None` from the query that performed them.
#[derive(Error, Debug)]
pub enum TacklineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl From<serde_json::Error> for TacklineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Tackline operations.
pub type Result<T> = std::result::Result<T, TacklineError>;
