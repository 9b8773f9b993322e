//! Error types for Battlecry.

use thiserror::Error;

/// Library-level error type for Battlecry operations.
#[derive(Error, Debug)]
pub enum BattlecryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("State error: {0}")]
    State(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),
}

impl BattlecryError {
    /// Whether this error came from validating the request itself rather
    /// than from performing I/O for it.
    pub fn is_validation(&self) -> bool {
        matches!(self, BattlecryError::InvalidInput(_))
    }
}

/// Result type alias for Battlecry operations.
pub type Result<T> = std::result::Result<T, BattlecryError>;
