//! Error type shared across the core crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to read or write state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration:\n  {}", .0.join("\n  "))]
    ConfigValidation(Vec<String>),

    #[error("invalid slider range: min {min} must be finite and below max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("invalid color '{0}', expected a hex color like '#80b1fa'")]
    InvalidColor(String),
}
