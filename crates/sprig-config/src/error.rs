//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value for '{field}'{}", hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue {
        field: String,
        hint: Option<String>,
    },

    // Schema validation errors (no filesystem checks)
    #[error("maxDepth {value} is out of range (0 to {max}, or \"unlimited\")")]
    DepthOutOfRange { value: u32, max: u32 },

    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    #[error("failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}
