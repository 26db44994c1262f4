//! Error types for actforge.
//!
//! Errors only arise at the boundaries (CLI arguments, config files,
//! definition files). Workflow serialization itself is infallible: missing
//! fields fall back to documented defaults instead of erroring.

use thiserror::Error;

/// Result type alias for actforge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// actforge error types.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the machine-parseable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Parse(_) => "PARSE_ERROR",
            Error::Template(_) => "TEMPLATE_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }
}
