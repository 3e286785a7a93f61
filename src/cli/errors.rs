//! CLI error types
//!
//! Every CLI error ends the process with a non-zero exit status after an
//! error response has been written.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::query::QueryError;
use crate::schema::SchemaError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl CliError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        CliError::InvalidInput(reason.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Io(_) => "DOCQUERY_CLI_IO",
            CliError::InvalidInput(_) => "DOCQUERY_CLI_INVALID_INPUT",
            CliError::Config(e) => e.code(),
            CliError::Schema(e) => e.code(),
            CliError::Query(e) => e.code(),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidInput(format!("JSON error: {}", e))
    }
}
