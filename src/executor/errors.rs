//! Executor error types
//!
//! Error codes:
//! - DOCQUERY_TRANSPORT_* (from [`TransportError`])
//! - DOCQUERY_PROPERTY_NOT_FOUND, DOCQUERY_QUERY_SYNTAX (from [`QueryError`])
//! - DOCQUERY_MALFORMED_RESPONSE
//! - DOCQUERY_UNKNOWN_SCHEMA

use thiserror::Error;

use crate::query::QueryError;

use super::transport::TransportError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// The engine answered with JSON the executor cannot interpret
    #[error("Malformed response from {operation}: {reason}")]
    MalformedResponse { operation: &'static str, reason: String },

    /// A reference member names a schema missing from the catalog
    #[error("Schema '{0}' is not registered")]
    UnknownSchema(String),
}

impl ExecutorError {
    pub fn malformed(operation: &'static str, reason: impl Into<String>) -> Self {
        ExecutorError::MalformedResponse {
            operation,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::Transport(e) => e.code(),
            ExecutorError::Query(e) => e.code(),
            ExecutorError::MalformedResponse { .. } => "DOCQUERY_MALFORMED_RESPONSE",
            ExecutorError::UnknownSchema(_) => "DOCQUERY_UNKNOWN_SCHEMA",
        }
    }
}
