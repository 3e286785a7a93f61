//! Schema error types
//!
//! Error codes:
//! - DOCQUERY_SCHEMA_INVALID
//! - DOCQUERY_SCHEMA_INVALID_MEMBER
//! - DOCQUERY_SCHEMA_DUPLICATE_MEMBER
//! - DOCQUERY_SCHEMA_DUPLICATE
//! - DOCQUERY_SCHEMA_MALFORMED

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema definition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid member '{member}' in {schema}: {reason}")]
    InvalidMember {
        schema: String,
        member: String,
        reason: String,
    },

    #[error("Member '{member}' declared twice in {schema}")]
    DuplicateMember { schema: String, member: String },

    #[error("Schema '{0}' already registered")]
    DuplicateSchema(String),

    /// Schema file could not be read or parsed
    #[error("Malformed schema at {path}: {reason}")]
    Malformed { path: String, reason: String },
}

impl SchemaError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidSchema(_) => "DOCQUERY_SCHEMA_INVALID",
            SchemaError::InvalidMember { .. } => "DOCQUERY_SCHEMA_INVALID_MEMBER",
            SchemaError::DuplicateMember { .. } => "DOCQUERY_SCHEMA_DUPLICATE_MEMBER",
            SchemaError::DuplicateSchema(_) => "DOCQUERY_SCHEMA_DUPLICATE",
            SchemaError::Malformed { .. } => "DOCQUERY_SCHEMA_MALFORMED",
        }
    }
}
