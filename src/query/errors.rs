//! Query builder error types
//!
//! Error codes:
//! - DOCQUERY_PROPERTY_NOT_FOUND (REJECT)
//! - DOCQUERY_QUERY_SYNTAX (REJECT)
//!
//! Both are raised while the builder is mutated, never at execution time.

use thiserror::Error;

/// Result type for builder operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Builder validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Member path does not start with a declared member
    #[error("{member} not in {schema}")]
    PropertyNotFound { member: String, schema: String },

    /// Zero, multiple or unrecognized comparison keywords
    #[error("Query syntax error: {0}")]
    QuerySyntax(String),
}

impl QueryError {
    pub fn property_not_found(member: impl Into<String>, schema: impl Into<String>) -> Self {
        QueryError::PropertyNotFound {
            member: member.into(),
            schema: schema.into(),
        }
    }

    pub fn syntax(reason: impl Into<String>) -> Self {
        QueryError::QuerySyntax(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::PropertyNotFound { .. } => "DOCQUERY_PROPERTY_NOT_FOUND",
            QueryError::QuerySyntax(_) => "DOCQUERY_QUERY_SYNTAX",
        }
    }
}
