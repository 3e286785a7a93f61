//! Search engine transport
//!
//! The executor never speaks HTTP itself. It hands request bodies to a
//! [`Transport`] and interprets the JSON that comes back. Implementations
//! map the engine's failures onto [`TransportError`], and must report a
//! missing index as [`TransportError::IndexMissing`] so the executor can
//! create it and retry.

use serde_json::Value;
use thiserror::Error;

/// Result type for transport calls
pub type TransportResult<T> = Result<T, TransportError>;

/// Engine markers that identify a missing index in a 404 body
const INDEX_MISSING_MARKERS: [&str; 2] = ["IndexMissingException", "index_not_found_exception"];

/// Transport failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The target index does not exist
    #[error("Index '{0}' is missing")]
    IndexMissing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Engine returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    /// Classifies a non-success HTTP response
    pub fn from_status(index: &str, status: u16, body: &str) -> Self {
        if status == 404 {
            if INDEX_MISSING_MARKERS.iter().any(|marker| body.contains(marker)) {
                return TransportError::IndexMissing(index.to_string());
            }
            return TransportError::NotFound(body.to_string());
        }
        TransportError::Status {
            status,
            message: body.to_string(),
        }
    }

    pub fn is_index_missing(&self) -> bool {
        matches!(self, TransportError::IndexMissing(_))
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransportError::IndexMissing(_) => "DOCQUERY_TRANSPORT_INDEX_MISSING",
            TransportError::NotFound(_) => "DOCQUERY_TRANSPORT_NOT_FOUND",
            TransportError::Status { .. } => "DOCQUERY_TRANSPORT_STATUS",
            TransportError::Connection(_) => "DOCQUERY_TRANSPORT_CONNECTION",
        }
    }
}

/// Request primitives the executor needs from a search engine
///
/// Every method receives the fully resolved index name.
pub trait Transport {
    /// Search request; `version` asks the engine to report `_version` per hit
    fn search(&self, index: &str, body: &Value, version: bool) -> TransportResult<Value>;

    /// Count request; `None` counts the whole index
    fn count(&self, index: &str, body: Option<&Value>) -> TransportResult<Value>;

    /// Existence request; true when at least one document matches
    fn exists(&self, index: &str, body: &Value) -> TransportResult<bool>;

    fn create_index(&self, index: &str) -> TransportResult<()>;

    /// Multi-get by id; the response carries a `docs` array
    fn multi_get(&self, index: &str, ids: &[String]) -> TransportResult<Value>;
}
