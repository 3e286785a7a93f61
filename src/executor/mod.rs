//! Query execution
//!
//! Turns a built [`Query`](crate::query::Query) into search engine requests
//! through a [`Transport`] and decodes the responses.
//!
//! # Operations
//!
//! - `fetch` / `first`: one page of documents plus the total
//! - `count`: number of matches
//! - `has_any`: existence check
//! - `group_by`: terms aggregation over one member
//!
//! Provably empty queries never reach the transport, except for
//! `group_by`. A missing index is created and the request retried once for
//! `fetch`, `count` and `group_by`; every other failure propagates.

mod errors;
mod executor;
mod references;
pub mod request;
mod result;
mod transport;

pub use errors::{ExecutorError, ExecutorResult};
pub use executor::{FetchOptions, GroupOptions, QueryExecutor};
pub use references::ReferenceResolver;
pub use result::{Bucket, Document};
pub use transport::{Transport, TransportError, TransportResult};
