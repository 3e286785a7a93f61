//! Query building and compilation
//!
//! # Pipeline
//!
//! 1. [`Query`] validates members and accumulates [`QueryCell`]s
//! 2. [`QueryCompiler`] folds the cells into `(clause, sort)`
//! 3. The executor wraps the result into a request body
//!
//! # Operation codes
//!
//! Cells carry packed operation codes (see [`operation`]). Their numeric
//! values are stable and their decode order is fixed.

mod builder;
mod cell;
mod compiler;
mod errors;
pub mod operation;
mod value;

pub use builder::{Condition, Query};
pub use cell::QueryCell;
pub use compiler::{sanitize, CompiledQuery, QueryCompiler};
pub use errors::{QueryError, QueryResult};
pub use operation::{Combination, Comparison, OperationCode, SortDirection};
pub use value::{QueryValue, TIMESTAMP_FORMAT};
