//! Observability
//!
//! - Structured JSON logging with a process-wide severity threshold
//! - Begin/complete scopes around executor requests
//! - Per-executor counters
//!
//! Observability is read-only: nothing here changes what a query returns,
//! and a failed log write is ignored.
//!
//! # Events
//!
//! | event                      | severity |
//! |----------------------------|----------|
//! | `QUERY_{FETCH,COUNT,GROUP_BY}_BEGIN` | TRACE |
//! | `QUERY_*_COMPLETE`         | INFO     |
//! | `QUERY_*_FAILED`           | ERROR    |
//! | `QUERY_*_INCOMPLETE`       | WARN     |
//! | `QUERY_SHORT_CIRCUIT`      | TRACE    |
//! | `INDEX_MISSING_RECOVERY`   | WARN     |
//! | `REFERENCE_UNRESOLVED`     | WARN     |

mod logger;
mod metrics;
mod scope;

pub use logger::{render_line, Logger, Severity};
pub use metrics::{MetricsSnapshot, QueryMetrics};
pub use scope::{ObservationScope, Timer};
