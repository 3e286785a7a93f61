//! docquery - validated document queries for search engine boolean DSLs
//!
//! Build a [`query::Query`] against a [`schema::Schema`], compile it to a
//! boolean clause plus sort list, and run it through an
//! [`executor::QueryExecutor`] over any [`executor::Transport`].
//!
//! ```ignore
//! let query = Query::new(&user)
//!     .where_("age", Condition::greater_equal(18))?
//!     .union("name", Condition::like("kelp"))?
//!     .order_by("age", true)?;
//! let (documents, total) = executor.fetch(&query, FetchOptions::default())?;
//! ```

pub mod cli;
pub mod config;
pub mod executor;
pub mod observability;
pub mod query;
pub mod schema;
