//! Document schemas
//!
//! A schema names a document class, its index, and its declared members.
//! The query builder only ever asks it two things: whether a member path
//! is declared, and which index to talk to.

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use loader::SchemaCatalog;
pub use types::{Member, MemberKind, Schema, IMPLICIT_MEMBERS};
