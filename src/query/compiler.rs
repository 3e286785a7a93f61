//! Query compiler
//!
//! Turns an ordered list of [`QueryCell`]s into a boolean clause plus a sort
//! list for the search backend.
//!
//! # Folding
//!
//! Cells are walked in order into two buckets:
//!
//! - necessary: intersected cells, all must hold
//! - optional: unioned cells, any one suffices
//!
//! A union cell steals the immediately preceding necessary clause into the
//! optional bucket, so `a AND b OR c` reads as `a AND (b OR c)` without
//! operator precedence. The necessary bucket is finally folded into a single
//! "all N of N" alternative and the result is "any one of optional".
//!
//! Union groups are kept in the cell list but contribute no clause; only
//! intersected groups reach the necessary bucket.
//!
//! An empty cell list (sentinel only) compiles to no clause at all.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use super::cell::QueryCell;
use super::operation::{Combination, Comparison, SortDirection};
use super::value::QueryValue;

/// Output of the compiler
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledQuery {
    /// Boolean clause; `None` matches every document
    pub clause: Option<Value>,
    /// Sort descriptors in cell order
    pub sort: Vec<Value>,
}

impl CompiledQuery {
    /// Compiled form of a query that matches everything, unsorted
    pub fn match_all() -> Self {
        Self::default()
    }
}

fn angle_brackets() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[<>]").expect("static pattern is valid"))
}

/// Strips `<` and `>` from a string value; list elements pass through
pub fn sanitize(value: &QueryValue) -> QueryValue {
    match value {
        QueryValue::String(s) => QueryValue::String(angle_brackets().replace_all(s, "").into_owned()),
        other => other.clone(),
    }
}

/// Accumulates clauses while walking one cell list
#[derive(Default)]
struct Buckets {
    necessary: Vec<Value>,
    optional: Vec<Value>,
    last_is_necessary: bool,
}

impl Buckets {
    fn push(&mut self, combination: Combination, clause: Value) {
        match combination {
            Combination::Intersect => {
                self.necessary.push(clause);
                self.last_is_necessary = true;
            }
            Combination::Union => {
                if self.last_is_necessary {
                    if let Some(previous) = self.necessary.pop() {
                        self.optional.push(previous);
                    }
                }
                self.optional.push(clause);
                self.last_is_necessary = false;
            }
        }
    }

    fn finish(mut self) -> Option<Value> {
        if !self.necessary.is_empty() {
            let required = self.necessary.len();
            self.optional.push(json!({
                "bool": {
                    "should": self.necessary,
                    "minimum_should_match": required,
                }
            }));
        }
        if self.optional.is_empty() {
            None
        } else {
            Some(json!({
                "bool": {
                    "should": self.optional,
                    "minimum_should_match": 1,
                }
            }))
        }
    }
}

/// Stateless compiler
pub struct QueryCompiler;

impl QueryCompiler {
    /// Compiles a cell list, recursing into groups.
    ///
    /// Sort cells inside groups are ignored; only the top-level list
    /// contributes sort descriptors.
    pub fn compile(cells: &[QueryCell]) -> CompiledQuery {
        let mut buckets = Buckets::default();
        let mut sort = Vec::new();

        for cell in cells {
            match cell {
                QueryCell::All => {}
                QueryCell::Group { combination, cells } => {
                    if *combination != Combination::Intersect {
                        continue;
                    }
                    if let Some(clause) = Self::compile(cells).clause {
                        buckets.push(Combination::Intersect, clause);
                    }
                }
                QueryCell::Compare {
                    combination,
                    comparison,
                    member,
                    value,
                } => {
                    let value = sanitize(value);
                    buckets.push(*combination, Self::compile_comparison(member, *comparison, &value));
                }
                QueryCell::Order { direction, member } => {
                    sort.push(Self::sort_descriptor(member, *direction));
                }
            }
        }

        CompiledQuery {
            clause: buckets.finish(),
            sort,
        }
    }

    /// Compiles a single comparison into one backend clause
    pub fn compile_comparison(member: &str, comparison: Comparison, value: &QueryValue) -> Value {
        match comparison {
            Comparison::Like => json!({
                "bool": {
                    "should": [
                        Self::match_clause(member, value),
                        Self::regexp_clause(member, value),
                    ]
                }
            }),
            Comparison::Unlike => json!({
                "bool": {
                    "minimum_should_match": 2,
                    "should": [
                        Self::must_not(Self::match_clause(member, value)),
                        Self::must_not(Self::regexp_clause(member, value)),
                    ]
                }
            }),
            Comparison::Contains => {
                let should: Vec<Value> = value
                    .elements()
                    .iter()
                    .map(|v| Self::match_clause(member, v))
                    .collect();
                json!({ "bool": { "should": should } })
            }
            Comparison::Exclude => {
                let should: Vec<Value> = value
                    .elements()
                    .iter()
                    .map(|v| Self::must_not(Self::match_clause(member, v)))
                    .collect();
                json!({
                    "bool": {
                        "minimum_should_match": should.len(),
                        "should": should,
                    }
                })
            }
            Comparison::GreaterEqual => Self::range_clause(member, "gte", value),
            Comparison::Greater => Self::range_clause(member, "gt", value),
            Comparison::LessEqual => Self::range_clause(member, "lte", value),
            Comparison::Less => Self::range_clause(member, "lt", value),
            Comparison::Equal => {
                if value.is_null() {
                    Self::missing_clause(member)
                } else {
                    Self::match_clause(member, value)
                }
            }
            Comparison::Unequal => {
                if value.is_null() {
                    Self::must_not(Self::missing_clause(member))
                } else {
                    Self::must_not(Self::match_clause(member, value))
                }
            }
        }
    }

    /// Sort descriptor for one order cell
    pub fn sort_descriptor(member: &str, direction: SortDirection) -> Value {
        Self::field(
            member,
            json!({
                "order": direction.as_str(),
                "ignore_unmapped": true,
                "missing": direction.missing(),
            }),
        )
    }

    fn field(member: &str, body: Value) -> Value {
        let mut map = Map::new();
        map.insert(member.to_string(), body);
        Value::Object(map)
    }

    fn match_clause(member: &str, value: &QueryValue) -> Value {
        json!({
            "match": Self::field(member, json!({
                "query": value.to_json(),
                "operator": "and",
            }))
        })
    }

    fn regexp_clause(member: &str, value: &QueryValue) -> Value {
        json!({
            "regexp": Self::field(member, Value::String(format!(".*{}.*", value.to_text())))
        })
    }

    fn range_clause(member: &str, bound: &str, value: &QueryValue) -> Value {
        json!({
            "range": Self::field(member, Self::field(bound, value.to_json()))
        })
    }

    fn missing_clause(member: &str) -> Value {
        json!({
            "filtered": {
                "filter": {
                    "missing": { "field": member }
                }
            }
        })
    }

    fn must_not(clause: Value) -> Value {
        json!({ "bool": { "must_not": clause } })
    }
}
