//! Query descriptions read by `docquery compile`
//!
//! A description is a JSON array of steps applied in order:
//!
//! ```json
//! [
//!   {"where": "age", "greater_equal": 18},
//!   {"union_group": [{"where": "name", "like": "kelp"}]},
//!   {"order_by": "age", "descending": true}
//! ]
//! ```
//!
//! Every key of a `where` / `union` step other than the member key is a
//! comparison keyword; the builder decides whether the set is valid.

use serde_json::{Map, Value};

use crate::query::{Query, QueryResult, QueryValue};

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Where { member: String, keywords: Vec<(String, QueryValue)> },
    Union { member: String, keywords: Vec<(String, QueryValue)> },
    WhereGroup(Vec<Step>),
    UnionGroup(Vec<Step>),
    OrderBy { member: String, descending: bool },
}

impl Step {
    pub fn parse_list(value: &Value) -> CliResult<Vec<Step>> {
        let items = value
            .as_array()
            .ok_or_else(|| CliError::invalid_input("query description must be an array of steps"))?;
        items.iter().map(Step::parse).collect()
    }

    pub fn parse(value: &Value) -> CliResult<Step> {
        let object = value
            .as_object()
            .ok_or_else(|| CliError::invalid_input(format!("step must be an object, got {}", value)))?;

        if let Some(member) = object.get("where") {
            return Ok(Step::Where {
                member: member_name(member, "where")?,
                keywords: keywords(object, "where"),
            });
        }
        if let Some(member) = object.get("union") {
            return Ok(Step::Union {
                member: member_name(member, "union")?,
                keywords: keywords(object, "union"),
            });
        }
        if let Some(steps) = object.get("where_group") {
            return Ok(Step::WhereGroup(Step::parse_list(steps)?));
        }
        if let Some(steps) = object.get("union_group") {
            return Ok(Step::UnionGroup(Step::parse_list(steps)?));
        }
        if let Some(member) = object.get("order_by") {
            let descending = match object.get("descending") {
                None => false,
                Some(Value::Bool(flag)) => *flag,
                Some(other) => {
                    return Err(CliError::invalid_input(format!("'descending' must be a boolean, got {}", other)))
                }
            };
            return Ok(Step::OrderBy {
                member: member_name(member, "order_by")?,
                descending,
            });
        }

        Err(CliError::invalid_input(format!(
            "step needs one of where, union, where_group, union_group, order_by: {}",
            value
        )))
    }
}

fn member_name(value: &Value, key: &str) -> CliResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CliError::invalid_input(format!("'{}' must name a member", key)))
}

fn keywords(object: &Map<String, Value>, member_key: &str) -> Vec<(String, QueryValue)> {
    object
        .iter()
        .filter(|(key, _)| key.as_str() != member_key)
        .map(|(key, value)| (key.clone(), QueryValue::from_json(value)))
        .collect()
}

/// Applies `steps` to `query` in order
pub fn apply<'s>(query: Query<'s>, steps: &[Step]) -> QueryResult<Query<'s>> {
    steps.iter().try_fold(query, |query, step| match step {
        Step::Where { member, keywords } => query.where_keywords(member, keywords.iter().cloned()),
        Step::Union { member, keywords } => query.union_keywords(member, keywords.iter().cloned()),
        Step::WhereGroup(nested) => query.where_group(|q| apply(q, nested)),
        Step::UnionGroup(nested) => query.union_group(|q| apply(q, nested)),
        Step::OrderBy { member, descending } => query.order_by(member, *descending),
    })
}
