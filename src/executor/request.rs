//! Request bodies
//!
//! Each executor operation wraps a [`CompiledQuery`] into the body it sends.
//! The builders are pure so the CLI can print exactly what would be sent.

use serde_json::{json, Map, Value};

use crate::query::CompiledQuery;

/// Search-hit page body; `query` is omitted when there is no clause
pub fn search_body(compiled: &CompiledQuery, limit: u64, skip: u64) -> Value {
    let mut body = Map::new();
    body.insert("from".into(), json!(skip));
    body.insert("size".into(), json!(limit));
    body.insert("fields".into(), json!(["_source"]));
    body.insert("sort".into(), Value::Array(compiled.sort.clone()));
    if let Some(clause) = &compiled.clause {
        body.insert("query".into(), clause.clone());
    }
    Value::Object(body)
}

/// Count body, or `None` to count the whole index
pub fn count_body(compiled: &CompiledQuery) -> Option<Value> {
    compiled.clause.as_ref().map(|clause| json!({ "query": clause }))
}

/// Existence body; an absent clause matches everything
pub fn exists_body(compiled: &CompiledQuery) -> Value {
    match &compiled.clause {
        Some(clause) => json!({ "query": clause }),
        None => json!({ "query": { "match_all": {} } }),
    }
}

/// Terms aggregation over `member`, ordered by bucket size
pub fn group_by_body(compiled: &CompiledQuery, member: &str, limit: u64, descending: bool) -> Value {
    let order = if descending { "desc" } else { "asc" };
    let mut body = Map::new();
    body.insert("size".into(), json!(0));
    body.insert(
        "aggs".into(),
        json!({
            "group": {
                "terms": {
                    "field": member,
                    "size": limit,
                    "order": { "_count": order }
                }
            }
        }),
    );
    if let Some(clause) = &compiled.clause {
        body.insert("query".into(), clause.clone());
    }
    Value::Object(body)
}
