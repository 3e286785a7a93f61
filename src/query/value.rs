//! Comparison values

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Number, Value};

/// Timestamp format used inside query clauses (second precision, no zone)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A value compared against a member
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Absent value; `equal`/`unequal` turn it into a missing-field check
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
    List(Vec<QueryValue>),
}

impl QueryValue {
    pub fn is_null(&self) -> bool {
        matches!(self, QueryValue::Null)
    }

    /// Returns the list elements, or the value itself as a one-element slice
    pub fn elements(&self) -> &[QueryValue] {
        match self {
            QueryValue::List(items) => items,
            QueryValue::Null => &[],
            other => std::slice::from_ref(other),
        }
    }

    /// True for an empty list or null
    pub fn is_empty_list(&self) -> bool {
        match self {
            QueryValue::List(items) => items.is_empty(),
            QueryValue::Null => true,
            _ => false,
        }
    }

    /// Text form used inside `regexp` patterns
    pub fn to_text(&self) -> String {
        match self {
            QueryValue::String(s) => s.clone(),
            other => match other.to_json() {
                Value::String(s) => s,
                v => v.to_string(),
            },
        }
    }

    /// Converts to the wire JSON form
    pub fn to_json(&self) -> Value {
        match self {
            QueryValue::Null => Value::Null,
            QueryValue::Bool(b) => Value::Bool(*b),
            QueryValue::Int(i) => Value::Number((*i).into()),
            QueryValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            QueryValue::String(s) => Value::String(s.clone()),
            QueryValue::DateTime(dt) => Value::String(dt.format(TIMESTAMP_FORMAT).to_string()),
            QueryValue::List(items) => Value::Array(items.iter().map(QueryValue::to_json).collect()),
        }
    }

    /// Converts from JSON input. Objects are not comparable and become null.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null | Value::Object(_) => QueryValue::Null,
            Value::Bool(b) => QueryValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => QueryValue::Int(i),
                None => QueryValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => QueryValue::String(s.clone()),
            Value::Array(items) => QueryValue::List(items.iter().map(QueryValue::from_json).collect()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<NaiveDateTime> for QueryValue {
    fn from(value: NaiveDateTime) -> Self {
        QueryValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(value: DateTime<Utc>) -> Self {
        QueryValue::DateTime(value.naive_utc())
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(QueryValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_datetime_renders_without_fraction_or_zone() {
        let dt = NaiveDate::from_ymd_opt(2015, 3, 7)
            .unwrap()
            .and_hms_micro_opt(9, 5, 1, 123_456)
            .unwrap();
        assert_eq!(QueryValue::from(dt).to_json(), json!("2015-03-07T09:05:01"));
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(QueryValue::from("kelp"), QueryValue::String("kelp".into()));
        assert_eq!(QueryValue::from(12), QueryValue::Int(12));
        assert_eq!(QueryValue::from(None::<i64>), QueryValue::Null);
        assert_eq!(
            QueryValue::from(vec!["a", "b"]),
            QueryValue::List(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_from_json() {
        assert_eq!(QueryValue::from_json(&json!(3)), QueryValue::Int(3));
        assert_eq!(QueryValue::from_json(&json!(1.5)), QueryValue::Float(1.5));
        assert_eq!(QueryValue::from_json(&json!({"a": 1})), QueryValue::Null);
        assert_eq!(
            QueryValue::from_json(&json!(["x", null])),
            QueryValue::List(vec!["x".into(), QueryValue::Null])
        );
    }

    #[test]
    fn test_empty_list() {
        assert!(QueryValue::List(vec![]).is_empty_list());
        assert!(QueryValue::Null.is_empty_list());
        assert!(!QueryValue::from(vec![1]).is_empty_list());
        assert!(!QueryValue::from("x").is_empty_list());
    }
}
