//! Result types and engine response decoding

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::{ExecutorError, ExecutorResult};

/// A stored document as returned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    /// Present when the request asked for versions
    pub version: Option<u64>,
    pub source: Map<String, Value>,
    /// Resolved reference members, keyed by member name
    pub references: BTreeMap<String, Document>,
}

impl Document {
    pub fn from_hit(id: impl Into<String>, version: Option<u64>, source: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            version,
            source,
            references: BTreeMap::new(),
        }
    }

    /// Raw stored value of a member
    pub fn get(&self, member: &str) -> Option<&Value> {
        self.source.get(member)
    }

    /// Resolved document behind a reference member
    pub fn reference(&self, member: &str) -> Option<&Document> {
        self.references.get(member)
    }

    /// Builds a typed value from the source, with `_id` and `_version` added
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        let mut fields = self.source.clone();
        fields.insert("_id".to_string(), Value::String(self.id.clone()));
        if let Some(version) = self.version {
            fields.insert("_version".to_string(), Value::from(version));
        }
        serde_json::from_value(Value::Object(fields))
    }
}

/// One terms-aggregation bucket
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bucket {
    pub key: Value,
    pub doc_count: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HitTotal {
    Count(u64),
    Object { value: u64 },
}

impl HitTotal {
    fn value(&self) -> u64 {
        match self {
            HitTotal::Count(n) | HitTotal::Object { value: n } => *n,
        }
    }
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_version", default)]
    version: Option<u64>,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

impl Hit {
    fn into_document(self) -> Document {
        Document::from_hit(self.id, self.version, self.source)
    }
}

#[derive(Deserialize)]
struct Hits {
    total: HitTotal,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Deserialize)]
struct GroupAggregation {
    #[serde(default)]
    buckets: Vec<Bucket>,
}

#[derive(Deserialize)]
struct Aggregations {
    group: GroupAggregation,
}

#[derive(Deserialize)]
struct AggregationResponse {
    aggregations: Aggregations,
}

#[derive(Deserialize)]
struct MultiGetDoc {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    found: bool,
    #[serde(rename = "_version", default)]
    version: Option<u64>,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

#[derive(Deserialize)]
struct MultiGetResponse {
    docs: Vec<MultiGetDoc>,
}

fn decode<T: DeserializeOwned>(operation: &'static str, response: Value) -> ExecutorResult<T> {
    serde_json::from_value(response).map_err(|e| ExecutorError::malformed(operation, e.to_string()))
}

/// Decodes a search response into `(documents, total)`
pub fn decode_search(response: Value) -> ExecutorResult<(Vec<Document>, u64)> {
    let parsed: SearchResponse = decode("search", response)?;
    let total = parsed.hits.total.value();
    let documents = parsed.hits.hits.into_iter().map(Hit::into_document).collect();
    Ok((documents, total))
}

pub fn decode_count(response: Value) -> ExecutorResult<u64> {
    let parsed: CountResponse = decode("count", response)?;
    Ok(parsed.count)
}

pub fn decode_buckets(response: Value) -> ExecutorResult<Vec<Bucket>> {
    let parsed: AggregationResponse = decode("group_by", response)?;
    Ok(parsed.aggregations.group.buckets)
}

/// Decodes a multi-get response, keeping only documents that were found
pub fn decode_multi_get(response: Value) -> ExecutorResult<Vec<Document>> {
    let parsed: MultiGetResponse = decode("multi_get", response)?;
    Ok(parsed
        .docs
        .into_iter()
        .filter(|doc| doc.found)
        .map(|doc| Document::from_hit(doc.id, doc.version, doc.source))
        .collect())
}
