//! Batch reference resolution
//!
//! A reference member stores the id of a document of another schema. After
//! a fetch, the ids from every hit are collected per referenced schema and
//! resolved with one multi-get each, then attached to the hits under
//! [`Document::references`]. Resolved documents are not resolved further.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::config::ClientConfig;
use crate::observability::{Logger, QueryMetrics};
use crate::schema::{Member, Schema, SchemaCatalog};

use super::errors::{ExecutorError, ExecutorResult};
use super::result::{decode_multi_get, Document};
use super::transport::Transport;

/// Ids wanted from one referenced schema, in first-seen order
struct Wanted<'c> {
    schema: &'c Schema,
    ids: Vec<String>,
    seen: BTreeSet<String>,
}

impl Wanted<'_> {
    fn add(&mut self, id: &str) {
        if self.seen.insert(id.to_string()) {
            self.ids.push(id.to_string());
        }
    }
}

pub struct ReferenceResolver<'a, T: Transport> {
    transport: &'a T,
    catalog: &'a SchemaCatalog,
    config: &'a ClientConfig,
    metrics: &'a QueryMetrics,
}

impl<'a, T: Transport> ReferenceResolver<'a, T> {
    pub fn new(transport: &'a T, catalog: &'a SchemaCatalog, config: &'a ClientConfig, metrics: &'a QueryMetrics) -> Self {
        Self {
            transport,
            catalog,
            config,
            metrics,
        }
    }

    /// Resolves every reference member of `schema` across `documents`
    pub fn resolve(&self, schema: &Schema, documents: &mut [Document]) -> ExecutorResult<()> {
        let members: Vec<&Member> = schema.references().collect();
        if members.is_empty() || documents.is_empty() {
            return Ok(());
        }

        let mut wanted: BTreeMap<&str, Wanted<'a>> = BTreeMap::new();
        for member in &members {
            let target = member.reference_schema().unwrap_or_default();
            if wanted.contains_key(target) {
                continue;
            }
            let referenced = self
                .catalog
                .get(target)
                .ok_or_else(|| ExecutorError::UnknownSchema(target.to_string()))?;
            wanted.insert(
                target,
                Wanted {
                    schema: referenced,
                    ids: Vec::new(),
                    seen: BTreeSet::new(),
                },
            );
        }

        for document in documents.iter() {
            for member in &members {
                if let (Some(id), Some(target)) = (reference_id(document, member), member.reference_schema()) {
                    if let Some(entry) = wanted.get_mut(target) {
                        entry.add(id);
                    }
                }
            }
        }

        let mut found: BTreeMap<&str, BTreeMap<String, Document>> = BTreeMap::new();
        for (name, entry) in &wanted {
            if entry.ids.is_empty() {
                continue;
            }
            let index = self.config.index_name(entry.schema);
            self.metrics.increment_requests();
            let response = self.transport.multi_get(&index, &entry.ids).map_err(|e| {
                self.metrics.increment_transport_failures();
                ExecutorError::from(e)
            })?;
            let by_id = decode_multi_get(response)?
                .into_iter()
                .map(|doc| (doc.id.clone(), doc))
                .collect();
            found.insert(*name, by_id);
        }

        for document in documents.iter_mut() {
            for member in &members {
                let target = member.reference_schema().unwrap_or_default();
                let resolved = reference_id(document, member)
                    .and_then(|id| found.get(target).and_then(|docs| docs.get(id)))
                    .cloned();

                match resolved {
                    Some(referenced) => {
                        document.references.insert(member.name.clone(), referenced);
                    }
                    None if member.required => {
                        Logger::warn(
                            "REFERENCE_UNRESOLVED",
                            &[
                                ("document", document.id.as_str()),
                                ("member", member.name.as_str()),
                                ("schema", target),
                            ],
                        );
                    }
                    None => {}
                }
            }
        }

        Ok(())
    }
}

/// Stored id of a reference member; empty ids count as unset
fn reference_id<'d>(document: &'d Document, member: &Member) -> Option<&'d str> {
    match document.get(&member.name) {
        Some(Value::String(id)) if !id.is_empty() => Some(id.as_str()),
        _ => None,
    }
}
