//! Query executor
//!
//! Execution flow for every operation:
//! 1. A provably empty query is answered locally (group_by excepted)
//! 2. The query is compiled and wrapped into the operation's body
//! 3. The body is sent to the schema's index
//! 4. A missing index is created once and the request retried once
//!    (fetch, count and group_by only)
//! 5. The response is decoded; fetch optionally resolves references

use crate::config::ClientConfig;
use crate::observability::{Logger, ObservationScope, QueryMetrics};
use crate::query::Query;
use crate::schema::SchemaCatalog;

use super::errors::{ExecutorError, ExecutorResult};
use super::references::ReferenceResolver;
use super::request::{count_body, exists_body, group_by_body, search_body};
use super::result::{decode_buckets, decode_count, decode_search, Bucket, Document};
use super::transport::{Transport, TransportError, TransportResult};

/// Paging for [`QueryExecutor::fetch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub limit: u64,
    pub skip: u64,
    /// Resolve reference members of the returned documents
    pub fetch_reference: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: 1000,
            skip: 0,
            fetch_reference: true,
        }
    }
}

impl FetchOptions {
    pub fn page(limit: u64, skip: u64) -> Self {
        Self {
            limit,
            skip,
            ..Self::default()
        }
    }

    pub fn without_references(mut self) -> Self {
        self.fetch_reference = false;
        self
    }
}

/// Bucket count and order for [`QueryExecutor::group_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupOptions {
    pub limit: u64,
    /// Largest buckets first
    pub descending: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            descending: true,
        }
    }
}

/// Runs built queries against a [`Transport`]
pub struct QueryExecutor<'a, T: Transport> {
    transport: &'a T,
    catalog: &'a SchemaCatalog,
    config: ClientConfig,
    metrics: QueryMetrics,
}

impl<'a, T: Transport> QueryExecutor<'a, T> {
    pub fn new(transport: &'a T, catalog: &'a SchemaCatalog, config: ClientConfig) -> Self {
        Self {
            transport,
            catalog,
            config,
            metrics: QueryMetrics::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> &QueryMetrics {
        &self.metrics
    }

    /// Returns one page of matching documents and the total match count
    pub fn fetch(&self, query: &Query<'_>, options: FetchOptions) -> ExecutorResult<(Vec<Document>, u64)> {
        if query.is_provably_empty() {
            self.short_circuit("fetch", query);
            return Ok((Vec::new(), 0));
        }

        let index = self.config.index_name(query.schema());
        let limit = options.limit.to_string();
        let skip = options.skip.to_string();
        let scope = ObservationScope::with_fields(
            "QUERY_FETCH",
            &[("index", index.as_str()), ("limit", limit.as_str()), ("skip", skip.as_str())],
        );

        let body = search_body(&query.compile(), options.limit, options.skip);
        let outcome = self
            .with_index_recovery(&index, || self.transport.search(&index, &body, true))
            .and_then(decode_search)
            .and_then(|(mut documents, total)| {
                if options.fetch_reference {
                    self.resolver().resolve(query.schema(), &mut documents)?;
                }
                Ok((documents, total))
            });

        match outcome {
            Ok((documents, total)) => {
                self.metrics.add_documents(documents.len() as u64);
                scope.complete_with_fields(&[
                    ("hits", documents.len().to_string().as_str()),
                    ("total", total.to_string().as_str()),
                ]);
                Ok((documents, total))
            }
            Err(e) => {
                scope.fail(e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    /// First matching document in query order
    pub fn first(&self, query: &Query<'_>, fetch_reference: bool) -> ExecutorResult<Option<Document>> {
        let options = FetchOptions {
            limit: 1,
            skip: 0,
            fetch_reference,
        };
        let (documents, total) = self.fetch(query, options)?;
        if total == 0 {
            return Ok(None);
        }
        Ok(documents.into_iter().next())
    }

    pub fn count(&self, query: &Query<'_>) -> ExecutorResult<u64> {
        if query.is_provably_empty() {
            self.short_circuit("count", query);
            return Ok(0);
        }

        let index = self.config.index_name(query.schema());
        let scope = ObservationScope::with_fields("QUERY_COUNT", &[("index", index.as_str())]);

        let body = count_body(&query.compile());
        let outcome = self
            .with_index_recovery(&index, || self.transport.count(&index, body.as_ref()))
            .and_then(decode_count);

        match outcome {
            Ok(count) => {
                scope.complete_with_fields(&[("count", count.to_string().as_str())]);
                Ok(count)
            }
            Err(e) => {
                scope.fail(e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    /// True when at least one document matches; a missing index is an error
    pub fn has_any(&self, query: &Query<'_>) -> ExecutorResult<bool> {
        if query.is_provably_empty() {
            self.short_circuit("has_any", query);
            return Ok(false);
        }

        let index = self.config.index_name(query.schema());
        let scope = ObservationScope::with_fields("QUERY_EXISTS", &[("index", index.as_str())]);

        let body = exists_body(&query.compile());
        let outcome = self.issue(|| self.transport.exists(&index, &body));

        match outcome {
            Ok(found) => {
                scope.complete_with_fields(&[("found", if found { "true" } else { "false" })]);
                Ok(found)
            }
            Err(e) => {
                scope.fail(e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    /// Terms aggregation over `member` restricted to the query's matches
    ///
    /// A provably empty query is still sent: its clause is absent, so the
    /// aggregation runs over the whole index.
    pub fn group_by(&self, query: &Query<'_>, member: &str, options: GroupOptions) -> ExecutorResult<Vec<Bucket>> {
        query.check_member(member)?;

        let index = self.config.index_name(query.schema());
        let scope = ObservationScope::with_fields("QUERY_GROUP_BY", &[("index", index.as_str()), ("member", member)]);

        let body = group_by_body(&query.compile(), member, options.limit, options.descending);
        let outcome = self
            .with_index_recovery(&index, || self.transport.search(&index, &body, false))
            .and_then(decode_buckets);

        match outcome {
            Ok(buckets) => {
                scope.complete_with_fields(&[("buckets", buckets.len().to_string().as_str())]);
                Ok(buckets)
            }
            Err(e) => {
                scope.fail(e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    fn resolver(&self) -> ReferenceResolver<'_, T> {
        ReferenceResolver::new(self.transport, self.catalog, &self.config, &self.metrics)
    }

    fn short_circuit(&self, operation: &str, query: &Query<'_>) {
        self.metrics.increment_short_circuits();
        Logger::trace(
            "QUERY_SHORT_CIRCUIT",
            &[("operation", operation), ("schema", query.schema().name.as_str())],
        );
    }

    /// Sends one request, counting it and any failure
    fn issue<R>(&self, request: impl FnOnce() -> TransportResult<R>) -> ExecutorResult<R> {
        self.metrics.increment_requests();
        request().map_err(|e| {
            self.metrics.increment_transport_failures();
            ExecutorError::from(e)
        })
    }

    /// Sends `request`; on a missing index creates it and sends once more
    fn with_index_recovery<R>(&self, index: &str, request: impl Fn() -> TransportResult<R>) -> ExecutorResult<R> {
        self.metrics.increment_requests();
        match request() {
            Ok(response) => Ok(response),
            Err(TransportError::IndexMissing(_)) => {
                Logger::warn("INDEX_MISSING_RECOVERY", &[("index", index)]);
                self.metrics.increment_index_recoveries();
                self.issue(|| self.transport.create_index(index))?;
                self.issue(request)
            }
            Err(e) => {
                self.metrics.increment_transport_failures();
                Err(e.into())
            }
        }
    }
}
