//! Fluent query builder
//!
//! A [`Query`] accumulates cells against one schema. Member paths are
//! checked as they are added, so a malformed query never reaches execution.
//!
//! Intersecting with something that can never match (`contains` an empty
//! list, or a nested query that is itself provably empty) marks the whole
//! query as provably empty. From then on mutations are no-ops and execution
//! returns an empty result without a request. Unions never set the flag: an
//! empty union leg just contributes no matches.

use super::cell::QueryCell;
use super::compiler::{CompiledQuery, QueryCompiler};
use super::errors::{QueryError, QueryResult};
use super::operation::{Combination, Comparison, SortDirection};
use super::value::QueryValue;
use crate::schema::Schema;

/// A comparison kind with its value
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub comparison: Comparison,
    pub value: QueryValue,
}

impl Condition {
    pub fn new(comparison: Comparison, value: impl Into<QueryValue>) -> Self {
        Self {
            comparison,
            value: value.into(),
        }
    }

    pub fn equal(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::Equal, value)
    }

    pub fn unequal(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::Unequal, value)
    }

    pub fn less(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::Less, value)
    }

    pub fn less_equal(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::LessEqual, value)
    }

    pub fn greater(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::Greater, value)
    }

    pub fn greater_equal(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::GreaterEqual, value)
    }

    pub fn like(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::Like, value)
    }

    pub fn unlike(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::Unlike, value)
    }

    pub fn contains(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::Contains, value)
    }

    pub fn exclude(value: impl Into<QueryValue>) -> Self {
        Self::new(Comparison::Exclude, value)
    }

    /// Builds a condition from `(keyword, value)` pairs.
    ///
    /// Exactly one pair with a recognized keyword is accepted.
    pub fn from_keywords<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> QueryResult<Self>
    where
        K: AsRef<str>,
        V: Into<QueryValue>,
    {
        let mut pairs = pairs.into_iter();
        let (keyword, value) = pairs
            .next()
            .ok_or_else(|| QueryError::syntax("expected exactly one comparison keyword, got none"))?;
        if pairs.next().is_some() {
            return Err(QueryError::syntax("expected exactly one comparison keyword, got several"));
        }
        Ok(Self::new(Comparison::from_keyword(keyword.as_ref())?, value))
    }

    /// True when the condition can never match anything
    fn is_unsatisfiable(&self) -> bool {
        self.comparison == Comparison::Contains && self.value.is_empty_list()
    }
}

/// Query builder bound to one schema
#[derive(Debug, Clone)]
pub struct Query<'s> {
    schema: &'s Schema,
    items: Vec<QueryCell>,
    contains_empty: bool,
}

impl<'s> Query<'s> {
    /// Creates a query matching every document of the schema
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            items: vec![QueryCell::All],
            contains_empty: false,
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Accumulated cells; item 0 is always the sentinel
    pub fn items(&self) -> &[QueryCell] {
        &self.items
    }

    /// True once the query is known to match nothing
    pub fn is_provably_empty(&self) -> bool {
        self.contains_empty
    }

    /// Same as [`Query::intersect`]
    pub fn where_(self, member: &str, condition: Condition) -> QueryResult<Self> {
        self.intersect(member, condition)
    }

    /// Same as [`Query::intersect_group`]
    pub fn where_group<F>(self, build: F) -> QueryResult<Self>
    where
        F: FnOnce(Query<'s>) -> QueryResult<Query<'s>>,
    {
        self.intersect_group(build)
    }

    /// Requires `member` to satisfy `condition`
    pub fn intersect(mut self, member: &str, condition: Condition) -> QueryResult<Self> {
        self.check_member(member)?;
        if self.contains_empty || condition.is_unsatisfiable() {
            self.contains_empty = true;
            return Ok(self);
        }
        self.push_compare(Combination::Intersect, member, condition);
        Ok(self)
    }

    /// Requires the nested query built by `build` to match
    pub fn intersect_group<F>(mut self, build: F) -> QueryResult<Self>
    where
        F: FnOnce(Query<'s>) -> QueryResult<Query<'s>>,
    {
        let nested = build(Query::new(self.schema))?;
        if self.contains_empty || nested.contains_empty {
            self.contains_empty = true;
            return Ok(self);
        }
        self.push_group(Combination::Intersect, nested);
        Ok(self)
    }

    /// Adds `member` satisfying `condition` as an alternative
    pub fn union(mut self, member: &str, condition: Condition) -> QueryResult<Self> {
        self.check_member(member)?;
        if !self.contains_empty {
            self.push_compare(Combination::Union, member, condition);
        }
        Ok(self)
    }

    /// Records the nested query built by `build` as a union group.
    ///
    /// The nested query is validated and kept in the cell list, but the
    /// compiler emits no clause for union groups. A provably empty nested
    /// query is dropped.
    pub fn union_group<F>(mut self, build: F) -> QueryResult<Self>
    where
        F: FnOnce(Query<'s>) -> QueryResult<Query<'s>>,
    {
        let nested = build(Query::new(self.schema))?;
        if !self.contains_empty && !nested.contains_empty {
            self.push_group(Combination::Union, nested);
        }
        Ok(self)
    }

    /// Keyword form of [`Query::intersect`]
    pub fn where_keywords<K, V>(self, member: &str, keywords: impl IntoIterator<Item = (K, V)>) -> QueryResult<Self>
    where
        K: AsRef<str>,
        V: Into<QueryValue>,
    {
        self.check_member(member)?;
        let condition = Condition::from_keywords(keywords)?;
        self.intersect(member, condition)
    }

    /// Keyword form of [`Query::union`]
    pub fn union_keywords<K, V>(self, member: &str, keywords: impl IntoIterator<Item = (K, V)>) -> QueryResult<Self>
    where
        K: AsRef<str>,
        V: Into<QueryValue>,
    {
        self.check_member(member)?;
        let condition = Condition::from_keywords(keywords)?;
        self.union(member, condition)
    }

    /// Sorts by `member`
    pub fn order_by(mut self, member: &str, descending: bool) -> QueryResult<Self> {
        self.check_member(member)?;
        if !self.contains_empty {
            let direction = if descending { SortDirection::Desc } else { SortDirection::Asc };
            self.items.push(QueryCell::Order {
                direction,
                member: member.to_string(),
            });
        }
        Ok(self)
    }

    /// Compiles to a boolean clause and sort list.
    ///
    /// A provably empty query compiles to no clause and no sort.
    pub fn compile(&self) -> CompiledQuery {
        if self.contains_empty {
            return CompiledQuery::match_all();
        }
        QueryCompiler::compile(&self.items)
    }

    /// Fails unless the first path segment is a declared member
    pub fn check_member(&self, member: &str) -> QueryResult<()> {
        if self.schema.has_member(member) {
            Ok(())
        } else {
            Err(QueryError::property_not_found(member, &self.schema.name))
        }
    }

    fn push_compare(&mut self, combination: Combination, member: &str, condition: Condition) {
        self.items.push(QueryCell::Compare {
            combination,
            comparison: condition.comparison,
            member: member.to_string(),
            value: condition.value,
        });
    }

    fn push_group(&mut self, combination: Combination, nested: Query<'s>) {
        let cells = nested.items.into_iter().filter(|c| !c.is_sentinel()).collect();
        self.items.push(QueryCell::Group { combination, cells });
    }
}
