//! Query compilation tests
//!
//! Exercises the public builder and compiler end to end:
//! - The sentinel leads every builder
//! - Provably empty builders compile to no clause and no sort
//! - Leaf clause shapes and the necessary/optional fold
//! - Member and keyword validation happen at mutation time

use chrono::NaiveDate;
use docquery::cli::{apply, Step};
use docquery::query::{CompiledQuery, Condition, Query, QueryCell, QueryError};
use docquery::schema::{MemberKind, Schema, SchemaCatalog};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn user() -> Schema {
    Schema::new("User")
        .member("name", MemberKind::String)
        .member("age", MemberKind::Integer)
        .member("created", MemberKind::DateTime)
        .member("tags", MemberKind::List { item: Some(Box::new(MemberKind::String)) })
        .member("profile", MemberKind::Dict)
        .member("a", MemberKind::Integer)
        .member("b", MemberKind::Integer)
        .member("t", MemberKind::String)
}

fn match_name(value: &str) -> serde_json::Value {
    json!({"match": {"name": {"operator": "and", "query": value}}})
}

// =============================================================================
// Sentinel and Short-Circuit Tests
// =============================================================================

/// Every builder starts with the sentinel and compiles to nothing.
#[test]
fn test_fresh_builder_is_sentinel_only() {
    let schema = user();
    let query = Query::new(&schema);

    assert_eq!(query.items(), &[QueryCell::All]);
    assert_eq!(query.compile(), CompiledQuery { clause: None, sort: vec![] });
}

/// An intersected empty `contains` poisons the whole query.
#[test]
fn test_intersect_empty_contains_short_circuits() {
    let schema = user();
    let query = Query::new(&schema)
        .where_("name", Condition::equal("kelp"))
        .unwrap()
        .where_("tags", Condition::contains(Vec::<String>::new()))
        .unwrap()
        .order_by("age", true)
        .unwrap();

    assert!(query.is_provably_empty());
    assert_eq!(query.items()[0], QueryCell::All);
    assert_eq!(query.compile(), CompiledQuery::default());
}

/// A union leg with an empty `contains` only contributes no matches.
#[test]
fn test_union_empty_contains_keeps_query_alive() {
    let schema = user();
    let query = Query::new(&schema)
        .where_("name", Condition::equal("kelp"))
        .unwrap()
        .union("tags", Condition::contains(Vec::<String>::new()))
        .unwrap();

    assert!(!query.is_provably_empty());
    let clause = query.compile().clause.unwrap();
    assert_eq!(
        clause,
        json!({"bool": {"minimum_should_match": 1, "should": [
            match_name("kelp"),
            {"bool": {"should": []}}
        ]}})
    );
}

/// An empty nested intersection poisons the outer query.
#[test]
fn test_empty_nested_intersection_short_circuits() {
    let schema = user();
    let query = Query::new(&schema)
        .where_group(|q| q.where_("tags", Condition::contains(Vec::<String>::new())))
        .unwrap();

    assert!(query.is_provably_empty());
}

// =============================================================================
// Clause Shape Tests
// =============================================================================

#[test]
fn test_single_equal_is_wrapped_once() {
    let schema = user();
    let compiled = Query::new(&schema)
        .intersect("name", Condition::equal("kelp"))
        .unwrap()
        .compile();

    assert_eq!(
        compiled.clause.unwrap(),
        json!({"bool": {"minimum_should_match": 1, "should": [
            {"bool": {"minimum_should_match": 1, "should": [match_name("kelp")]}}
        ]}})
    );
    assert!(compiled.sort.is_empty());
}

#[test]
fn test_nested_union_inside_intersection() {
    let schema = user();
    let compiled = Query::new(&schema)
        .intersect_group(|q| q.where_("a", Condition::equal(1))?.union("b", Condition::equal(2)))
        .unwrap()
        .compile();

    let inner = json!({"bool": {"minimum_should_match": 1, "should": [
        {"match": {"a": {"operator": "and", "query": 1}}},
        {"match": {"b": {"operator": "and", "query": 2}}}
    ]}});
    assert_eq!(
        compiled.clause.unwrap(),
        json!({"bool": {"minimum_should_match": 1, "should": [
            {"bool": {"minimum_should_match": 1, "should": [inner]}}
        ]}})
    );
}

/// A union group is validated but adds nothing to the compiled clause.
#[test]
fn test_union_group_leaves_clause_unchanged() {
    let schema = user();
    let with_group = Query::new(&schema)
        .where_("a", Condition::equal(1))
        .unwrap()
        .union_group(|q| q.where_("b", Condition::equal(2)))
        .unwrap();
    let a_only = Query::new(&schema).where_("a", Condition::equal(1)).unwrap();

    assert_eq!(with_group.items().len(), 3);
    assert_eq!(with_group.compile(), a_only.compile());

    let err = Query::new(&schema)
        .union_group(|q| q.where_("nope", Condition::equal(2)))
        .unwrap_err();
    assert!(matches!(err, QueryError::PropertyNotFound { .. }));
}

#[test]
fn test_range_clause() {
    let schema = user();
    let clause = Query::new(&schema)
        .intersect("age", Condition::greater_equal(12))
        .unwrap()
        .compile()
        .clause
        .unwrap();

    assert_eq!(clause["bool"]["should"][0]["bool"]["should"][0], json!({"range": {"age": {"gte": 12}}}));
}

#[test]
fn test_datetime_range_renders_without_fraction() {
    let schema = user();
    let when = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_milli_opt(7, 5, 1, 250)
        .unwrap();
    let clause = Query::new(&schema)
        .where_("created", Condition::less(when))
        .unwrap()
        .compile()
        .clause
        .unwrap();

    assert_eq!(
        clause["bool"]["should"][0]["bool"]["should"][0],
        json!({"range": {"created": {"lt": "2024-03-09T07:05:01"}}})
    );
}

#[test]
fn test_null_equality_uses_missing_filter() {
    let schema = user();
    let clause = Query::new(&schema)
        .where_("name", Condition::equal(None::<String>))
        .unwrap()
        .union("name", Condition::unequal(None::<String>))
        .unwrap()
        .compile()
        .clause
        .unwrap();

    let missing = json!({"filtered": {"filter": {"missing": {"field": "name"}}}});
    assert_eq!(
        clause,
        json!({"bool": {"minimum_should_match": 1, "should": [
            missing.clone(),
            {"bool": {"must_not": missing}}
        ]}})
    );
}

#[test]
fn test_like_is_not_unlike() {
    let schema = user();
    let clause = Query::new(&schema)
        .where_("name", Condition::like("ke<l>p"))
        .unwrap()
        .compile()
        .clause
        .unwrap();

    assert_eq!(
        clause["bool"]["should"][0]["bool"]["should"][0],
        json!({"bool": {"should": [
            {"match": {"name": {"query": "kelp", "operator": "and"}}},
            {"regexp": {"name": ".*kelp.*"}}
        ]}})
    );
}

#[test]
fn test_order_directions() {
    let schema = user();

    let asc = Query::new(&schema).order_by("t", false).unwrap().compile();
    assert_eq!(asc.sort, vec![json!({"t": {"order": "asc", "ignore_unmapped": true, "missing": "_first"}})]);
    assert_eq!(asc.clause, None);

    let desc = Query::new(&schema).order_by("t", true).unwrap().compile();
    assert_eq!(desc.sort, vec![json!({"t": {"order": "desc", "ignore_unmapped": true, "missing": "_last"}})]);
}

#[test]
fn test_dotted_member_paths() {
    let schema = user();
    let clause = Query::new(&schema)
        .where_("profile.city", Condition::equal("Taipei"))
        .unwrap()
        .compile()
        .clause
        .unwrap();

    assert_eq!(
        clause["bool"]["should"][0]["bool"]["should"][0],
        json!({"match": {"profile.city": {"query": "Taipei", "operator": "and"}}})
    );
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_unknown_member_rejected() {
    let schema = user();
    let err = Query::new(&schema)
        .where_("missing_field", Condition::equal("x"))
        .unwrap_err();
    assert_eq!(err, QueryError::property_not_found("missing_field", "User"));
    assert_eq!(err.to_string(), "missing_field not in User");
}

#[test]
fn test_keyword_arity_rejected() {
    let schema = user();

    let two = Query::new(&schema).where_keywords("a", [("equal", 1), ("unequal", 2)]);
    assert!(matches!(two, Err(QueryError::QuerySyntax(_))));

    let none = Query::new(&schema).where_keywords("a", Vec::<(&str, i64)>::new());
    assert!(matches!(none, Err(QueryError::QuerySyntax(_))));

    let unknown = Query::new(&schema).union_keywords("a", [("between", 1)]);
    assert!(matches!(unknown, Err(QueryError::QuerySyntax(_))));
}

#[test]
fn test_member_checked_before_keywords() {
    let schema = user();
    let err = Query::new(&schema)
        .where_keywords("nope", [("between", 1)])
        .unwrap_err();
    assert!(matches!(err, QueryError::PropertyNotFound { .. }));
}

// =============================================================================
// Schema File and Step Description Tests
// =============================================================================

/// A schema loaded from disk drives the same compilation as one built in code.
#[test]
fn test_steps_against_loaded_schema() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("user.json");
    std::fs::write(
        &path,
        r#"{"name": "User", "members": [
            {"name": "name", "type": "string", "required": true},
            {"name": "age", "type": "integer"}
        ]}"#,
    )
    .unwrap();
    let schema = SchemaCatalog::load_file(&path).unwrap();

    let steps = Step::parse_list(&json!([
        {"where": "name", "equal": "kelp"},
        {"order_by": "age", "descending": true}
    ]))
    .unwrap();
    let compiled = apply(Query::new(&schema), &steps).unwrap().compile();

    let expected = Query::new(&schema)
        .where_("name", Condition::equal("kelp"))
        .unwrap()
        .order_by("age", true)
        .unwrap()
        .compile();
    assert_eq!(compiled, expected);
}
