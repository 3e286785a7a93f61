//! CLI command implementations
//!
//! Commands are thin: load inputs, run the library, print one JSON line.
//! Failures are printed as an error response and returned so `main` can
//! exit non-zero.

use std::path::Path;

use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::executor::request::{count_body, exists_body, group_by_body, search_body};
use crate::query::Query;
use crate::schema::{Schema, SchemaCatalog};

use super::args::{Command, Mode};
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response};
use super::steps::{self, Step};

const DEFAULT_FETCH_LIMIT: u64 = 1000;
const DEFAULT_GROUP_LIMIT: u64 = 10;

/// Request shape selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub mode: Mode,
    pub limit: Option<u64>,
    pub skip: u64,
    pub group_member: Option<String>,
    pub ascending: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Search,
            limit: None,
            skip: 0,
            group_member: None,
            ascending: false,
        }
    }
}

/// Main CLI entry point; the only function `main.rs` calls
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    let outcome = match cmd {
        Command::Compile {
            schema,
            mode,
            limit,
            skip,
            group_member,
            ascending,
        } => compile(
            &schema,
            &CompileOptions {
                mode,
                limit,
                skip,
                group_member,
                ascending,
            },
        ),
        Command::CheckConfig { config } => check_config(&config),
    };

    if let Err(e) = &outcome {
        write_error(e.code(), &e.to_string())?;
    }
    outcome
}

/// Compiles the steps on stdin against the schema at `schema_path`
pub fn compile(schema_path: &Path, options: &CompileOptions) -> CliResult<()> {
    let schema = SchemaCatalog::load_file(schema_path)?;
    let input = read_input()?;
    let body = compile_request(&schema, &input, options)?;
    write_response(body)
}

/// Builds the request body the executor would send.
///
/// Provably empty queries yield `null` for every mode except group-by,
/// since the executor sends nothing for them.
pub fn compile_request(schema: &Schema, input: &Value, options: &CompileOptions) -> CliResult<Value> {
    let steps = Step::parse_list(input)?;
    let query = steps::apply(Query::new(schema), &steps)?;

    let body = match options.mode {
        Mode::GroupBy => {
            let member = options
                .group_member
                .as_deref()
                .ok_or_else(|| CliError::invalid_input("--group-member is required for group-by"))?;
            query.check_member(member)?;
            let limit = options.limit.unwrap_or(DEFAULT_GROUP_LIMIT);
            group_by_body(&query.compile(), member, limit, !options.ascending)
        }
        _ if query.is_provably_empty() => Value::Null,
        Mode::Search => search_body(&query.compile(), options.limit.unwrap_or(DEFAULT_FETCH_LIMIT), options.skip),
        Mode::Count => count_body(&query.compile()).unwrap_or(Value::Null),
        Mode::Exists => exists_body(&query.compile()),
    };
    Ok(body)
}

/// Validates a client config file and prints the resolved settings
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = ClientConfig::load(config_path)?;
    write_response(describe_config(&config))
}

pub fn describe_config(config: &ClientConfig) -> Value {
    json!({
        "url": config.url,
        "index_prefix": config.index_prefix,
        "tls": config.uses_tls(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemberKind;

    fn schema() -> Schema {
        Schema::new("User")
            .member("name", MemberKind::String)
            .member("tags", MemberKind::List { item: None })
    }

    #[test]
    fn test_compile_search_defaults() {
        let body = compile_request(&schema(), &json!([]), &CompileOptions::default()).unwrap();
        assert_eq!(body, json!({"from": 0, "size": 1000, "fields": ["_source"], "sort": []}));
    }

    #[test]
    fn test_compile_count_without_clause() {
        let options = CompileOptions {
            mode: Mode::Count,
            ..CompileOptions::default()
        };
        assert_eq!(compile_request(&schema(), &json!([]), &options).unwrap(), Value::Null);
    }

    #[test]
    fn test_compile_provably_empty() {
        let input = json!([{"where": "tags", "contains": []}]);
        let body = compile_request(&schema(), &input, &CompileOptions::default()).unwrap();
        assert_eq!(body, Value::Null);

        let options = CompileOptions {
            mode: Mode::GroupBy,
            group_member: Some("name".into()),
            ..CompileOptions::default()
        };
        let body = compile_request(&schema(), &input, &options).unwrap();
        assert_eq!(body["aggs"]["group"]["terms"]["size"], 10);
        assert!(body.get("query").is_none());
    }

    #[test]
    fn test_compile_group_by_requires_member() {
        let options = CompileOptions {
            mode: Mode::GroupBy,
            ..CompileOptions::default()
        };
        let err = compile_request(&schema(), &json!([]), &options).unwrap_err();
        assert_eq!(err.code(), "DOCQUERY_CLI_INVALID_INPUT");

        let options = CompileOptions {
            mode: Mode::GroupBy,
            group_member: Some("color".into()),
            ..CompileOptions::default()
        };
        let err = compile_request(&schema(), &json!([]), &options).unwrap_err();
        assert_eq!(err.code(), "DOCQUERY_PROPERTY_NOT_FOUND");
    }

    #[test]
    fn test_describe_config() {
        assert_eq!(
            describe_config(&ClientConfig::with_prefix("qa_")),
            json!({"url": "http://localhost:9200", "index_prefix": "qa_", "tls": false})
        );
    }
}
