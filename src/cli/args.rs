//! CLI argument definitions using clap
//!
//! Commands:
//! - docquery compile --schema <path> [--mode <mode>] [--limit N] [--skip N]
//!   [--group-member M] [--ascending]
//! - docquery check-config --config <path>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// docquery - compile validated document queries to search engine requests
#[derive(Parser, Debug)]
#[command(name = "docquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Which executor request to produce
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Count,
    Exists,
    GroupBy,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read query steps from stdin and print the request body
    Compile {
        /// Schema definition file
        #[arg(long)]
        schema: PathBuf,

        #[arg(long, value_enum, default_value_t = Mode::Search)]
        mode: Mode,

        /// Page size, or bucket count for group-by
        #[arg(long)]
        limit: Option<u64>,

        #[arg(long, default_value_t = 0)]
        skip: u64,

        /// Member to aggregate on (group-by only)
        #[arg(long)]
        group_member: Option<String>,

        /// Smallest buckets first (group-by only)
        #[arg(long)]
        ascending: bool,
    },

    /// Validate a client configuration file
    CheckConfig {
        #[arg(long, default_value = "./docquery.json")]
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile_defaults() {
        let cli = Cli::try_parse_from(["docquery", "compile", "--schema", "user.json"]).unwrap();
        match cli.command {
            Command::Compile {
                schema,
                mode,
                limit,
                skip,
                group_member,
                ascending,
            } => {
                assert_eq!(schema, PathBuf::from("user.json"));
                assert_eq!(mode, Mode::Search);
                assert_eq!(limit, None);
                assert_eq!(skip, 0);
                assert!(group_member.is_none());
                assert!(!ascending);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_group_by() {
        let cli = Cli::try_parse_from([
            "docquery",
            "compile",
            "--schema",
            "user.json",
            "--mode",
            "group-by",
            "--group-member",
            "age",
            "--ascending",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Compile {
                mode: Mode::GroupBy,
                ascending: true,
                ..
            }
        ));
    }
}
