//! Command-line interface
//!
//! - compile: print the request body for a query description on stdin
//! - check-config: validate a client configuration file

mod args;
mod commands;
mod errors;
mod io;
mod steps;

pub use args::{Cli, Command, Mode};
pub use commands::{check_config, compile, compile_request, describe_config, run, run_command, CompileOptions};
pub use errors::{CliError, CliResult};
pub use io::{read_input, write_error, write_response};
pub use steps::{apply, Step};
