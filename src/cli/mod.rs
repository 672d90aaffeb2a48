//! CLI module for soildb
//!
//! Schema maintenance only; the CLI never reads soil records.
//! - describe: Print kind declarations
//! - export-schemas: Write declarations to a schema directory
//! - check: Validate a configuration and its schemas

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, describe, export_schemas, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::write_json;
