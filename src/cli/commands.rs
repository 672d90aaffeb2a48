//! CLI command implementations
//!
//! Every command builds its registry from the same source: the built-in
//! catalog plus the configured schema directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::config::StoreConfig;
use crate::observability::init_logging;
use crate::schema::SchemaLoader;

use super::args::Command;
use super::errors::CliResult;
use super::io::{describe_kinds, write_json};

/// Main CLI entry point
///
/// Parses arguments, installs logging and dispatches to the command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let config = load_config(cli.command.config_path())?;
    init_logging(&config.log);
    run_command(cli.command, &config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &StoreConfig) -> CliResult<()> {
    match cmd {
        Command::Describe { kind, .. } => describe(config, kind.as_deref()),
        Command::ExportSchemas { dir, .. } => export_schemas(config, &dir).map(|_| ()),
        Command::Check { config: path } => check(config, &path),
    }
}

fn load_config(path: Option<&PathBuf>) -> CliResult<StoreConfig> {
    match path {
        Some(path) => Ok(StoreConfig::load(path)?),
        None => Ok(StoreConfig::default()),
    }
}

/// Print kind declarations as a JSON array
pub fn describe(config: &StoreConfig, kind: Option<&str>) -> CliResult<()> {
    let registry = config.build_registry()?;
    write_json(&describe_kinds(&registry, kind)?)
}

/// Write one file per kind into `dir`.
///
/// Existing files are left alone and make the export fail, so a directory
/// is exported at most once.
pub fn export_schemas(config: &StoreConfig, dir: &Path) -> CliResult<Vec<PathBuf>> {
    let registry = config.build_registry()?;
    fs::create_dir_all(dir)?;

    let loader = SchemaLoader::new(dir);
    let mut written = Vec::new();
    for kind in registry.kinds() {
        written.push(loader.save(kind)?);
    }
    Ok(written)
}

/// Validate the config and its schemas, then print a summary
pub fn check(config: &StoreConfig, path: &Path) -> CliResult<()> {
    let registry = config.build_registry()?;
    write_json(&json!({
        "status": "ok",
        "config": path.display().to_string(),
        "kinds": registry.len(),
        "schema_dir": config.schema_dir.as_ref().map(|d| d.display().to_string()),
        "enforce_vocabulary": config.enforce_vocabulary,
        "default_scan_order": config.default_scan_order,
    }))
}
