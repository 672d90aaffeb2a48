//! CLI argument definitions using clap
//!
//! Commands:
//! - soildb describe [--kind <name>] [--config <path>]
//! - soildb export-schemas --dir <path> [--config <path>]
//! - soildb check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// soildb - referentially consistent store for soil profile records
#[derive(Parser, Debug)]
#[command(name = "soildb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print kind declarations as JSON
    Describe {
        /// Only this kind
        #[arg(long)]
        kind: Option<String>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write every kind declaration to a schema directory
    ExportSchemas {
        /// Target directory, created if missing
        #[arg(long)]
        dir: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file and its schema directory
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./soildb.json")]
        config: PathBuf,
    },
}

impl Command {
    /// Configuration file named by the command, if any
    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Command::Describe { config, .. }
            | Command::ExportSchemas { config, .. } => config.as_ref(),
            Command::Check { config } => Some(config),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_describe() {
        let cli = Cli::try_parse_from(["soildb", "describe", "--kind", "Country"]).unwrap();
        match cli.command {
            Command::Describe { kind, config } => {
                assert_eq!(kind.as_deref(), Some("Country"));
                assert!(config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_check_default_config() {
        let cli = Cli::try_parse_from(["soildb", "check"]).unwrap();
        assert_eq!(cli.command.config_path(), Some(&PathBuf::from("./soildb.json")));
    }

    #[test]
    fn test_export_requires_dir() {
        assert!(Cli::try_parse_from(["soildb", "export-schemas"]).is_err());
    }
}
