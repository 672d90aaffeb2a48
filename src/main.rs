//! soildb CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors go to stderr
//! with their code and end the process with status 1.

use soildb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code_str(), e);
        std::process::exit(1);
    }
}
