//! JSON output for CLI
//!
//! Every command writes a single pretty-printed JSON document to stdout.
//! Logs go to stderr so the output stays machine-readable.

use std::io::{self, Write};

use serde::Serialize;

use crate::schema::{KindSchema, SchemaRegistry};

use super::errors::CliResult;

/// Writes `value` as pretty JSON to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Kind declarations in registration order, or just `only`
pub(crate) fn describe_kinds<'r>(registry: &'r SchemaRegistry, only: Option<&str>) -> CliResult<Vec<&'r KindSchema>> {
    match only {
        Some(name) => Ok(vec![registry.describe(name)?]),
        None => Ok(registry.kinds().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::cli::CliError;

    #[test]
    fn test_describe_all_in_registration_order() {
        let registry = catalog::registry().unwrap();
        let kinds = describe_kinds(&registry, None).unwrap();
        assert_eq!(kinds.len(), registry.len());
        assert_eq!(kinds[0].name, "Region");
    }

    #[test]
    fn test_describe_one() {
        let registry = catalog::registry().unwrap();
        let kinds = describe_kinds(&registry, Some("ASD_Spectra")).unwrap();
        assert_eq!(kinds.len(), 1);

        let json = serde_json::to_value(kinds[0]).unwrap();
        assert_eq!(json["key"][0], "batch_labid");
        assert_eq!(json["fields"][1]["type"], "spectrum");
        assert_eq!(json["fields"][1]["end_nm"], 2500);
    }

    #[test]
    fn test_describe_unknown_kind() {
        let registry = catalog::registry().unwrap();
        let err = describe_kinds(&registry, Some("Horizon_X")).unwrap_err();
        assert!(matches!(err, CliError::Schema(_)));
        assert_eq!(err.code_str(), "SOIL_UNKNOWN_KIND");
    }
}
