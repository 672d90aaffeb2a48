//! Spectral library entries
//!
//! A library entry is one ASD scan named by its batch/lab id and placed at
//! the coordinates of the profile its sample was taken from. Samples point at
//! their profile through a plot code of the form `"<ISO> <ID>"`.

use serde::Serialize;

use super::Spectrum;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryEntry {
    /// Batch/lab id of the scan
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub spectrum: Spectrum,
}

/// Splits a plot code into `(iso, id)`.
///
/// Returns None when the code is not two whitespace-separated parts with an
/// integer id.
pub fn parse_plotcode(plotcode: &str) -> Option<(String, i64)> {
    let mut parts = plotcode.split_whitespace();
    let iso = parts.next()?;
    let id = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((iso.to_string(), id))
}

/// Plot code of a profile
pub fn plotcode(iso: &str, id: i64) -> String {
    format!("{} {}", iso, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plotcode_round_trip() {
        assert_eq!(parse_plotcode(&plotcode("KE", 12)), Some(("KE".to_string(), 12)));
        assert_eq!(parse_plotcode("  BR   7 "), Some(("BR".to_string(), 7)));
    }

    #[test]
    fn test_malformed_plotcodes() {
        assert_eq!(parse_plotcode("KE"), None);
        assert_eq!(parse_plotcode("KE x"), None);
        assert_eq!(parse_plotcode("KE 1 2"), None);
        assert_eq!(parse_plotcode(""), None);
    }
}
