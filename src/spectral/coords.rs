//! Degrees/minutes/seconds to signed decimal degrees

use crate::record::Record;

/// One coordinate axis as recorded on a site description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
    /// True for the southern or western hemisphere
    pub negative: bool,
}

impl Dms {
    /// Signed decimal degrees. The hemisphere applies to the whole value.
    pub fn to_decimal(&self) -> f64 {
        let magnitude = self.degrees.abs() + self.minutes / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Reads one axis from a record; missing parts count as zero.
    fn from_record(record: &Record, d: &str, m: &str, s: &str, hemisphere: &str, negative: &str) -> Self {
        let part = |field: &str| record.number(field).unwrap_or(0.0);
        Self {
            degrees: part(d),
            minutes: part(m),
            seconds: part(s),
            negative: record.text(hemisphere) == Some(negative),
        }
    }
}

/// `(latitude, longitude)` in decimal degrees from a site or station record
pub fn decimal_degrees(record: &Record) -> (f64, f64) {
    let lat = Dms::from_record(record, "latd", "latm", "lats", "latns", "S");
    let lon = Dms::from_record(record, "lond", "lonm", "lons", "lonew", "W");
    (lat.to_decimal(), lon.to_decimal())
}
