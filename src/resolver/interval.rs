//! Depth interval disjointness
//!
//! Intervals are half-open `[top, bot)`: `0-20` and `20-40` touch but do
//! not overlap.

use crate::record::{Record, RecordKey};
use crate::schema::IntervalSpec;

/// Half-open interval overlap
pub fn overlaps(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Finds a stored interval overlapping `[top, bot)`.
///
/// `rows` must already be restricted to the record's scope.
pub fn find_overlap<'r>(
    spec: &IntervalSpec,
    top: f64,
    bot: f64,
    rows: impl IntoIterator<Item = (&'r RecordKey, &'r Record)>,
) -> Option<RecordKey> {
    rows.into_iter()
        .find(|(_, record)| {
            match (record.number(&spec.top), record.number(&spec.bot)) {
                (Some(t), Some(b)) => overlaps((top, bot), (t, b)),
                _ => false,
            }
        })
        .map(|(key, _)| key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> IntervalSpec {
        IntervalSpec {
            scope: vec!["iso".into(), "id".into(), "hori".into()],
            top: "top".into(),
            bot: "bot".into(),
        }
    }

    #[test]
    fn test_half_open() {
        assert!(overlaps((10.0, 20.0), (15.0, 25.0)));
        assert!(overlaps((10.0, 30.0), (15.0, 25.0)));
        assert!(!overlaps((10.0, 20.0), (20.0, 30.0)));
        assert!(!overlaps((20.0, 30.0), (10.0, 20.0)));
    }

    #[test]
    fn test_find_overlap() {
        let stored = vec![
            (RecordKey::horizon("KE", 1, 1).push(0).push(10), Record::new().with("top", 0).with("bot", 10)),
            (RecordKey::horizon("KE", 1, 1).push(10).push(20), Record::new().with("top", 10).with("bot", 20)),
        ];
        let rows = || stored.iter().map(|(k, r)| (k, r));

        assert_eq!(find_overlap(&spec(), 15.0, 25.0, rows()), Some(stored[1].0.clone()));
        assert_eq!(find_overlap(&spec(), 20.0, 30.0, rows()), None);
    }
}
