//! Origin and time-window predicates over parsed keys.

use jiff::Timestamp;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::key::ParsedKey;

/// Inclusive `[start, end]` ingestion window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TimeWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWindow`] if `start` is after `end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether the key's timestamp lies inside the window, bounds included.
    pub fn contains(&self, key: &ParsedKey) -> bool {
        key.in_time_range(self.start, self.end)
    }
}

impl ParsedKey {
    /// Exact, case-sensitive comparison against the expected origin.
    pub fn in_origin(&self, expected: &str) -> bool {
        self.origin() == expected
    }

    /// `start <= timestamp <= end`.
    pub fn in_time_range(&self, start: Timestamp, end: Timestamp) -> bool {
        start <= self.timestamp() && self.timestamp() <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ParsedKey {
        ParsedKey::parse("repo1/type/a/2020/03/06/20-09-02-seg123.gz").unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn shift(t: Timestamp, seconds: i64) -> Timestamp {
        Timestamp::from_second(t.as_second() + seconds).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let key = key();
        let at = key.timestamp();

        assert!(key.in_time_range(at, at));
        assert!(key.in_time_range(at, shift(at, 60)));
        assert!(key.in_time_range(shift(at, -60), at));
    }

    #[test]
    fn one_second_outside_is_excluded() {
        let key = key();
        let at = key.timestamp();

        assert!(!key.in_time_range(shift(at, 1), shift(at, 60)));
        assert!(!key.in_time_range(shift(at, -60), shift(at, -1)));
    }

    #[test]
    fn window_contains() {
        let window =
            TimeWindow::new(ts("2020-03-06T00:00:00Z"), ts("2020-03-06T23:59:59Z")).unwrap();
        assert!(window.contains(&key()));

        let window =
            TimeWindow::new(ts("2020-03-05T00:00:00Z"), ts("2020-03-05T23:59:59Z")).unwrap();
        assert!(!window.contains(&key()));
    }

    #[test]
    fn reject_reversed_window() {
        let err = TimeWindow::new(ts("2020-03-06T00:00:00Z"), ts("2020-03-05T00:00:00Z"));
        assert!(matches!(err, Err(Error::InvalidWindow { .. })));
    }

    #[test]
    fn origin_is_exact() {
        let key = key();
        assert!(key.in_origin("repo1"));
        assert!(!key.in_origin("Repo1"));
        assert!(!key.in_origin("repo"));
        assert!(!key.in_origin("repo10"));
    }
}
