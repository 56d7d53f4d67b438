//! Segment object keys.
//!
//! Archived segments are stored under keys of the form
//!
//! ```text
//! <origin>/(<tagKey>/<tagValue>/)*<YYYY>/<MM>/<DD>/<HH>-<MM>-<SS>-<segmentId>.<ext>
//! ```
//!
//! [`ParsedKey::parse`] turns such a key into its typed components. Date and
//! time components are read as UTC.

mod tags;

use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use serde::Serialize;
pub use tags::Tags;

use crate::error::ParseError;

/// Number of `/` segments that must remain once the tag pairs are consumed.
const DATE_SEGMENTS: usize = 4;

/// Typed view of a segment key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParsedKey {
    origin: String,
    tags: Tags,
    timestamp: Timestamp,
    segment_id: String,
}

impl ParsedKey {
    /// Parses a segment key.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the key has too few segments, a date
    /// component is not exactly 4/2/2 digits, the stem is not
    /// `<HH>-<MM>-<SS>-<segment>`, or the components are not a valid
    /// calendar date and time.
    pub fn parse(key: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = key.split('/').collect();
        let (origin, mut rest) = match tokens.split_first() {
            Some((origin, rest)) if !origin.is_empty() => (*origin, rest),
            _ => return Err(ParseError::MissingOrigin),
        };

        let mut tags = Tags::new();
        while rest.len() > DATE_SEGMENTS {
            tags.insert(rest[0], rest[1]);
            rest = &rest[2..];
        }

        let [year, month, day, stem] = rest else {
            return Err(ParseError::TooFewSegments { found: rest.len() });
        };

        let year = parse_date_component("year", year, 4)?;
        let month = parse_date_component("month", month, 2)?;
        let day = parse_date_component("day", day, 2)?;

        let mut parts = stem.split('-');
        let (Some(hour), Some(minute), Some(second)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseError::MalformedStem {
                stem: stem.to_string(),
            });
        };
        let remainder: Vec<&str> = parts.collect();
        if remainder.is_empty() {
            return Err(ParseError::MalformedStem {
                stem: stem.to_string(),
            });
        }

        let hour = parse_time_component("hour", hour)?;
        let minute = parse_time_component("minute", minute)?;
        let second = parse_time_component("second", second)?;

        let remainder = remainder.join("-");
        let segment_id = match remainder.split_once('.') {
            Some((id, _extension)) => id,
            None => remainder.as_str(),
        };
        if segment_id.is_empty() {
            return Err(ParseError::EmptySegmentId {
                stem: stem.to_string(),
            });
        }

        let timestamp = utc_timestamp(year, month, day, hour, minute, second)?;

        Ok(Self {
            origin: origin.to_string(),
            tags,
            timestamp,
            segment_id: segment_id.to_string(),
        })
    }

    /// First path segment of the key.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Tag pairs in first-seen order.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Time the segment was written, to the second.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Identifier distinguishing segments written within the same second.
    pub fn segment_id(&self) -> &str {
        &self.segment_id
    }
}

impl FromStr for ParsedKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Accepts exactly `width` ASCII digits.
fn parse_date_component<T: FromStr>(
    component: &'static str,
    value: &str,
    width: usize,
) -> Result<T, ParseError> {
    let invalid = || ParseError::InvalidDateComponent {
        component,
        value: value.to_string(),
        width,
    };

    if value.len() != width || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

fn parse_time_component(component: &'static str, value: &str) -> Result<i8, ParseError> {
    let invalid = || ParseError::InvalidTimeComponent {
        component,
        value: value.to_string(),
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

fn utc_timestamp(
    year: i16,
    month: i8,
    day: i8,
    hour: i8,
    minute: i8,
    second: i8,
) -> Result<Timestamp, ParseError> {
    let invalid = |err: jiff::Error| ParseError::InvalidDateTime {
        reason: err.to_string(),
    };

    let date = Date::new(year, month, day).map_err(invalid)?;
    let time = Time::new(hour, minute, second, 0).map_err(invalid)?;
    let zoned = DateTime::from_parts(date, time)
        .to_zoned(TimeZone::UTC)
        .map_err(invalid)?;

    Ok(zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUMIO_KEY: &str =
        "humio/type/accesslog/error/true/host/go01/2019/09/17/00-18-48-YfZRpy3HqvpwqPYthINcO0AU.gz";

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn parse_key_with_tags() {
        let key = ParsedKey::parse(HUMIO_KEY).unwrap();
        assert_eq!(key.origin(), "humio");
        assert_eq!(
            key.tags().iter().collect::<Vec<_>>(),
            vec![("type", "accesslog"), ("error", "true"), ("host", "go01")]
        );
        assert_eq!(key.timestamp(), ts("2019-09-17T00:18:48Z"));
        assert_eq!(key.segment_id(), "YfZRpy3HqvpwqPYthINcO0AU");
    }

    #[test]
    fn parse_key_with_numeric_tag_value() {
        let key = ParsedKey::parse(
            "filebeat/type/humio/error/true/humioBackfill/0/2020/03/06/20-09-02-j8zBEEtnyui4McNBwXyeTCG9.gz",
        )
        .unwrap();
        assert_eq!(key.tags().get("humioBackfill"), Some("0"));
        assert_eq!(key.timestamp(), ts("2020-03-06T20:09:02Z"));
        assert_eq!(key.segment_id(), "j8zBEEtnyui4McNBwXyeTCG9");
    }

    #[test]
    fn parse_key_without_tags() {
        let key = ParsedKey::parse("repo1/2020/03/06/20-09-02-seg123.gz").unwrap();
        assert!(key.tags().is_empty());
        assert_eq!(key.segment_id(), "seg123");
    }

    #[test]
    fn parse_is_deterministic() {
        let first = ParsedKey::parse(HUMIO_KEY).unwrap();
        let second: ParsedKey = HUMIO_KEY.parse().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_tag_last_value_wins() {
        let key = ParsedKey::parse("repo1/type/a/host/h1/type/b/2020/03/06/20-09-02-seg.gz").unwrap();
        assert_eq!(
            key.tags().iter().collect::<Vec<_>>(),
            vec![("type", "b"), ("host", "h1")]
        );
    }

    #[test]
    fn segment_id_keeps_inner_dashes() {
        let key = ParsedKey::parse("repo1/2020/03/06/20-09-02-abc-def.tar.gz").unwrap();
        assert_eq!(key.segment_id(), "abc-def");
    }

    #[test]
    fn segment_id_without_extension() {
        let key = ParsedKey::parse("repo1/2020/03/06/20-09-02-seg123").unwrap();
        assert_eq!(key.segment_id(), "seg123");
    }

    #[test]
    fn reject_non_numeric_year() {
        let err = ParsedKey::parse("repo1/type/a/20AB/03/06/20-09-02-seg123.gz").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidDateComponent {
                component: "year",
                value: "20AB".to_string(),
                width: 4,
            }
        );
    }

    #[test]
    fn reject_wrong_digit_widths() {
        assert!(matches!(
            ParsedKey::parse("repo1/2020/3/06/20-09-02-seg.gz"),
            Err(ParseError::InvalidDateComponent { component: "month", .. })
        ));
        assert!(matches!(
            ParsedKey::parse("repo1/2020/03/006/20-09-02-seg.gz"),
            Err(ParseError::InvalidDateComponent { component: "day", .. })
        ));
        assert!(matches!(
            ParsedKey::parse("repo1/20201/03/06/20-09-02-seg.gz"),
            Err(ParseError::InvalidDateComponent { component: "year", .. })
        ));
    }

    #[test]
    fn reject_too_few_segments() {
        assert_eq!(
            ParsedKey::parse("repo1/2020/03/06").unwrap_err(),
            ParseError::TooFewSegments { found: 3 }
        );
        assert_eq!(
            ParsedKey::parse("repo1").unwrap_err(),
            ParseError::TooFewSegments { found: 0 }
        );
    }

    #[test]
    fn reject_odd_tag_segments() {
        // One dangling tag token leaves only three date segments.
        assert_eq!(
            ParsedKey::parse("repo1/type/a/extra/2020/03/06/20-09-02-seg.gz").unwrap_err(),
            ParseError::TooFewSegments { found: 3 }
        );
    }

    #[test]
    fn reject_empty_origin() {
        assert_eq!(ParsedKey::parse("").unwrap_err(), ParseError::MissingOrigin);
        assert_eq!(
            ParsedKey::parse("/2020/03/06/20-09-02-seg.gz").unwrap_err(),
            ParseError::MissingOrigin
        );
    }

    #[test]
    fn reject_short_stem() {
        assert!(matches!(
            ParsedKey::parse("repo1/2020/03/06/20-09-02.gz"),
            Err(ParseError::MalformedStem { .. })
        ));
        assert!(matches!(
            ParsedKey::parse("repo1/2020/03/06/20-09"),
            Err(ParseError::MalformedStem { .. })
        ));
    }

    #[test]
    fn reject_non_numeric_time() {
        assert_eq!(
            ParsedKey::parse("repo1/2020/03/06/2x-09-02-seg.gz").unwrap_err(),
            ParseError::InvalidTimeComponent {
                component: "hour",
                value: "2x".to_string(),
            }
        );
    }

    #[test]
    fn reject_impossible_datetime() {
        assert!(matches!(
            ParsedKey::parse("repo1/2020/13/06/20-09-02-seg.gz"),
            Err(ParseError::InvalidDateTime { .. })
        ));
        assert!(matches!(
            ParsedKey::parse("repo1/2019/02/29/20-09-02-seg.gz"),
            Err(ParseError::InvalidDateTime { .. })
        ));
        assert!(matches!(
            ParsedKey::parse("repo1/2020/03/06/25-09-02-seg.gz"),
            Err(ParseError::InvalidDateTime { .. })
        ));
    }

    #[test]
    fn reject_empty_segment_id() {
        assert!(matches!(
            ParsedKey::parse("repo1/2020/03/06/20-09-02-.gz"),
            Err(ParseError::EmptySegmentId { .. })
        ));
    }
}
