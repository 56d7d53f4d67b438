//! Error types for archive extraction.

use std::io;
use std::path::PathBuf;

use jiff::Timestamp;
use strum::IntoStaticStr;

/// Result type for run-level operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that end an extraction run.
///
/// Everything that can go wrong with a single object is an [`ObjectError`]
/// instead and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The listing stream itself failed, so the remaining keys are unknown.
    #[error("listing failed: {0}")]
    Listing(#[source] rawlog_object::Error),

    /// The output directory could not be created.
    #[error("cannot create output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The window bounds are reversed.
    #[error("window start {start} is after window end {end}")]
    InvalidWindow { start: Timestamp, end: Timestamp },
}

/// An object key that does not follow the segment key layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The key is empty.
    #[error("key has no origin segment")]
    MissingOrigin,

    /// Fewer than four segments follow the origin and tag pairs.
    #[error("expected year/month/day/stem after tags, found {found} segment(s)")]
    TooFewSegments { found: usize },

    /// A date segment is not the expected number of ASCII digits.
    #[error("{component} '{value}' is not a {width}-digit number")]
    InvalidDateComponent {
        component: &'static str,
        value: String,
        width: usize,
    },

    /// The file stem does not split into hour, minute, second and segment id.
    #[error("stem '{stem}' is not '<HH>-<MM>-<SS>-<segment>'")]
    MalformedStem { stem: String },

    /// A time component of the stem is not numeric.
    #[error("{component} '{value}' is not numeric")]
    InvalidTimeComponent {
        component: &'static str,
        value: String,
    },

    /// The components are numeric but do not form a valid date and time.
    #[error("invalid date or time: {reason}")]
    InvalidDateTime { reason: String },

    /// Nothing is left for the segment id once the extension is removed.
    #[error("stem '{stem}' has an empty segment id")]
    EmptySegmentId { stem: String },
}

/// A segment body that cannot be turned into raw lines.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body is not a valid gzip stream.
    #[error("gzip decompression failed: {0}")]
    Decompress(#[source] io::Error),

    /// A line is not a JSON object.
    #[error("line {line}: malformed record: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record lacks the designated field.
    #[error("line {line}: record has no '{field}' field")]
    MissingField { line: usize, field: String },

    /// The designated field holds something other than a string.
    #[error("line {line}: field '{field}' is not a string")]
    NonStringField { line: usize, field: String },
}

/// The output file for an object could not be written.
#[derive(Debug, thiserror::Error)]
#[error("cannot write '{}': {source}", path.display())]
pub struct WriteError {
    /// Destination that failed.
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failure of a single object, tagged with the step that failed.
#[derive(Debug, thiserror::Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ObjectError {
    #[error("invalid key: {0}")]
    Parse(#[from] ParseError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] rawlog_object::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl ObjectError {
    /// Name of the step that failed (`parse`, `fetch`, `decode` or `write`).
    pub fn stage(&self) -> &'static str {
        self.into()
    }

    /// Whether the body was requested from the store before failing.
    pub fn fetch_attempted(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_error_stage_names() {
        let err = ObjectError::from(ParseError::MissingOrigin);
        assert_eq!(err.stage(), "parse");
        assert!(!err.fetch_attempted());

        let err = ObjectError::from(DecodeError::MissingField {
            line: 3,
            field: "@rawstring".to_string(),
        });
        assert_eq!(err.stage(), "decode");
        assert!(err.fetch_attempted());
        assert_eq!(err.to_string(), "line 3: record has no '@rawstring' field");
    }

    #[test]
    fn parse_error_messages() {
        let err = ParseError::InvalidDateComponent {
            component: "year",
            value: "20AB".to_string(),
            width: 4,
        };
        assert_eq!(err.to_string(), "year '20AB' is not a 4-digit number");
    }
}
