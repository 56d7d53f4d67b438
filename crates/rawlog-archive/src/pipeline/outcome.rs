//! Per-object outcomes and the run summary built from them.

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;

use crate::error::ObjectError;
use crate::output::WrittenFile;

/// Why a well-formed key was not fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The key belongs to another origin.
    OriginMismatch { origin: String },
    /// The key's timestamp is outside the window.
    OutsideWindow { timestamp: Timestamp },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OriginMismatch { origin } => write!(f, "origin '{origin}' does not match"),
            Self::OutsideWindow { timestamp } => write!(f, "{timestamp} is outside the window"),
        }
    }
}

/// Result of processing one listed object.
#[derive(Debug)]
pub enum ObjectOutcome {
    /// Raw lines were written to a file.
    Extracted(WrittenFile),
    /// The key was valid but filtered out; nothing was fetched.
    Skipped(SkipReason),
    /// Some step failed; the run moves on to the next object.
    Failed(ObjectError),
}

impl ObjectOutcome {
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Objects returned by the listing.
    pub listed: u64,
    /// Objects whose body was requested from the store.
    pub fetched: u64,
    /// Objects written to an output file.
    pub extracted: u64,
    /// Objects filtered out by origin or window.
    pub skipped: u64,
    /// Objects that failed at any step.
    pub failed: u64,
    /// Raw lines written across all files.
    pub records: u64,
}

impl RunSummary {
    /// Folds one outcome into the counters.
    pub fn record(&mut self, outcome: &ObjectOutcome) {
        self.listed += 1;
        match outcome {
            ObjectOutcome::Extracted(file) => {
                self.fetched += 1;
                self.extracted += 1;
                self.records += file.lines as u64;
            }
            ObjectOutcome::Skipped(_) => self.skipped += 1,
            ObjectOutcome::Failed(error) => {
                if error.fetch_attempted() {
                    self.fetched += 1;
                }
                self.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::{DecodeError, ParseError};

    #[test]
    fn summary_counts_outcomes() {
        let mut summary = RunSummary::default();
        summary.record(&ObjectOutcome::Extracted(WrittenFile {
            path: PathBuf::from("raw/a.raw"),
            lines: 3,
            bytes: 30,
        }));
        summary.record(&ObjectOutcome::Skipped(SkipReason::OriginMismatch {
            origin: "other".to_string(),
        }));
        summary.record(&ObjectOutcome::Failed(ParseError::MissingOrigin.into()));
        summary.record(&ObjectOutcome::Failed(
            DecodeError::MissingField {
                line: 1,
                field: "@rawstring".to_string(),
            }
            .into(),
        ));

        assert_eq!(
            summary,
            RunSummary {
                listed: 4,
                fetched: 2,
                extracted: 1,
                skipped: 1,
                failed: 2,
                records: 3,
            }
        );
    }

    #[test]
    fn skip_reason_display() {
        let reason = SkipReason::OutsideWindow {
            timestamp: "2020-03-06T20:09:02Z".parse().unwrap(),
        };
        assert_eq!(reason.to_string(), "2020-03-06T20:09:02Z is outside the window");
    }
}
