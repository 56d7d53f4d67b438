#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the extraction loop: outcomes and run totals.
pub const TRACING_TARGET_PIPELINE: &str = "rawlog_archive::pipeline";

/// Tracing target for object fetches.
pub const TRACING_TARGET_FETCH: &str = "rawlog_archive::fetch";

/// Tracing target for output file handling.
pub const TRACING_TARGET_OUTPUT: &str = "rawlog_archive::output";

pub mod decode;
mod error;
mod filter;
mod key;
mod output;
pub mod pipeline;

pub use error::{DecodeError, Error, ObjectError, ParseError, Result, WriteError};
pub use filter::TimeWindow;
pub use key::{ParsedKey, Tags};
pub use output::{OutputWriter, RAW_EXTENSION, WrittenFile};
pub use pipeline::{Extractor, ExtractorConfig, ObjectOutcome, RunSummary, SkipReason};
