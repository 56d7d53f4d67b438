//! Extraction configuration: what to restore and where to write it.

use std::path::PathBuf;

use anyhow::Context;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args};
use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use rawlog_archive::decode::DEFAULT_RAW_FIELD;
use rawlog_archive::{ExtractorConfig, TimeWindow};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Accepted layout for `START_DATE` and `END_DATE`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Selection of segments and output settings.
///
/// # Environment Variables
///
/// - `REPO_NAME` - Repository (origin) whose archive is restored
/// - `START_DATE` / `END_DATE` - Inclusive window, `YYYY-MM-DD HH:MM:SS` (UTC)
/// - `OUTPUT_DIR` - Destination directory (default: `raw`)
/// - `RAW_FIELD` - Record field holding the raw line (default: `@rawstring`)
/// - `DEBUG` - Report skipped and failed segments
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Name of the repository whose archive is restored.
    #[arg(long = "repo", env = "REPO_NAME")]
    pub repo_name: String,

    /// Earliest segment time, "YYYY-MM-DD HH:MM:SS" in 24h format (UTC).
    #[arg(long = "start", env = "START_DATE")]
    pub start_date: String,

    /// Latest segment time, "YYYY-MM-DD HH:MM:SS" in 24h format (UTC).
    #[arg(long = "end", env = "END_DATE")]
    pub end_date: String,

    /// Directory the `.raw` files are written to.
    #[arg(long, env = "OUTPUT_DIR", default_value = "raw")]
    pub output_dir: PathBuf,

    /// Record field holding the original log line.
    #[arg(long, env = "RAW_FIELD", default_value = DEFAULT_RAW_FIELD)]
    pub raw_field: String,

    /// Report skipped and failed segments and raise log verbosity.
    ///
    /// Any value other than an empty string, `0`, `false`, `no`, `off`, `n`
    /// or `f` turns it on.
    #[arg(
        long,
        env = "DEBUG",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = FalseyValueParser::new(),
    )]
    #[serde(default)]
    pub debug: bool,
}

impl ExtractConfig {
    /// Appends a message for every invalid setting to `errors`.
    pub fn validate(&self, errors: &mut Vec<String>) {
        if self.repo_name.is_empty() {
            errors.push("No repo name specified. Please specify one using REPO_NAME.".to_string());
        } else if self.repo_name.contains('/') {
            errors.push(format!(
                "REPO_NAME '{}' must be a single path segment.",
                self.repo_name
            ));
        }

        if self.raw_field.is_empty() {
            errors.push("RAW_FIELD must not be empty.".to_string());
        }

        let start = parse_date(&self.start_date);
        if start.is_err() {
            errors.push(
                "START_DATE in wrong format. Please use \"YYYY-MM-DD HH:MM:SS\" in 24h format."
                    .to_string(),
            );
        }

        let end = parse_date(&self.end_date);
        if end.is_err() {
            errors.push(
                "END_DATE in wrong format. Please use \"YYYY-MM-DD HH:MM:SS\" in 24h format."
                    .to_string(),
            );
        }

        if let (Ok(start), Ok(end)) = (start, end)
            && start > end
        {
            errors.push(format!("START_DATE {start} is after END_DATE {end}."));
        }
    }

    /// Inclusive window built from the start and end dates.
    pub fn window(&self) -> anyhow::Result<TimeWindow> {
        let start = parse_date(&self.start_date).context("invalid START_DATE")?;
        let end = parse_date(&self.end_date).context("invalid END_DATE")?;
        Ok(TimeWindow::new(start, end)?)
    }

    /// Configuration handed to the extractor.
    pub fn extractor_config(&self) -> anyhow::Result<ExtractorConfig> {
        Ok(
            ExtractorConfig::new(&self.repo_name, self.window()?, &self.output_dir)
                .with_raw_field(&self.raw_field)
                .with_verbose(self.debug),
        )
    }

    /// Logs the selection.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            repo = %self.repo_name,
            start = %self.start_date,
            end = %self.end_date,
            output_dir = %self.output_dir.display(),
            raw_field = %self.raw_field,
            debug = self.debug,
            "Extraction configuration"
        );
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS` as a UTC instant.
pub fn parse_date(value: &str) -> Result<Timestamp, jiff::Error> {
    let datetime = DateTime::strptime(DATE_FORMAT, value.trim())?;
    Ok(datetime.to_zoned(TimeZone::UTC)?.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractConfig {
        ExtractConfig {
            repo_name: "repo1".to_string(),
            start_date: "2020-03-06 00:00:00".to_string(),
            end_date: "2020-03-06 23:59:59".to_string(),
            output_dir: PathBuf::from("raw"),
            raw_field: DEFAULT_RAW_FIELD.to_string(),
            debug: false,
        }
    }

    fn errors(config: &ExtractConfig) -> Vec<String> {
        let mut errors = Vec::new();
        config.validate(&mut errors);
        errors
    }

    #[test]
    fn parse_date_as_utc() {
        let ts = parse_date("2020-03-06 20:09:02").unwrap();
        assert_eq!(ts.as_second(), 1583525342);
    }

    #[test]
    fn reject_wrong_date_format() {
        assert!(parse_date("2020/03/06 20:09:02").is_err());
        assert!(parse_date("2020-03-06").is_err());
        assert!(parse_date("2020-03-06 25:00:00").is_err());
    }

    #[test]
    fn valid_config() {
        assert!(errors(&config()).is_empty());

        let extractor = config().extractor_config().unwrap();
        assert_eq!(extractor.origin, "repo1");
        assert_eq!(extractor.prefix(), "repo1/");
        assert_eq!(extractor.raw_field, DEFAULT_RAW_FIELD);
        assert!(!extractor.verbose);
    }

    #[test]
    fn collects_every_problem() {
        let mut config = config();
        config.repo_name = String::new();
        config.start_date = "yesterday".to_string();
        config.end_date = "today".to_string();

        let errors = errors(&config);
        assert_eq!(errors.len(), 3);
        assert!(errors[1].starts_with("START_DATE"));
        assert!(errors[2].starts_with("END_DATE"));
    }

    #[test]
    fn reject_reversed_dates() {
        let mut config = config();
        config.start_date = "2020-03-07 00:00:00".to_string();
        assert_eq!(errors(&config).len(), 1);
        assert!(config.window().is_err());
    }

    #[test]
    fn reject_nested_repo() {
        let mut config = config();
        config.repo_name = "repo1/type".to_string();
        assert_eq!(errors(&config).len(), 1);
    }
}
