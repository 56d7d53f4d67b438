//! Sequential extraction over an origin's listing.
//!
//! For each listed object the [`Extractor`] parses the key, applies the
//! origin and window filters, and only then fetches, gunzips and decodes the
//! body. Every per-object problem ends up as an [`ObjectOutcome`]; only a
//! failing listing (or an unusable output directory) ends the run early.
//!
//! Objects are handled one at a time. A body and its decompressed bytes are
//! held in memory in full, so peak memory follows the largest single object.

mod outcome;

use std::path::PathBuf;

use futures::StreamExt;
use rawlog_object::{ObjectEntry, ObjectStoreClient};

pub use self::outcome::{ObjectOutcome, RunSummary, SkipReason};
use crate::decode::{self, DEFAULT_RAW_FIELD};
use crate::error::{Error, ObjectError, Result};
use crate::filter::TimeWindow;
use crate::key::ParsedKey;
use crate::output::{OutputWriter, WrittenFile};
use crate::{TRACING_TARGET_FETCH, TRACING_TARGET_PIPELINE};

/// What to extract and where to put it.
#[derive(Debug, Clone)]
#[must_use = "config does nothing unless you use it"]
pub struct ExtractorConfig {
    /// Origin whose segments are wanted; also the listing prefix.
    pub origin: String,
    /// Inclusive window on the segment timestamp.
    pub window: TimeWindow,
    /// Directory receiving the `.raw` files.
    pub output_dir: PathBuf,
    /// Record field holding the raw log line.
    pub raw_field: String,
    /// Report skipped and failed objects.
    pub verbose: bool,
}

impl ExtractorConfig {
    pub fn new(origin: impl Into<String>, window: TimeWindow, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            origin: origin.into(),
            window,
            output_dir: output_dir.into(),
            raw_field: DEFAULT_RAW_FIELD.to_string(),
            verbose: false,
        }
    }

    pub fn with_raw_field(mut self, raw_field: impl Into<String>) -> Self {
        self.raw_field = raw_field.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Store-side listing prefix, `"<origin>/"`.
    pub fn prefix(&self) -> String {
        format!("{}/", self.origin)
    }
}

/// Drives one extraction pass.
#[derive(Debug, Clone)]
pub struct Extractor {
    client: ObjectStoreClient,
    config: ExtractorConfig,
    writer: OutputWriter,
}

impl Extractor {
    pub fn new(client: ObjectStoreClient, config: ExtractorConfig) -> Self {
        let writer = OutputWriter::new(config.output_dir.clone());
        Self {
            client,
            config,
            writer,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Processes every object under the origin prefix, in listing order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be created or
    /// the listing itself fails. Per-object failures are counted in the
    /// returned [`RunSummary`].
    pub async fn run(&self) -> Result<RunSummary> {
        self.writer.ensure_dir().await?;

        let prefix = self.config.prefix();
        tracing::debug!(
            target: TRACING_TARGET_PIPELINE,
            prefix = %prefix,
            output_dir = %self.writer.dir().display(),
            "starting extraction"
        );

        let mut summary = RunSummary::default();
        let mut listing = self.client.list_stream(&prefix);

        while let Some(entry) = listing.next().await {
            let entry = entry.map_err(Error::Listing)?;
            let outcome = self.process(&entry).await;
            self.report(&entry, &outcome);
            summary.record(&outcome);
        }

        tracing::debug!(
            target: TRACING_TARGET_PIPELINE,
            listed = summary.listed,
            extracted = summary.extracted,
            skipped = summary.skipped,
            failed = summary.failed,
            records = summary.records,
            "extraction finished"
        );

        Ok(summary)
    }

    /// Parses, filters and, when eligible, extracts a single object.
    ///
    /// Never fails: every error is returned as [`ObjectOutcome::Failed`].
    pub async fn process(&self, entry: &ObjectEntry) -> ObjectOutcome {
        let key = match ParsedKey::parse(entry.key()) {
            Ok(key) => key,
            Err(error) => return ObjectOutcome::Failed(error.into()),
        };

        if let Some(reason) = self.skip_reason(&key) {
            return ObjectOutcome::Skipped(reason);
        }

        match self.extract(entry, &key).await {
            Ok(file) => ObjectOutcome::Extracted(file),
            Err(error) => ObjectOutcome::Failed(error),
        }
    }

    fn skip_reason(&self, key: &ParsedKey) -> Option<SkipReason> {
        if !key.in_origin(&self.config.origin) {
            return Some(SkipReason::OriginMismatch {
                origin: key.origin().to_string(),
            });
        }

        if !self.config.window.contains(key) {
            return Some(SkipReason::OutsideWindow {
                timestamp: key.timestamp(),
            });
        }

        None
    }

    async fn extract(
        &self,
        entry: &ObjectEntry,
        key: &ParsedKey,
    ) -> Result<WrittenFile, ObjectError> {
        tracing::info!(
            target: TRACING_TARGET_FETCH,
            timestamp = %key.timestamp(),
            key = entry.key(),
            etag = entry.etag_or_dash(),
            "fetching"
        );

        let body = self.client.fetch(entry.key()).await?;
        let decompressed = decode::gunzip(&body.data)?;
        drop(body);

        // Decode everything first so a bad record never leaves a file behind.
        let lines = decode::extract_field(&decompressed, &self.config.raw_field)?;
        drop(decompressed);

        Ok(self.writer.write(key, &lines).await?)
    }

    fn report(&self, entry: &ObjectEntry, outcome: &ObjectOutcome) {
        match outcome {
            ObjectOutcome::Extracted(file) => {
                tracing::debug!(
                    target: TRACING_TARGET_PIPELINE,
                    key = entry.key(),
                    path = %file.path.display(),
                    lines = file.lines,
                    bytes = file.bytes,
                    "extracted"
                );
            }
            ObjectOutcome::Skipped(reason) if self.config.verbose => {
                tracing::info!(
                    target: TRACING_TARGET_PIPELINE,
                    key = entry.key(),
                    reason = %reason,
                    "skipped"
                );
            }
            ObjectOutcome::Failed(error) if self.config.verbose => {
                tracing::warn!(
                    target: TRACING_TARGET_PIPELINE,
                    key = entry.key(),
                    etag = entry.etag_or_dash(),
                    stage = error.stage(),
                    error = %error,
                    "failed"
                );
            }
            ObjectOutcome::Skipped(_) | ObjectOutcome::Failed(_) => {}
        }
    }
}
