#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::path::Path;
use std::process;

use anyhow::Context;
use rawlog_archive::{Extractor, RunSummary};
use rawlog_object::ObjectStoreClient;
use rawlog_object::providers::{Client, S3Provider};

use crate::config::{Cli, StorageConfig};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "rawlog_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "rawlog_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "rawlog_cli::config";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.extract.debug)?;
    cli.log();
    cli.validate()?;

    let config = cli.extract.extractor_config()?;
    let client = connect(&cli.storage).await?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        bucket = %cli.storage.bucket_name,
        repo = %config.origin,
        start = %config.window.start(),
        end = %config.window.end(),
        "starting extraction"
    );

    let output_dir = config.output_dir.clone();
    let summary = Extractor::new(client, config)
        .run()
        .await
        .context("extraction aborted")?;

    log_summary(&summary, &output_dir);
    Ok(())
}

/// Builds the S3 client and checks that the bucket answers.
async fn connect(storage: &StorageConfig) -> anyhow::Result<ObjectStoreClient> {
    let provider = S3Provider::connect(&storage.credentials())
        .await
        .context("failed to create s3 client")?;

    let client = provider.into_inner();
    client
        .verify_reachable()
        .await
        .with_context(|| format!("bucket '{}' is not reachable", storage.bucket_name))?;

    Ok(client)
}

/// Logs the totals of a finished run.
fn log_summary(summary: &RunSummary, output_dir: &Path) {
    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        output_dir = %output_dir.display(),
        listed = summary.listed,
        fetched = summary.fetched,
        extracted = summary.extracted,
        skipped = summary.skipped,
        failed = summary.failed,
        records = summary.records,
        "run summary"
    );

    if summary.failed > 0 {
        tracing::warn!(
            target: TRACING_TARGET_SHUTDOWN,
            failed = summary.failed,
            "some segments could not be restored; rerun with --debug for details"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn summary_names_output_dir() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let summary = RunSummary {
            listed: 3,
            extracted: 1,
            ..RunSummary::default()
        };
        tracing::subscriber::with_default(subscriber, || {
            log_summary(&summary, Path::new("out/raw"));
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("output_dir=out/raw"));
        assert!(output.contains("listed=3"));
    }
}
