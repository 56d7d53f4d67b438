//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── storage: StorageConfig   # Bucket, region/endpoint, credentials
//! └── extract: ExtractConfig   # Repository, window, output, verbosity
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! rawlog --bucket archive --region eu-west-1 --repo humio \
//!     --start "2019-09-17 00:00:00" --end "2019-09-17 23:59:59"
//!
//! # Or via environment variables
//! S3_BUCKET_NAME=archive S3_REGION=eu-west-1 REPO_NAME=humio ... rawlog
//! ```

mod extract;
mod storage;

use std::process;

use clap::Parser;
pub use extract::ExtractConfig;
use serde::{Deserialize, Serialize};
pub use storage::StorageConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Every configuration problem found before the run starts.
#[derive(Debug, thiserror::Error)]
#[error("invalid configuration:\n  {}", .0.join("\n  "))]
pub struct ConfigError(pub Vec<String>);

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "rawlog")]
#[command(about = "Restore raw log files from archived log segments")]
#[command(version)]
pub struct Cli {
    /// Object storage connection.
    #[clap(flatten)]
    pub storage: StorageConfig,

    /// Segment selection and output.
    #[clap(flatten)]
    pub extract: ExtractConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so its values act
    /// as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        self.storage.validate(&mut errors);
        self.extract.validate(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError(errors))
        }
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.storage.log();
        self.extract.log();

        tracing::debug!(target: TRACING_TARGET_CONFIG, "configuration loaded");
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
