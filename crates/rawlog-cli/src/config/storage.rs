//! Object storage configuration.

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args};
use rawlog_object::providers::S3Credentials;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Region used when only a custom endpoint is configured.
const FALLBACK_REGION: &str = "us-east-1";

/// Connection settings for the S3-compatible bucket holding the archive.
///
/// # Environment Variables
///
/// - `S3_BUCKET_NAME` - Bucket holding the archived segments
/// - `S3_REGION` - Bucket region (required unless `S3_ENDPOINT` is set)
/// - `S3_ENDPOINT` - Custom endpoint for S3-compatible services
/// - `S3_ACCESS_KEY_ID` / `S3_SECRET_ACCESS_KEY` - Static credentials
/// - `S3_FORCE_PATH_STYLE` - Use path-style bucket addressing
#[derive(Clone, Args, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Name of the S3 bucket.
    #[arg(long = "bucket", env = "S3_BUCKET_NAME")]
    pub bucket_name: String,

    /// Region the bucket lives in.
    #[arg(long, env = "S3_REGION")]
    pub region: Option<String>,

    /// Endpoint URL for S3-compatible services (e.g. `http://localhost:9000`).
    #[arg(long, env = "S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Access key id used to sign requests.
    #[arg(long, env = "S3_ACCESS_KEY_ID")]
    pub access_key_id: String,

    /// Secret access key used to sign requests.
    #[arg(long, env = "S3_SECRET_ACCESS_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub secret_access_key: String,

    /// Address the bucket as `endpoint/bucket` rather than `bucket.endpoint`.
    #[arg(
        long,
        env = "S3_FORCE_PATH_STYLE",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = FalseyValueParser::new(),
    )]
    #[serde(default)]
    pub force_path_style: bool,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl StorageConfig {
    /// Appends a message for every invalid setting to `errors`.
    pub fn validate(&self, errors: &mut Vec<String>) {
        if self.bucket_name.trim().is_empty() {
            errors.push("No s3 bucket name specified. Please specify one using S3_BUCKET_NAME.".to_string());
        }

        if self.region.is_none() && self.endpoint.is_none() {
            errors.push("No s3 region specified. Please specify one using S3_REGION.".to_string());
        }

        if let Some(endpoint) = &self.endpoint
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            errors.push(format!(
                "S3_ENDPOINT '{endpoint}' must start with http:// or https://."
            ));
        }
    }

    /// Credentials for [`rawlog_object::providers::S3Provider`].
    pub fn credentials(&self) -> S3Credentials {
        S3Credentials {
            bucket: self.bucket_name.clone(),
            region: self
                .region
                .clone()
                .unwrap_or_else(|| FALLBACK_REGION.to_string()),
            endpoint: self.endpoint.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            force_path_style: self.force_path_style,
        }
    }

    /// Logs storage configuration (no secrets).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            bucket = %self.bucket_name,
            region = ?self.region,
            endpoint = ?self.endpoint,
            force_path_style = self.force_path_style,
            "Storage configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StorageConfig {
        StorageConfig {
            bucket_name: "archive".to_string(),
            region: Some("eu-west-1".to_string()),
            endpoint: None,
            access_key_id: "AKIA".to_string(),
            secret_access_key: "secret".to_string(),
            force_path_style: false,
        }
    }

    fn errors(config: &StorageConfig) -> Vec<String> {
        let mut errors = Vec::new();
        config.validate(&mut errors);
        errors
    }

    #[test]
    fn valid_with_region() {
        assert!(errors(&config()).is_empty());
    }

    #[test]
    fn endpoint_replaces_region() {
        let mut config = config();
        config.region = None;
        config.endpoint = Some("http://localhost:9000".to_string());
        assert!(errors(&config).is_empty());
        assert_eq!(config.credentials().region, FALLBACK_REGION);
    }

    #[test]
    fn reject_missing_region_and_endpoint() {
        let mut config = config();
        config.region = None;
        let errors = errors(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("S3_REGION"));
    }

    #[test]
    fn reject_endpoint_without_scheme() {
        let mut config = config();
        config.endpoint = Some("localhost:9000".to_string());
        assert_eq!(errors(&config).len(), 1);
    }

    #[test]
    fn debug_hides_secret() {
        assert!(!format!("{:?}", config()).contains("\"secret\""));
    }
}
