//! S3-compatible provider using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with AWS S3, MinIO, and any S3-compatible service. Fetches go
//! through `object_store`; keys are listed raw by [`S3KeyLister`].

use derive_more::Deref;
use object_store::aws::AmazonS3Builder;
use serde::{Deserialize, Serialize};

use super::{Client, S3KeyLister};
use crate::TRACING_TARGET_PROVIDER;
use crate::client::ObjectStoreClient;
use crate::types::Error;

/// Typed credentials for an S3-compatible provider.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// S3 bucket name.
    pub bucket: String,
    /// AWS region (defaults to `us-east-1`).
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint URL (e.g. `http://localhost:9000` for MinIO).
    /// Required for non-AWS S3-compatible services.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID for static credentials.
    pub access_key_id: String,
    /// Secret access key for static credentials.
    pub secret_access_key: String,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`.
    #[serde(default)]
    pub force_path_style: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl S3Credentials {
    fn builder(&self) -> AmazonS3Builder {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&self.bucket)
            .with_region(&self.region)
            .with_access_key_id(&self.access_key_id)
            .with_secret_access_key(&self.secret_access_key)
            .with_virtual_hosted_style_request(!self.force_path_style);

        if let Some(endpoint) = &self.endpoint {
            builder = builder.with_endpoint(endpoint);
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        builder
    }
}

/// S3-backed object storage client.
#[derive(Debug, Deref)]
pub struct S3Provider(ObjectStoreClient);

impl S3Provider {
    /// Unwraps the underlying client.
    pub fn into_inner(self) -> ObjectStoreClient {
        self.0
    }
}

impl Client for S3Provider {
    type Credentials = S3Credentials;

    const ID: &'static str = "s3";

    async fn connect(creds: &Self::Credentials) -> Result<Self, Error> {
        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            bucket = %creds.bucket,
            region = %creds.region,
            endpoint = ?creds.endpoint,
            force_path_style = creds.force_path_style,
            "building s3 client"
        );

        let store = creds
            .builder()
            .build()
            .map_err(|e| Error::configuration(Self::ID, e.to_string()).with_source(e))?;

        let client = ObjectStoreClient::new(store).with_lister(S3KeyLister::new(creds));
        Ok(Self(client))
    }
}
