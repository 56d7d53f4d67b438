//! Raw key listing for S3 through `ListObjectsV2`.
//!
//! `object_store` converts every listed key into a [`Path`] and fails the
//! whole page (and the rest of the listing) on the first key it cannot
//! represent. This lister keeps the keys as plain strings instead.
//!
//! [`Path`]: object_store::path::Path

use aws_sdk_s3::Client as SdkClient;
use aws_sdk_s3::config::{BehaviorVersion, Builder as SdkConfigBuilder, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error;
use aws_sdk_s3::types::Object;
use futures::TryStreamExt;
use futures::stream::{self, BoxStream};

use super::S3Credentials;
use crate::TRACING_TARGET_CLIENT;
use crate::client::KeyLister;
use crate::types::{Error, ErrorKind, ObjectEntry, Result};

/// Label used in listing errors.
const LABEL: &str = "s3-list";

/// Lists keys with the AWS SDK, one `ListObjectsV2` page at a time.
#[derive(Debug, Clone)]
pub struct S3KeyLister {
    client: SdkClient,
    bucket: String,
}

impl S3KeyLister {
    /// Builds an SDK client from the same settings as the object store.
    pub fn new(creds: &S3Credentials) -> Self {
        let credentials = Credentials::new(
            &creds.access_key_id,
            &creds.secret_access_key,
            None,
            None,
            "rawlog",
        );

        let mut config = SdkConfigBuilder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(creds.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(creds.force_path_style);

        if let Some(endpoint) = &creds.endpoint {
            config = config.endpoint_url(endpoint);
        }

        Self {
            client: SdkClient::from_conf(config.build()),
            bucket: creds.bucket.clone(),
        }
    }

    /// Requests one page; returns its entries and the next continuation token.
    async fn list_page(
        &self,
        prefix: &str,
        token: Option<String>,
    ) -> Result<(Vec<Result<ObjectEntry>>, Option<String>)> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .set_continuation_token(token)
            .send()
            .await
            .map_err(list_error)?;

        let next = match output.next_continuation_token() {
            Some(token) if output.is_truncated().unwrap_or(false) => Some(token.to_owned()),
            _ => None,
        };

        let entries: Vec<Result<ObjectEntry>> = output
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(entry_from_object)
            .map(Ok)
            .collect();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            keys = entries.len(),
            more = next.is_some(),
            "listed page"
        );

        Ok((entries, next))
    }
}

impl KeyLister for S3KeyLister {
    fn list_keys(&self, prefix: &str) -> BoxStream<'static, Result<ObjectEntry>> {
        let lister = self.clone();
        let prefix = prefix.to_owned();

        // `Some(token)` is the next page to request, `None` ends the listing.
        let pages = stream::try_unfold(Some(None::<String>), move |state| {
            let lister = lister.clone();
            let prefix = prefix.clone();

            async move {
                let Some(token) = state else {
                    return Ok(None);
                };

                lister
                    .list_page(&prefix, token)
                    .await
                    .map(|(entries, next)| Some((stream::iter(entries), next.map(Some))))
            }
        });

        Box::pin(pages.try_flatten())
    }
}

/// Listed objects without a key carry nothing to process and are dropped.
fn entry_from_object(object: Object) -> Option<ObjectEntry> {
    Some(ObjectEntry {
        key: object.key?,
        etag: object.e_tag,
        size: object.size.and_then(|size| u64::try_from(size).ok()).unwrap_or(0),
    })
}

fn list_error(err: SdkError<ListObjectsV2Error>) -> Error {
    let kind = match err.code() {
        Some("NoSuchBucket") => ErrorKind::NotFound,
        Some("AccessDenied") => ErrorKind::PermissionDenied,
        Some("InvalidAccessKeyId" | "SignatureDoesNotMatch") => ErrorKind::Unauthenticated,
        _ => ErrorKind::Network,
    };
    let message = DisplayErrorContext(&err).to_string();
    Error::new(kind, LABEL, message).with_source(err)
}
