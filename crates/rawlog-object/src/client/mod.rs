//! Object-store client backed by [`object_store::ObjectStore`].
//!
//! [`ObjectStoreClient`] is a thin, cloneable wrapper around
//! `Arc<dyn ObjectStore>` plus the [`KeyLister`] used to enumerate keys.
//! Listing is lazy and paged by the backend; fetches buffer the whole body.
//! Every public method is instrumented with [`tracing`].

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};

use crate::TRACING_TARGET_CLIENT;
use crate::types::{ObjectEntry, Result};

mod get_output;
mod key_lister;

pub use get_output::GetOutput;
pub use key_lister::{KeyLister, StoreLister};

/// Cloneable handle to any [`ObjectStore`] backend.
#[derive(Clone, Debug)]
pub struct ObjectStoreClient {
    store: Arc<dyn ObjectStore>,
    lister: Arc<dyn KeyLister>,
}

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation.
    ///
    /// Keys are listed through the store itself ([`StoreLister`]).
    pub fn new(store: impl ObjectStore) -> Self {
        let store: Arc<dyn ObjectStore> = Arc::new(store);
        Self {
            lister: Arc::new(StoreLister::new(store.clone())),
            store,
        }
    }

    /// Replaces the lister used by [`list_stream`](Self::list_stream).
    pub fn with_lister(mut self, lister: impl KeyLister + 'static) -> Self {
        self.lister = Arc::new(lister);
        self
    }

    /// Verify that the backing store is reachable.
    ///
    /// Issues a HEAD for a sentinel key. A not-found response is treated as
    /// success (the bucket exists), any other error is propagated.
    #[tracing::instrument(name = "object.verify", skip(self))]
    pub async fn verify_reachable(&self) -> Result<()> {
        let path = Path::from("_rawlog_verify");
        match self.store.head(&path).await {
            Ok(_) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Lazily stream the objects stored under `prefix`.
    ///
    /// The prefix is matched on whole path segments, so `"repo1/"` does not
    /// match keys under `"repo10/"`. An empty prefix lists the whole bucket.
    #[tracing::instrument(name = "object.list_stream", skip(self), fields(prefix))]
    pub fn list_stream(&self, prefix: &str) -> BoxStream<'static, Result<ObjectEntry>> {
        self.lister.list_keys(prefix)
    }

    /// Retrieve the full body stored at `key`.
    ///
    /// Fails with [`ErrorKind::Configuration`](crate::ErrorKind::Configuration)
    /// when the key is not a valid object path.
    #[tracing::instrument(name = "object.fetch", skip(self))]
    pub async fn fetch(&self, key: &str) -> Result<GetOutput> {
        let location = Path::parse(key).map_err(object_store::Error::from)?;
        let result = self.store.get(&location).await?;
        let entry = ObjectEntry::from(result.meta.clone());
        let data = result.bytes().await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            key = %location,
            size = data.len(),
            "fetched object body"
        );

        Ok(GetOutput { data, entry })
    }

    /// Upload `data` to `key`, overwriting any existing object.
    #[tracing::instrument(name = "object.put", skip(self, data), fields(key, size = data.len()))]
    pub async fn put(&self, key: &str, data: Bytes) -> Result<Option<String>> {
        let path = Path::from(key);
        let result = self.store.put(&path, PutPayload::from(data)).await?;
        Ok(result.e_tag)
    }
}
