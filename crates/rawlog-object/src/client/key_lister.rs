//! Key listing seam.
//!
//! A [`KeyLister`] yields one [`ObjectEntry`] per stored key, keeping the key
//! as the raw string the store reported. Keys that [`Path`] cannot represent
//! (empty segments, `.`/`..`, control characters) are still listed, so the
//! caller decides what to do with them one by one.

use std::fmt;
use std::sync::Arc;

use futures::TryStreamExt;
use futures::stream::BoxStream;
use object_store::ObjectStore;
use object_store::path::Path;

use crate::types::{Error, ObjectEntry, Result};

/// Lazily enumerates the keys stored under a prefix.
///
/// Item errors mean the listing itself failed and cannot be resumed.
pub trait KeyLister: fmt::Debug + Send + Sync {
    /// Streams every key under `prefix`; an empty prefix lists everything.
    fn list_keys(&self, prefix: &str) -> BoxStream<'static, Result<ObjectEntry>>;
}

/// Lists through [`ObjectStore::list`].
///
/// Used for stores whose keys are always valid [`Path`]s, such as the
/// in-memory and local-file backends.
#[derive(Debug, Clone)]
pub struct StoreLister(Arc<dyn ObjectStore>);

impl StoreLister {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self(store)
    }
}

impl KeyLister for StoreLister {
    fn list_keys(&self, prefix: &str) -> BoxStream<'static, Result<ObjectEntry>> {
        let prefix = (!prefix.is_empty()).then(|| Path::from(prefix));

        Box::pin(
            self.0
                .list(prefix.as_ref())
                .map_ok(ObjectEntry::from)
                .map_err(Error::from),
        )
    }
}
