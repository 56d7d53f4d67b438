//! Listing descriptor for a single stored object.

use object_store::ObjectMeta;

/// One object yielded by [`ObjectStoreClient::list_stream`].
///
/// The key is kept exactly as the store listed it; it may not be a valid
/// [`object_store::path::Path`].
///
/// [`ObjectStoreClient::list_stream`]: crate::ObjectStoreClient::list_stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Raw object key inside the bucket.
    pub key: String,
    /// Entity tag reported by the store, if any.
    pub etag: Option<String>,
    /// Stored (compressed) size in bytes.
    pub size: u64,
}

impl ObjectEntry {
    /// Creates an entry for `key` with no entity tag.
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            etag: None,
            size,
        }
    }

    /// Returns the object key as a string slice.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the entity tag, or `"-"` when the store did not report one.
    pub fn etag_or_dash(&self) -> &str {
        self.etag.as_deref().unwrap_or("-")
    }
}

impl From<ObjectMeta> for ObjectEntry {
    fn from(meta: ObjectMeta) -> Self {
        Self {
            key: meta.location.to_string(),
            etag: meta.e_tag,
            size: meta.size,
        }
    }
}
