//! Result type for [`ObjectStoreClient::fetch`](super::ObjectStoreClient::fetch).

use bytes::Bytes;

use crate::types::ObjectEntry;

/// Result of a successful [`ObjectStoreClient::fetch`](super::ObjectStoreClient::fetch) call.
#[derive(Debug)]
pub struct GetOutput {
    /// Raw bytes of the retrieved object, fully buffered.
    pub data: Bytes,
    /// Metadata of the object as returned with the body.
    pub entry: ObjectEntry,
}
