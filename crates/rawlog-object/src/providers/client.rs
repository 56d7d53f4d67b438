//! Provider trait for creating authenticated client connections.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::types::Error;

/// Factory for an authenticated connection to an object-storage service.
///
/// Implementations translate strongly-typed credentials into a ready
/// [`ObjectStoreClient`](crate::ObjectStoreClient).
pub trait Client: Sized + Send + 'static {
    /// Strongly-typed credentials for this provider.
    type Credentials: DeserializeOwned + Send + Sync;

    /// Unique identifier (e.g. "s3").
    const ID: &'static str;

    /// Create a connected client instance.
    fn connect(creds: &Self::Credentials) -> impl Future<Output = Result<Self, Error>> + Send;
}
