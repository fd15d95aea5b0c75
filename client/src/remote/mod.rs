//! Remote quote store abstraction.
//!
//! The sync controller only ever fetches a full snapshot and publishes a full
//! replacement; there is no incremental protocol.
//!
//! # Implementations
//!
//! - [`StorageRemote`] - the mock server, a second key in local storage
//! - [`HttpRemote`] - `GET /quotes` / `PUT /quotes` against a real backend
//! - [`MockRemote`] - in-memory, with failure injection for tests

mod http;
mod mock;
mod storage;

pub use http::HttpRemote;
pub use mock::MockRemote;
pub use storage::StorageRemote;

use async_trait::async_trait;
use quotebook_engine::Collection;
use thiserror::Error;

/// Transport errors. All are recoverable: the cycle is abandoned and retried
/// on the next interval.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Fetching the remote snapshot failed.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// Publishing the collection failed.
    #[error("publish failed: {0}")]
    PublishFailed(String),

    /// The remote returned data that is not a quote collection.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// A remote holding the shared quote collection.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the current remote collection.
    async fn fetch(&self) -> Result<Collection, TransportError>;

    /// Replace the remote collection.
    async fn publish(&self, quotes: &Collection) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Box<T> {
    async fn fetch(&self) -> Result<Collection, TransportError> {
        (**self).fetch().await
    }

    async fn publish(&self, quotes: &Collection) -> Result<(), TransportError> {
        (**self).publish(quotes).await
    }
}
