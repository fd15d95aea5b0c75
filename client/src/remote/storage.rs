//! The mock server: a remote collection kept in local storage.

use super::{RemoteStore, TransportError};
use crate::storage::{keys, KeyValueStore};
use async_trait::async_trait;
use quotebook_engine::Collection;
use std::time::Duration;

/// Remote backed by the `serverQuotes` key of a [`KeyValueStore`].
///
/// Every call waits `latency` first to behave like a network round trip.
/// A key that was never written reads as an empty collection.
#[derive(Debug, Clone)]
pub struct StorageRemote<S> {
    store: S,
    latency: Duration,
}

impl<S: KeyValueStore> StorageRemote<S> {
    pub fn new(store: S, latency: Duration) -> Self {
        Self { store, latency }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> RemoteStore for StorageRemote<S> {
    async fn fetch(&self) -> Result<Collection, TransportError> {
        self.simulate_latency().await;

        let stored = self
            .store
            .get(keys::SERVER_QUOTES)
            .map_err(|e| TransportError::FetchFailed(e.to_string()))?;

        match stored {
            Some(json) => Collection::from_json(&json)
                .map_err(|e| TransportError::InvalidPayload(e.to_string())),
            None => Ok(Collection::new()),
        }
    }

    async fn publish(&self, quotes: &Collection) -> Result<(), TransportError> {
        self.simulate_latency().await;

        let json = quotes
            .to_json()
            .map_err(|e| TransportError::InvalidPayload(e.to_string()))?;

        self.store
            .set(keys::SERVER_QUOTES, &json)
            .map_err(|e| TransportError::PublishFailed(e.to_string()))?;

        tracing::debug!(count = quotes.len(), "Published quotes to storage remote");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use quotebook_engine::Quote;
    use std::sync::Arc;

    #[tokio::test]
    async fn missing_key_is_empty_collection() {
        let remote = StorageRemote::new(MemoryStore::new(), Duration::ZERO);
        assert!(remote.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn publish_then_fetch() {
        let store = MemoryStore::new_shared();
        let remote = StorageRemote::new(Arc::clone(&store), Duration::ZERO);

        let quotes: Collection = vec![Quote::new("T1", "work")].into();
        remote.publish(&quotes).await.unwrap();

        assert_eq!(remote.fetch().await.unwrap(), quotes);
        assert_eq!(
            store.get(keys::SERVER_QUOTES).unwrap().as_deref(),
            Some(r#"[{"text":"T1","category":"work"}]"#)
        );
    }

    #[tokio::test]
    async fn garbage_in_storage_is_invalid_payload() {
        let store = MemoryStore::new();
        store.set(keys::SERVER_QUOTES, "{}").unwrap();
        let remote = StorageRemote::new(store, Duration::ZERO);

        assert!(matches!(
            remote.fetch().await,
            Err(TransportError::InvalidPayload(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied() {
        let remote = StorageRemote::new(MemoryStore::new(), Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        remote.fetch().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
