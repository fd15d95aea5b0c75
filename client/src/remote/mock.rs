//! Mock remote for testing.
//!
//! Holds the remote collection in memory, records every publish, and can be
//! told to fail the next fetch or publish.

use super::{RemoteStore, TransportError};
use async_trait::async_trait;
use quotebook_engine::Collection;
use std::sync::{Arc, Mutex};

/// Mock remote for testing.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// controller.
#[derive(Debug, Default, Clone)]
pub struct MockRemote {
    inner: Arc<Mutex<MockRemoteInner>>,
}

#[derive(Debug, Default)]
struct MockRemoteInner {
    quotes: Collection,
    published: Vec<Collection>,
    fetch_count: usize,
    fail_next_fetch: Option<String>,
    fail_next_publish: Option<String>,
}

impl MockRemote {
    /// Create a mock remote with an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock remote already holding `quotes`.
    pub fn with_quotes(quotes: Collection) -> Self {
        let remote = Self::new();
        remote.set_quotes(quotes);
        remote
    }

    /// Replace the remote collection, as another session would.
    pub fn set_quotes(&self, quotes: Collection) {
        self.inner.lock().unwrap().quotes = quotes;
    }

    /// Current remote collection.
    pub fn quotes(&self) -> Collection {
        self.inner.lock().unwrap().quotes.clone()
    }

    /// Every collection published so far, oldest first.
    pub fn published(&self) -> Vec<Collection> {
        self.inner.lock().unwrap().published.clone()
    }

    /// Number of fetch calls, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.inner.lock().unwrap().fetch_count
    }

    /// Cause the next fetch() to fail with the given error.
    pub fn fail_next_fetch(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_fetch = Some(error.to_string());
    }

    /// Cause the next publish() to fail with the given error.
    pub fn fail_next_publish(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_publish = Some(error.to_string());
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn fetch(&self) -> Result<Collection, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.fetch_count += 1;

        if let Some(error) = inner.fail_next_fetch.take() {
            return Err(TransportError::FetchFailed(error));
        }

        Ok(inner.quotes.clone())
    }

    async fn publish(&self, quotes: &Collection) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_publish.take() {
            return Err(TransportError::PublishFailed(error));
        }

        inner.quotes = quotes.clone();
        inner.published.push(quotes.clone());
        Ok(())
    }
}
