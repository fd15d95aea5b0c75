//! The server's copy of the shared quote collection.
//!
//! Held in memory behind a read-write lock. When a file is configured, the
//! collection is loaded from it at startup and rewritten on every replace.

use quotebook_engine::Collection;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Shared quote collection.
#[derive(Debug, Default)]
pub struct QuoteStore {
    quotes: RwLock<Collection>,
    file: Option<PathBuf>,
}

impl QuoteStore {
    /// Create an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a store persisted to `file`, which may not exist yet.
    ///
    /// A file that does not hold a quote collection is an error rather than
    /// silently replaced.
    pub async fn open(file: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let file = file.into();

        let quotes = match tokio::fs::read_to_string(&file).await {
            Ok(json) => Collection::from_json(&json).map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{}: {e}", file.display()),
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collection::new(),
            Err(e) => return Err(e),
        };

        tracing::info!(path = %file.display(), count = quotes.len(), "Loaded quotes");

        Ok(Self {
            quotes: RwLock::new(quotes),
            file: Some(file),
        })
    }

    /// Snapshot of the current collection.
    pub async fn get(&self) -> Collection {
        self.quotes.read().await.clone()
    }

    /// Replace the collection, writing it to the backing file first if any.
    pub async fn replace(&self, quotes: Collection) -> Result<(), std::io::Error> {
        let mut current = self.quotes.write().await;

        if let Some(file) = &self.file {
            let json = quotes
                .to_json_pretty()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            tokio::fs::write(file, json).await?;
        }

        *current = quotes;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_engine::Quote;

    #[tokio::test]
    async fn in_memory_replace() {
        let store = QuoteStore::in_memory();
        assert!(store.get().await.is_empty());

        let quotes: Collection = vec![Quote::new("T1", "work")].into();
        store.replace(quotes.clone()).await.unwrap();
        assert_eq!(store.get().await, quotes);
    }

    #[tokio::test]
    async fn file_backed_store_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server-quotes.json");

        let store = QuoteStore::open(&path).await.unwrap();
        assert!(store.get().await.is_empty());

        let quotes: Collection = vec![Quote::new("T1", "work"), Quote::new("T2", "life")].into();
        store.replace(quotes.clone()).await.unwrap();

        let reopened = QuoteStore::open(&path).await.unwrap();
        assert_eq!(reopened.get().await, quotes);
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server-quotes.json");
        tokio::fs::write(&path, "{}").await.unwrap();

        let err = QuoteStore::open(&path).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
