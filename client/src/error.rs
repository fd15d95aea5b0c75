//! Unified error handling for the client.

use crate::remote::TransportError;
use crate::storage::StorageError;

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected input: empty fields, duplicate text, bad import data.
    #[error("{0}")]
    Validation(#[from] quotebook_engine::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Sync failed: {0}")]
    Transport(#[from] TransportError),

    #[error("a sync conflict is waiting for a decision")]
    ConflictPending,

    #[error("there is no sync conflict to resolve")]
    NoConflictPending,
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::from(quotebook_engine::Error::NotAnArray);
        assert_eq!(err.to_string(), "expected a JSON array of quotes");

        let err = Error::from(TransportError::FetchFailed("offline".into()));
        assert_eq!(err.to_string(), "Sync failed: fetch failed: offline");
    }
}
