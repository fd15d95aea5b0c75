//! Quote handlers - serve and replace the shared collection.

use crate::error::Result;
use crate::store::QuoteStore;
use quotebook_engine::Collection;
use serde::Serialize;

/// Response for a collection replace.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutQuotesResponse {
    /// Number of quotes now held
    pub count: usize,
}

/// Return the current collection.
pub async fn handle_get(store: &QuoteStore) -> Collection {
    store.get().await
}

/// Validate and store a full replacement collection.
///
/// The body must be a JSON array of valid quotes; anything else is rejected
/// and the stored collection is left as it was.
pub async fn handle_put(store: &QuoteStore, body: &str) -> Result<PutQuotesResponse> {
    let quotes = Collection::from_json(body)?;
    let count = quotes.len();

    store.replace(quotes).await?;
    tracing::info!(count, "Quote collection replaced");

    Ok(PutQuotesResponse { count })
}
