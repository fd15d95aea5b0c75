//! Conflict detection between a local and a remote collection.
//!
//! A conflict is a text present on both sides with different categories.
//! Texts present on only one side are additions, never conflicts.

use crate::{Category, Collection, Quote};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A text shared by local and remote whose categories disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// The shared quote text
    pub text: String,
    /// Category held locally
    pub local_category: Category,
    /// Category held by the remote
    pub remote_category: Category,
}

impl Conflict {
    fn between(local: &Quote, remote: &Quote) -> Self {
        Self {
            text: local.text.clone(),
            local_category: local.category.clone(),
            remote_category: remote.category.clone(),
        }
    }
}

/// Find every local quote whose text exists remotely under another category.
///
/// Output follows local order. When the remote holds the same text more than
/// once, its first occurrence is the one compared against.
pub fn detect_conflicts(local: &Collection, remote: &Collection) -> Vec<Conflict> {
    let mut by_text: HashMap<&str, &Quote> = HashMap::with_capacity(remote.len());
    for quote in remote {
        by_text.entry(quote.text.as_str()).or_insert(quote);
    }

    local
        .iter()
        .filter_map(|local_quote| {
            let remote_quote = by_text.get(local_quote.text.as_str())?;
            (remote_quote.category != local_quote.category)
                .then(|| Conflict::between(local_quote, remote_quote))
        })
        .collect()
}
