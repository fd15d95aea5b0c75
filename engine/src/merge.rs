//! Merging collections and applying a conflict resolution.
//!
//! # Policy
//!
//! 1. Every local entry is kept as is, in order
//! 2. Remote entries whose text is absent locally are appended, in remote order
//! 3. Conflicting entries keep the local category unless the caller resolves
//!    with [`Resolution::AcceptRemote`]

use crate::{detect_conflicts, Collection};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The decision closing a conflict-pending sync cycle.
///
/// The decision covers the whole conflict set; there is no per-conflict choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    /// Take the remote category for every conflicting text
    AcceptRemote,
    /// Keep the local collection and make it the new source of truth
    KeepLocal,
}

impl Resolution {
    /// Map the boolean "accept" answer from the presentation surface.
    pub fn from_accept(accept: bool) -> Self {
        if accept {
            Resolution::AcceptRemote
        } else {
            Resolution::KeepLocal
        }
    }
}

/// Merge `remote` into `local`.
///
/// Membership is by exact text, so merging a collection with itself yields
/// the same collection. The result length is `local.len()` plus the number
/// of remote entries whose text is not in `local`.
pub fn merge(local: &Collection, remote: &Collection) -> Collection {
    let local_texts: HashSet<&str> = local.iter().map(|q| q.text.as_str()).collect();

    let mut merged = local.clone();
    merged.extend(
        remote
            .iter()
            .filter(|q| !local_texts.contains(q.text.as_str()))
            .cloned(),
    );
    merged
}

/// Apply a resolution to a local collection given the remote snapshot it
/// conflicted with.
pub fn resolve(local: &Collection, remote: &Collection, resolution: Resolution) -> Collection {
    match resolution {
        Resolution::KeepLocal => local.clone(),
        Resolution::AcceptRemote => {
            let remote_categories: HashMap<String, String> = detect_conflicts(local, remote)
                .into_iter()
                .map(|c| (c.text, c.remote_category))
                .collect();

            merge(local, remote)
                .into_iter()
                .map(|mut quote| {
                    if let Some(category) = remote_categories.get(&quote.text) {
                        quote.category = category.clone();
                    }
                    quote
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quote;

    fn collection(items: &[(&str, &str)]) -> Collection {
        items.iter().map(|(t, c)| Quote::new(*t, *c)).collect()
    }

    #[test]
    fn merge_appends_remote_only_entries() {
        let local = collection(&[("T1", "work")]);
        let remote = collection(&[("T2", "life")]);

        assert_eq!(
            merge(&local, &remote),
            collection(&[("T1", "work"), ("T2", "life")])
        );
    }

    #[test]
    fn merge_keeps_local_category_on_conflict() {
        let local = collection(&[("T1", "work")]);
        let remote = collection(&[("T1", "life"), ("T2", "life")]);

        assert_eq!(
            merge(&local, &remote),
            collection(&[("T1", "work"), ("T2", "life")])
        );
    }

    #[test]
    fn merge_with_self_is_identity() {
        let a = collection(&[("T1", "work"), ("T2", "life"), ("T3", "misc")]);
        assert_eq!(merge(&a, &a), a);
    }

    #[test]
    fn merge_with_empty_sides() {
        let a = collection(&[("T1", "work")]);
        assert_eq!(merge(&a, &Collection::new()), a);
        assert_eq!(merge(&Collection::new(), &a), a);
    }

    #[test]
    fn merge_preserves_local_order() {
        let local = collection(&[("B", "1"), ("A", "1")]);
        let remote = collection(&[("D", "2"), ("A", "2"), ("C", "2")]);

        let texts: Vec<_> = merge(&local, &remote)
            .into_iter()
            .map(|q| q.text)
            .collect();
        assert_eq!(texts, vec!["B", "A", "D", "C"]);
    }

    #[test]
    fn accept_remote_overwrites_conflicting_categories_only() {
        let local = collection(&[("T1", "work"), ("T2", "life"), ("T3", "misc")]);
        let remote = collection(&[("T1", "life"), ("T3", "misc"), ("T4", "new")]);

        let resolved = resolve(&local, &remote, Resolution::AcceptRemote);
        assert_eq!(
            resolved,
            collection(&[("T1", "life"), ("T2", "life"), ("T3", "misc"), ("T4", "new")])
        );
    }

    #[test]
    fn keep_local_returns_local_unchanged() {
        let local = collection(&[("T1", "work")]);
        let remote = collection(&[("T1", "life"), ("T2", "life")]);

        assert_eq!(resolve(&local, &remote, Resolution::KeepLocal), local);
    }

    #[test]
    fn resolution_from_accept_flag() {
        assert_eq!(Resolution::from_accept(true), Resolution::AcceptRemote);
        assert_eq!(Resolution::from_accept(false), Resolution::KeepLocal);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use crate::Conflict;
        use proptest::prelude::*;

        /// Collections with unique texts drawn from a small alphabet so that
        /// local and remote overlap often.
        fn arb_collection() -> impl Strategy<Value = Collection> {
            prop::collection::btree_map("[a-f]{1,2}", "(work|life|misc)", 0..12).prop_map(
                |entries| {
                    entries
                        .into_iter()
                        .map(|(text, category)| Quote::new(text, category))
                        .collect()
                },
            )
        }

        proptest! {
            #[test]
            fn prop_detect_matches_definition(a in arb_collection(), b in arb_collection()) {
                let expected: Vec<Conflict> = a
                    .iter()
                    .filter_map(|q| {
                        let other = b.get(&q.text)?;
                        (other.category != q.category).then(|| Conflict {
                            text: q.text.clone(),
                            local_category: q.category.clone(),
                            remote_category: other.category.clone(),
                        })
                    })
                    .collect();

                prop_assert_eq!(detect_conflicts(&a, &b), expected);
            }

            #[test]
            fn prop_merge_idempotent(a in arb_collection()) {
                prop_assert_eq!(merge(&a, &a), a);
            }

            #[test]
            fn prop_merge_length(a in arb_collection(), b in arb_collection()) {
                let remote_only = b.iter().filter(|q| !a.contains_text(&q.text)).count();
                prop_assert_eq!(merge(&a, &b).len(), a.len() + remote_only);
            }

            #[test]
            fn prop_merge_keeps_local_prefix(a in arb_collection(), b in arb_collection()) {
                let merged = merge(&a, &b);
                prop_assert_eq!(&merged.as_slice()[..a.len()], a.as_slice());
            }

            #[test]
            fn prop_accept_remote_takes_remote_categories(
                a in arb_collection(),
                b in arb_collection(),
            ) {
                let conflicts = detect_conflicts(&a, &b);
                let resolved = resolve(&a, &b, Resolution::AcceptRemote);

                for conflict in &conflicts {
                    prop_assert_eq!(
                        &resolved.get(&conflict.text).unwrap().category,
                        &conflict.remote_category
                    );
                }
                for quote in a.iter() {
                    if !conflicts.iter().any(|c| c.text == quote.text) {
                        prop_assert_eq!(&resolved.get(&quote.text).unwrap().category, &quote.category);
                    }
                }
                // Nothing left to conflict about afterwards
                prop_assert!(detect_conflicts(&resolved, &b).is_empty());
            }

            #[test]
            fn prop_keep_local_is_identity(a in arb_collection(), b in arb_collection()) {
                prop_assert_eq!(resolve(&a, &b, Resolution::KeepLocal), a);
            }
        }
    }
}
