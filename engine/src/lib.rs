//! # Quotebook Engine
//!
//! Conflict detection and merge logic for quote collections.
//!
//! This crate holds the only part of Quotebook with real rules: deciding
//! which quotes conflict between a local and a remote collection, and how the
//! two are combined. It has no knowledge of storage, timers, or transport.
//!
//! ## Core Concepts
//!
//! ### Quotes
//!
//! A [`Quote`] is a `{text, category}` pair. There is no ID field: `text` is
//! the identity key, compared exactly.
//!
//! ### Conflicts
//!
//! [`detect_conflicts`] reports every local quote whose text exists remotely
//! under a different category. Entries unique to either side are never
//! conflicts.
//!
//! ### Merging
//!
//! [`merge`] keeps local entries untouched and appends remote-only ones.
//! [`resolve`] closes a conflict with a [`Resolution`]:
//! - [`Resolution::AcceptRemote`] - merge, then take remote categories
//! - [`Resolution::KeepLocal`] - local stays as is
//!
//! ## Quick Start
//!
//! ```rust
//! use quotebook_engine::{detect_conflicts, merge, resolve, Collection, Quote, Resolution};
//!
//! let local: Collection = vec![Quote::new("T1", "work")].into();
//! let remote: Collection = vec![Quote::new("T1", "life"), Quote::new("T2", "life")].into();
//!
//! let conflicts = detect_conflicts(&local, &remote);
//! assert_eq!(conflicts.len(), 1);
//!
//! // Plain merge never touches a conflicting category
//! assert_eq!(merge(&local, &remote).get("T1").unwrap().category, "work");
//!
//! let resolved = resolve(&local, &remote, Resolution::AcceptRemote);
//! assert_eq!(resolved.get("T1").unwrap().category, "life");
//! assert_eq!(resolved.len(), 2);
//! ```
//!
//! ## Persistence
//!
//! [`Collection::to_json`] and [`Collection::from_json`] use a bare JSON
//! array of quotes, the format shared by storage, export, and import.

pub mod collection;
pub mod conflict;
pub mod error;
pub mod merge;
pub mod quote;

// Re-export main types at crate root
pub use collection::Collection;
pub use conflict::{detect_conflicts, Conflict};
pub use error::Error;
pub use merge::{merge, resolve, Resolution};
pub use quote::Quote;

/// Type alias for clarity
pub type Category = String;
