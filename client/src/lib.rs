//! # Quotebook Client
//!
//! Local quote collection with periodic sync against a remote collection.
//!
//! The [`SyncController`] owns the local collection and runs sync cycles:
//! fetch the remote snapshot, detect conflicts, then either merge and
//! publish or wait for an accept-remote / keep-local decision. Everything
//! around it sits behind a small seam:
//!
//! - [`KeyValueStore`] - where collections and preferences are kept
//! - [`RemoteStore`] - where the shared collection lives
//! - [`Presenter`] - what the user sees
//! - [`Clock`] - when the next periodic cycle is due
//!
//! [`runtime::run`] drives a controller from a timer and a command channel.

pub mod config;
pub mod controller;
pub mod error;
pub mod presenter;
pub mod remote;
pub mod runtime;
pub mod schedule;
pub mod storage;

pub use config::{Config, ConfigError};
pub use controller::{default_quotes, SyncController, SyncOptions, SyncOutcome, SyncState};
pub use error::{Error, Result};
pub use presenter::{Notice, NoticeLevel, Presenter, RecordingPresenter, SyncStatus};
pub use remote::{HttpRemote, MockRemote, RemoteStore, StorageRemote, TransportError};
pub use runtime::Command;
pub use schedule::{Clock, ManualClock, SyncTimer, SystemClock};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
