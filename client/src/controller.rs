//! Sync controller - owns the local collection and drives sync cycles.
//!
//! # State machine
//!
//! ```text
//! Idle ──timer/sync_now──▶ Syncing ──no conflicts──▶ Idle (timer re-armed)
//!                             │
//!                             └──conflicts──▶ ConflictPending ──resolve──▶ Idle
//! ```
//!
//! The timer is only re-armed at the end of a cycle and stays disarmed while
//! a conflict waits for a decision, so at most one cycle is ever open.
//! Transport failures leave the local collection untouched and re-arm the
//! timer; the next interval retries.
//!
//! Sync-on-write is off by default: local edits reach the remote on the next
//! periodic cycle unless [`SyncOptions::sync_on_write`] is set.

use crate::error::{Error, Result};
use crate::presenter::{Notice, Presenter, SyncStatus};
use crate::remote::RemoteStore;
use crate::schedule::{Clock, SyncTimer};
use crate::storage::{keys, KeyValueStore};
use chrono::Local;
use quotebook_engine::{detect_conflicts, merge, Collection, Conflict, Quote, Resolution};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Collection used when storage holds nothing usable.
pub fn default_quotes() -> Collection {
    vec![
        Quote::new(
            "The best way to predict the future is to invent it.",
            "inspiration",
        ),
        Quote::new("Simplicity is prerequisite for reliability.", "engineering"),
        Quote::new("Well done is better than well said.", "motivation"),
        Quote::new("The unexamined life is not worth living.", "philosophy"),
    ]
    .into()
}

/// Sync behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Time between periodic cycles
    pub interval: Duration,
    /// Run a cycle immediately after a successful local add/import
    pub sync_on_write: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            sync_on_write: false,
        }
    }
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
    ConflictPending,
}

/// How a completed sync cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No conflicts; remote-only quotes were merged in and the result published.
    Merged { added: usize },
    /// Conflicts found; nothing merged or published until [`SyncController::resolve`].
    ConflictPending { conflicts: usize },
}

/// A conflict set waiting for a decision, with the remote snapshot it was
/// detected against.
#[derive(Debug, Clone)]
struct PendingConflict {
    conflicts: Vec<Conflict>,
    remote: Collection,
}

/// A local edit made while a conflict was pending, applied after resolution.
#[derive(Debug, Clone)]
enum QueuedEdit {
    Add(Quote),
    Import(Collection),
}

/// The sync controller.
pub struct SyncController<S, R, P> {
    storage: S,
    remote: R,
    presenter: P,
    clock: Arc<dyn Clock>,
    options: SyncOptions,
    timer: SyncTimer,
    state: SyncState,
    local: Collection,
    category_filter: Option<String>,
    pending: Option<PendingConflict>,
    queued: Vec<QueuedEdit>,
}

impl<S, R, P> SyncController<S, R, P>
where
    S: KeyValueStore,
    R: RemoteStore,
    P: Presenter,
{
    /// Load the local collection and preferences from storage, render the
    /// initial view, and arm the sync timer.
    ///
    /// Unreadable stored data falls back to [`default_quotes`].
    pub fn load(
        storage: S,
        remote: R,
        presenter: P,
        clock: Arc<dyn Clock>,
        options: SyncOptions,
    ) -> Self {
        let local = load_local(&storage);
        let category_filter = match storage.get(keys::LAST_CATEGORY) {
            Ok(Some(category)) if category != ALL_CATEGORIES => Some(category),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read category preference");
                None
            }
        };

        tracing::info!(
            quotes = local.len(),
            interval_secs = options.interval.as_secs(),
            sync_on_write = options.sync_on_write,
            "Loaded quote collection"
        );

        let mut timer = SyncTimer::new(options.interval);
        timer.arm(clock.now());

        let mut controller = Self {
            storage,
            remote,
            presenter,
            clock,
            options,
            timer,
            state: SyncState::Idle,
            local,
            category_filter,
            pending: None,
            queued: Vec::new(),
        };
        controller.refresh_categories();
        controller
    }

    pub fn local(&self) -> &Collection {
        &self.local
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn timer(&self) -> &SyncTimer {
        &self.timer
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn category_filter(&self) -> Option<&str> {
        self.category_filter.as_deref()
    }

    /// Conflicts awaiting a decision, if any.
    pub fn pending_conflicts(&self) -> Option<&[Conflict]> {
        self.pending.as_ref().map(|p| p.conflicts.as_slice())
    }

    /// Number of local edits held back until the pending conflict is resolved.
    pub fn queued_edits(&self) -> usize {
        self.queued.len()
    }

    /// Time until the next periodic cycle; `None` while no cycle is scheduled.
    pub fn next_sync_in(&self) -> Option<Duration> {
        self.timer.remaining(self.clock.now())
    }

    // ------------------------------------------------------------------
    // Sync cycle
    // ------------------------------------------------------------------

    /// Run a cycle if the periodic timer has elapsed.
    pub async fn on_tick(&mut self) -> Option<Result<SyncOutcome>> {
        if !self.timer.is_due(self.clock.now()) {
            return None;
        }
        Some(self.sync_now().await)
    }

    /// Run one fetch, detect, merge-or-pause, publish cycle.
    ///
    /// Transport failures are reported to the presenter and returned; the
    /// local collection is left as it was.
    pub async fn sync_now(&mut self) -> Result<SyncOutcome> {
        if self.pending.is_some() {
            return Err(Error::ConflictPending);
        }

        self.timer.cancel();
        self.state = SyncState::Syncing;
        self.presenter.show_status(&SyncStatus::Syncing);

        let result = self.run_cycle().await;

        match &result {
            Ok(SyncOutcome::ConflictPending { conflicts }) => {
                // Timer stays disarmed until resolve()
                self.state = SyncState::ConflictPending;
                self.presenter.show_status(&SyncStatus::ConflictPending {
                    conflicts: *conflicts,
                });
            }
            Ok(SyncOutcome::Merged { .. }) => {
                self.finish_cycle();
            }
            Err(Error::Storage(e)) => {
                // The remote already holds the merged collection
                tracing::warn!(error = %e, "Sync published but saving locally failed");
                self.finish_cycle();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sync cycle failed");
                self.presenter.show_status(&SyncStatus::Failed);
                self.finish_cycle();
            }
        }

        result
    }

    async fn run_cycle(&mut self) -> Result<SyncOutcome> {
        let remote = self.remote.fetch().await?;
        let conflicts = detect_conflicts(&self.local, &remote);

        if !conflicts.is_empty() {
            tracing::info!(count = conflicts.len(), "Sync conflicts detected");
            self.presenter.show_conflicts(&conflicts);
            let count = conflicts.len();
            self.pending = Some(PendingConflict { conflicts, remote });
            return Ok(SyncOutcome::ConflictPending { conflicts: count });
        }

        let merged = merge(&self.local, &remote);
        let added = merged.len() - self.local.len();

        self.remote.publish(&merged).await?;
        let persisted = self.commit(merged);

        tracing::info!(added, total = self.local.len(), "Sync complete");
        self.presenter.show_status(&SyncStatus::Synced { at: Local::now() });
        if added > 0 {
            self.refresh_categories();
        }
        if let Err(e) = persisted {
            self.presenter.notify(Notice::error(format!(
                "Synced, but saving quotes locally failed: {e}"
            )));
            return Err(e);
        }
        self.presenter.notify(Notice::success("Sync complete"));

        Ok(SyncOutcome::Merged { added })
    }

    fn finish_cycle(&mut self) {
        self.state = SyncState::Idle;
        self.timer.arm(self.clock.now());
    }

    /// Close a conflict-pending cycle with the user's decision.
    ///
    /// The outcome is published before it replaces the local collection; if
    /// publishing fails the conflict stays pending and nothing changes.
    /// Edits queued behind the conflict are folded into the committed
    /// collection once the publish succeeds, even if saving it then fails.
    pub async fn resolve(&mut self, resolution: Resolution) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return Err(Error::NoConflictPending);
        };

        let resolved = quotebook_engine::resolve(&self.local, &pending.remote, resolution);

        if let Err(e) = self.remote.publish(&resolved).await {
            tracing::warn!(error = %e, ?resolution, "Publishing conflict resolution failed");
            self.pending = Some(pending);
            self.presenter.show_status(&SyncStatus::Failed);
            return Err(e.into());
        }

        tracing::info!(
            ?resolution,
            conflicts = pending.conflicts.len(),
            "Sync conflict resolved"
        );

        let queued = std::mem::take(&mut self.queued);
        let had_queued = !queued.is_empty();
        let next = self.apply_queued(resolved, queued);
        let persisted = self.commit(next);

        self.presenter.hide_conflicts();
        self.presenter.notify(Notice::success(match resolution {
            Resolution::AcceptRemote => "Used server changes",
            Resolution::KeepLocal => "Kept local changes",
        }));
        self.presenter.show_status(&SyncStatus::Synced { at: Local::now() });
        self.finish_cycle();
        self.refresh_categories();

        if let Err(e) = persisted {
            self.presenter
                .notify(Notice::error(format!("Saving quotes locally failed: {e}")));
            return Err(e);
        }
        if had_queued {
            self.after_local_write().await;
        }
        Ok(())
    }

    fn apply_queued(&mut self, mut next: Collection, queued: Vec<QueuedEdit>) -> Collection {
        if queued.is_empty() {
            return next;
        }

        let before = next.len();
        for edit in queued {
            match edit {
                QueuedEdit::Add(quote) => {
                    if let Err(e) = next.add(quote) {
                        self.presenter
                            .notify(Notice::error(format!("Queued quote dropped: {e}")));
                    }
                }
                QueuedEdit::Import(imported) => next = merge(&next, &imported),
            }
        }

        tracing::debug!(added = next.len() - before, "Applied queued edits");
        next
    }

    // ------------------------------------------------------------------
    // Local edits
    // ------------------------------------------------------------------

    /// Add a quote entered by the user.
    ///
    /// Empty text or category and already-present text are rejected. While a
    /// conflict is pending the quote is validated now and added after the
    /// decision.
    pub async fn add_quote(&mut self, text: &str, category: &str) -> Result<()> {
        let quote = Quote::new(text, category);
        quote.validate().map_err(|e| self.reject(e.into()))?;

        let queued_duplicate = self.queued.iter().any(|edit| match edit {
            QueuedEdit::Add(q) => q.same_text(&quote),
            QueuedEdit::Import(_) => false,
        });
        if self.local.contains_text(&quote.text) || queued_duplicate {
            return Err(self.reject(quotebook_engine::Error::DuplicateText(quote.text).into()));
        }

        if self.pending.is_some() {
            self.queued.push(QueuedEdit::Add(quote));
            self.presenter.notify(Notice::info(
                "Quote saved; it will be added once the sync conflict is resolved",
            ));
            return Ok(());
        }

        let mut next = self.local.clone();
        next.push(quote);
        self.commit(next)?;

        tracing::debug!(total = self.local.len(), "Quote added");
        self.presenter.notify(Notice::success("Quote added"));
        self.refresh_categories();
        self.after_local_write().await;
        Ok(())
    }

    /// Import quotes from JSON text.
    ///
    /// The text must be a JSON array of quotes. Quotes whose text already
    /// exists locally are skipped. Returns the number of quotes added (zero
    /// when the import was queued behind a pending conflict).
    pub async fn import_json(&mut self, json: &str) -> Result<usize> {
        let imported = Collection::from_json(json).map_err(|e| self.reject(e.into()))?;

        if self.pending.is_some() {
            self.queued.push(QueuedEdit::Import(imported));
            self.presenter.notify(Notice::info(
                "Import saved; it will be applied once the sync conflict is resolved",
            ));
            return Ok(0);
        }

        let next = merge(&self.local, &imported);
        let added = next.len() - self.local.len();
        if added > 0 {
            self.commit(next)?;
            self.refresh_categories();
        }

        tracing::info!(imported = imported.len(), added, "Imported quotes");
        self.presenter
            .notify(Notice::success(format!("Imported {added} quote(s)")));
        if added > 0 {
            self.after_local_write().await;
        }
        Ok(added)
    }

    /// The local collection as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String> {
        Ok(self.local.to_json_pretty()?)
    }

    /// Show a random quote from the current category filter.
    pub fn random_quote(&mut self) -> Option<Quote> {
        let candidates: Vec<&Quote> = self
            .local
            .filter_by_category(self.category_filter.as_deref())
            .collect();
        let choice = candidates.choose(&mut rand::thread_rng()).map(|q| (*q).clone());

        self.presenter.show_quote(choice.as_ref());
        choice
    }

    /// Change the category filter and remember it. `"all"` clears the filter.
    pub fn set_category_filter(&mut self, category: &str) -> Result<()> {
        self.category_filter = (category != ALL_CATEGORIES).then(|| category.to_string());
        self.storage.set(keys::LAST_CATEGORY, category)?;

        self.refresh_categories();
        self.random_quote();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Replace the local collection and persist it.
    ///
    /// The in-memory collection is replaced even when persisting fails.
    fn commit(&mut self, next: Collection) -> Result<()> {
        self.local = next;
        let json = self.local.to_json()?;
        self.storage.set(keys::LOCAL_QUOTES, &json).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist local quotes");
            Error::from(e)
        })
    }

    async fn after_local_write(&mut self) {
        if !self.options.sync_on_write || self.pending.is_some() {
            return;
        }
        if let Err(e) = self.sync_now().await {
            tracing::debug!(error = %e, "Sync after local write did not complete");
        }
    }

    fn refresh_categories(&mut self) {
        let categories = self.local.categories();
        self.presenter
            .show_categories(&categories, self.category_filter.as_deref());
    }

    fn reject(&mut self, error: Error) -> Error {
        tracing::debug!(error = %error, "Rejected input");
        self.presenter.notify(Notice::error(error.to_string()));
        error
    }
}

fn load_local(storage: &impl KeyValueStore) -> Collection {
    match storage.get(keys::LOCAL_QUOTES) {
        Ok(Some(json)) => Collection::from_json(&json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored quotes are unreadable, using defaults");
            default_quotes()
        }),
        Ok(None) => default_quotes(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored quotes, using defaults");
            default_quotes()
        }
    }
}
