//! Presentation surface.
//!
//! The controller pushes everything the user should see through a
//! [`Presenter`]: the current quote, the category list, the conflict set
//! awaiting a decision, sync status, and short notices.

use chrono::{DateTime, Local};
use quotebook_engine::{Conflict, Quote};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Sync status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Syncing,
    Synced { at: DateTime<Local> },
    Failed,
    /// Conflicts are waiting for an accept-remote / keep-local decision.
    ConflictPending { conflicts: usize },
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Syncing => write!(f, "Syncing..."),
            SyncStatus::Synced { at } => write!(f, "Synced at {}", at.format("%H:%M:%S")),
            SyncStatus::Failed => write!(f, "Sync failed"),
            SyncStatus::ConflictPending { conflicts } => {
                write!(f, "Sync paused: {conflicts} conflict(s) to resolve")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A short-lived notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receiver of everything the user should see.
pub trait Presenter: Send {
    /// Display a quote, or an empty state when nothing matches the filter.
    fn show_quote(&mut self, quote: Option<&Quote>);

    /// Populate the category selector.
    fn show_categories(&mut self, categories: &[String], selected: Option<&str>);

    /// Present conflicts awaiting an accept-remote / keep-local decision.
    fn show_conflicts(&mut self, conflicts: &[Conflict]);

    /// The conflict decision was taken; dismiss it.
    fn hide_conflicts(&mut self);

    fn show_status(&mut self, status: &SyncStatus);

    fn notify(&mut self, notice: Notice);
}

/// Everything a [`RecordingPresenter`] has been shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    Quote(Option<Quote>),
    Categories {
        categories: Vec<String>,
        selected: Option<String>,
    },
    Conflicts(Vec<Conflict>),
    ConflictsHidden,
    Status(SyncStatus),
    Notice(Notice),
}

/// Presenter that records events, for tests and headless runs.
///
/// Clones share the same event log.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<PresenterEvent>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Status lines in display form, oldest first.
    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PresenterEvent::Status(status) => Some(status.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PresenterEvent::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    /// The most recently presented conflict set.
    pub fn last_conflicts(&self) -> Option<Vec<Conflict>> {
        self.events().into_iter().rev().find_map(|e| match e {
            PresenterEvent::Conflicts(conflicts) => Some(conflicts),
            _ => None,
        })
    }

    pub fn last_quote(&self) -> Option<Option<Quote>> {
        self.events().into_iter().rev().find_map(|e| match e {
            PresenterEvent::Quote(quote) => Some(quote),
            _ => None,
        })
    }

    fn record(&self, event: PresenterEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn show_quote(&mut self, quote: Option<&Quote>) {
        self.record(PresenterEvent::Quote(quote.cloned()));
    }

    fn show_categories(&mut self, categories: &[String], selected: Option<&str>) {
        self.record(PresenterEvent::Categories {
            categories: categories.to_vec(),
            selected: selected.map(str::to_string),
        });
    }

    fn show_conflicts(&mut self, conflicts: &[Conflict]) {
        self.record(PresenterEvent::Conflicts(conflicts.to_vec()));
    }

    fn hide_conflicts(&mut self) {
        self.record(PresenterEvent::ConflictsHidden);
    }

    fn show_status(&mut self, status: &SyncStatus) {
        self.record(PresenterEvent::Status(status.clone()));
    }

    fn notify(&mut self, notice: Notice) {
        self.record(PresenterEvent::Notice(notice));
    }
}

/// Presenter writing to the terminal.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn show_quote(&mut self, quote: Option<&Quote>) {
        match quote {
            Some(quote) => println!("\"{}\" [{}]", quote.text, quote.category),
            None => println!("No quotes available for this category."),
        }
    }

    fn show_categories(&mut self, categories: &[String], selected: Option<&str>) {
        let selected = selected.unwrap_or("all");
        println!("Categories: all, {} (showing: {selected})", categories.join(", "));
    }

    fn show_conflicts(&mut self, conflicts: &[Conflict]) {
        println!("{} conflict(s) with the server:", conflicts.len());
        for conflict in conflicts {
            println!(
                "  \"{}\"\n    local:  {}\n    server: {}",
                conflict.text, conflict.local_category, conflict.remote_category
            );
        }
        println!("Type `accept` to use server changes or `keep` to keep local changes.");
    }

    fn hide_conflicts(&mut self) {}

    fn show_status(&mut self, status: &SyncStatus) {
        println!("[{status}]");
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
            _ => println!("{}", notice.message),
        }
    }
}
