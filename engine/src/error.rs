//! Error types for the Quotebook engine.

use thiserror::Error;

/// All possible errors from the Quotebook engine.
///
/// Every variant is a boundary rejection: the input is refused and nothing
/// is mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("quote text must not be empty")]
    EmptyText,

    #[error("quote category must not be empty")]
    EmptyCategory,

    #[error("a quote with this text already exists: {0}")]
    DuplicateText(String),

    // Parse errors
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("expected a JSON array of quotes")]
    NotAnArray,

    #[error("invalid quote at index {index}: {reason}")]
    InvalidQuote { index: usize, reason: String },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
