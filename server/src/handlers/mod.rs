//! Request handlers for the quote collection.

mod quotes;

pub use quotes::*;
