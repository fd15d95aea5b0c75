//! Quote collection storage for the server.

mod quotes;

pub use quotes::QuoteStore;
