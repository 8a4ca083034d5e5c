//! Long-lived memory ledger for Daybook.
//!
//! Memories are short free-text facts the user asked the assistant to keep
//! ("likes espresso", "sister's birthday is in June"). They are global rather
//! than tied to any single day's chat, and live in one durable JSON blob.

pub mod error;
pub mod ledger;
pub mod model;

/// Memory error type.
pub use error::MemoryError;
/// Ledger interface and default file implementation.
pub use ledger::{FileMemoryLedger, MemoryLedger};
/// Memory record model.
pub use model::MemoryRecord;
