//! Error types for memory operations.

/// Errors returned by memory ledgers.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The ledger blob held something other than a record array.
    #[error("invalid ledger blob: {0}")]
    InvalidBlob(String),
}
