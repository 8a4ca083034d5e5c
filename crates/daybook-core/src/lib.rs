//! The Daybook session engine.
//!
//! Owns the in-memory chat collection, per-day persistence, model
//! resolution, and the orchestration of a full user turn: classify the
//! intent against the Completion Provider, dispatch a selected function
//! call, and reconcile the result back into the conversation.

pub mod archive;
pub mod catalog;
pub mod error;
pub mod provider;
pub mod store;
pub mod types;

/// Chat persistence.
pub use archive::{ArchiveError, ChatArchive, FileChatArchive};
/// Model name resolution and the baseline fallback.
pub use catalog::ModelCatalog;
/// Engine error taxonomy.
pub use error::ChatError;
/// OpenAI-style HTTP provider client.
pub use provider::OpenAiClient;
/// The session engine.
pub use store::{ChatStore, ChatStoreBuilder};
/// Chat and message models.
pub use types::{Chat, Message, MessageBody, Role};
