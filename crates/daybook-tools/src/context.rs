//! Tool execution context shared across a turn.

use crate::services::{CalendarService, LocationService, ReminderService};
use chrono::{DateTime, FixedOffset};
use daybook_config::SettingsStore;
use daybook_memory::MemoryLedger;
use daybook_protocol::ToolError;
use daybook_protocol::ImageProvider;
use std::sync::Arc;

/// A recent chat message visible to tools that look back at history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Message role (`user`, `assistant`, or `system`).
    pub role: String,
    /// Rendered message content.
    pub content: String,
    /// Revised prompt when the entry is an inline image reference.
    pub revised_prompt: Option<String>,
}

impl HistoryEntry {
    /// Build a plain text entry.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            revised_prompt: None,
        }
    }
}

/// Shared service dependencies for a turn (constructed once, shared via Arc).
#[derive(Default)]
pub struct TurnServices {
    /// Optional calendar integration.
    pub calendar: Option<Arc<dyn CalendarService>>,
    /// Optional reminders integration.
    pub reminders: Option<Arc<dyn ReminderService>>,
    /// Optional location integration.
    pub location: Option<Arc<dyn LocationService>>,
    /// Optional image generation provider.
    pub image: Option<Arc<dyn ImageProvider>>,
    /// Optional memory ledger.
    pub memory: Option<Arc<dyn MemoryLedger>>,
    /// Optional preference storage.
    pub settings: Option<Arc<dyn SettingsStore>>,
}

/// Context passed to tools during execution.
///
/// Per-turn fields are stored directly; service references live behind an
/// `Arc<TurnServices>` so cloning per tool call is a cheap bump.
#[derive(Clone)]
pub struct ToolContext {
    /// Current instant in the user's configured time zone.
    pub now: DateTime<FixedOffset>,
    /// Most recent chat messages, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Shared turn-scoped services (cheap Arc clone).
    pub services: Arc<TurnServices>,
}

impl ToolContext {
    /// Build a context with the given clock and services.
    pub fn new(now: DateTime<FixedOffset>, services: Arc<TurnServices>) -> Self {
        Self {
            now,
            history: Vec::new(),
            services,
        }
    }

    /// Attach recent chat history, oldest first.
    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    /// The calendar integration, or an execution error when unconfigured.
    pub fn calendar(&self) -> Result<&Arc<dyn CalendarService>, ToolError> {
        self.services
            .calendar
            .as_ref()
            .ok_or_else(|| ToolError::ExecutionFailed("calendar service not configured".to_string()))
    }

    /// The reminders integration, or an execution error when unconfigured.
    pub fn reminders(&self) -> Result<&Arc<dyn ReminderService>, ToolError> {
        self.services.reminders.as_ref().ok_or_else(|| {
            ToolError::ExecutionFailed("reminder service not configured".to_string())
        })
    }

    /// The location integration, or an execution error when unconfigured.
    pub fn location(&self) -> Result<&Arc<dyn LocationService>, ToolError> {
        self.services
            .location
            .as_ref()
            .ok_or_else(|| ToolError::ExecutionFailed("location service not configured".to_string()))
    }

    /// The image provider, or an execution error when unconfigured.
    pub fn image(&self) -> Result<&Arc<dyn ImageProvider>, ToolError> {
        self.services
            .image
            .as_ref()
            .ok_or_else(|| ToolError::ExecutionFailed("image provider not configured".to_string()))
    }

    /// The memory ledger, or an execution error when unconfigured.
    pub fn memory(&self) -> Result<&Arc<dyn MemoryLedger>, ToolError> {
        self.services
            .memory
            .as_ref()
            .ok_or_else(|| ToolError::ExecutionFailed("memory ledger not configured".to_string()))
    }

    /// The settings store, or an execution error when unconfigured.
    pub fn settings(&self) -> Result<&Arc<dyn SettingsStore>, ToolError> {
        self.services
            .settings
            .as_ref()
            .ok_or_else(|| ToolError::ExecutionFailed("settings store not configured".to_string()))
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("now", &self.now)
            .field("history_len", &self.history.len())
            .finish()
    }
}
