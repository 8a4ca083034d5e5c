//! Wire protocol types for Daybook providers, tool schemas, and chat events.

mod completion;
mod error;
mod image;

pub use completion::{
    ChatChoice, ChatRequest, ChatResponse, ChoiceMessage, CompletionProvider, FunctionCall,
    FunctionSchema, WireMessage,
};
pub use error::{ProviderError, ToolError};
pub use image::{GeneratedImage, ImageProvider, ImageRequest, ImageResponse};

use serde::{Deserialize, Serialize};

/// A model known to the catalog: provider identifier plus display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Provider-specific model identifier.
    pub id: String,
    /// User-facing display name.
    pub name: String,
}

impl ModelDescriptor {
    /// Build a descriptor from id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// State-change notifications emitted by the chat store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type", content = "payload")]
pub enum ChatEvent {
    /// A chat's message list or title changed.
    ChatUpdated { day: String },
    /// A chat was removed along with its durable blob.
    ChatDeleted { day: String },
}

/// Sink interface for chat store events.
pub trait EventSink: Send + Sync {
    /// Emit an event to downstream listeners.
    fn emit(&self, event: ChatEvent);
}

#[cfg(test)]
mod tests {
    use super::ChatEvent;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn chat_event_round_trips_through_json() {
        let event = ChatEvent::ChatUpdated {
            day: "2024-05-01".to_string(),
        };
        let encoded = serde_json::to_value(&event).expect("serialize");
        assert_eq!(
            encoded,
            json!({ "type": "chat_updated", "payload": { "day": "2024-05-01" } })
        );
        let decoded: ChatEvent = serde_json::from_value(encoded).expect("deserialize");
        assert_eq!(decoded, event);
    }
}
