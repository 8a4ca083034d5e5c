//! Reply model produced by tool execution.

/// Role attached to a reply message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRole {
    /// Engine-originated notice.
    System,
    /// Assistant-visible reply.
    Assistant,
}

/// Body of a reply message.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    /// Plain text body.
    Text(String),
    /// Geographic coordinate payload.
    Location {
        /// Latitude in decimal degrees.
        latitude: f64,
        /// Longitude in decimal degrees.
        longitude: f64,
    },
}

/// A single message a tool hands back to the chat engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyMessage {
    /// Message role.
    pub role: ReplyRole,
    /// Message body.
    pub body: ReplyBody,
}

impl ReplyMessage {
    /// Build a system text message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ReplyRole::System,
            body: ReplyBody::Text(text.into()),
        }
    }

    /// Build an assistant text message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ReplyRole::Assistant,
            body: ReplyBody::Text(text.into()),
        }
    }

    /// Build an assistant location message.
    pub fn location(latitude: f64, longitude: f64) -> Self {
        Self {
            role: ReplyRole::Assistant,
            body: ReplyBody::Location {
                latitude,
                longitude,
            },
        }
    }
}

/// Outcome of a dispatched tool call.
///
/// `Context` asks the engine to run one follow-up completion with the
/// given block injected as a system prompt entry; a `None` block means a
/// plain completion over the chat history (used when a tool's gate
/// argument is false).
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReply {
    /// Final messages for the chat; the turn ends after appending them.
    Messages(Vec<ReplyMessage>),
    /// Messages to append now plus an optional context block for one
    /// follow-up completion call.
    Context {
        /// Messages appended before the follow-up runs.
        preamble: Vec<ReplyMessage>,
        /// Context block injected into the follow-up prompt.
        context: Option<String>,
    },
}

impl ToolReply {
    /// A single assistant text message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Messages(vec![ReplyMessage::assistant(text)])
    }

    /// A single system text message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::Messages(vec![ReplyMessage::system(text)])
    }

    /// A follow-up completion with an injected context block.
    pub fn with_context(context: impl Into<String>) -> Self {
        Self::Context {
            preamble: Vec::new(),
            context: Some(context.into()),
        }
    }

    /// A plain completion over the chat history, with nothing injected.
    pub fn plain_completion() -> Self {
        Self::Context {
            preamble: Vec::new(),
            context: None,
        }
    }
}
