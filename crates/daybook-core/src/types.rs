//! Chat and message models.

use chrono::{DateTime, FixedOffset};

/// Prefix of the system notice recorded when the active model changes.
const MODEL_SWITCH_PREFIX: &str = "Model switched to ";

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Engine or tool notice.
    System,
    /// User-authored message.
    User,
    /// Model-authored message.
    Assistant,
}

impl Role {
    /// Wire and blob name for the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse a role name from a blob header.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// Message body: free text or a location payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
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

/// One message in a chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Message role.
    pub role: Role,
    /// Message body.
    pub body: MessageBody,
}

impl Message {
    /// Build a text message.
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            body: MessageBody::Text(content.into()),
        }
    }

    /// Build a user text message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Build an assistant text message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Build a system text message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// Build an assistant location message.
    pub fn location(latitude: f64, longitude: f64) -> Self {
        Self {
            role: Role::Assistant,
            body: MessageBody::Location {
                latitude,
                longitude,
            },
        }
    }

    /// Render the body as blob and prompt text.
    ///
    /// Locations are encoded on one line so the sectioned blob format
    /// stays textual and round-trips exactly.
    pub fn rendered(&self) -> String {
        match &self.body {
            MessageBody::Text(text) => text.clone(),
            MessageBody::Location {
                latitude,
                longitude,
            } => format!("<location latitude={latitude} longitude={longitude}>"),
        }
    }

    /// Rebuild a message from a role and rendered body.
    pub fn from_rendered(role: Role, rendered: &str) -> Self {
        if let Some(body) = parse_location(rendered) {
            return Self { role, body };
        }
        Self::text(role, rendered)
    }

    /// The revised prompt embedded in an inline image reference, if any.
    pub fn image_revised_prompt(&self) -> Option<String> {
        let MessageBody::Text(text) = &self.body else {
            return None;
        };
        let text = text.strip_suffix('>')?;
        text.strip_prefix("<img src=")?
            .split_once(" data-revised-prompt=")
            .map(|(_, prompt)| prompt.to_string())
    }
}

/// Parse a single-line location encoding.
fn parse_location(rendered: &str) -> Option<MessageBody> {
    let inner = rendered
        .strip_prefix("<location latitude=")?
        .strip_suffix('>')?;
    let (latitude, longitude) = inner.split_once(" longitude=")?;
    Some(MessageBody::Location {
        latitude: latitude.parse().ok()?,
        longitude: longitude.parse().ok()?,
    })
}

/// A day's conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Chat {
    /// Day key, `YYYY-MM-DD` in the configured offset.
    pub day: String,
    /// Display title.
    pub title: String,
    /// Display name of the model active when the chat was created.
    pub model: String,
    /// Ordered messages, oldest first.
    pub messages: Vec<Message>,
}

impl Chat {
    /// Create an empty chat for a local date.
    pub fn for_date(date: DateTime<FixedOffset>, model: impl Into<String>) -> Self {
        Self {
            day: day_key(date),
            title: date.format("%B %-d, %Y").to_string(),
            model: model.into(),
            messages: Vec::new(),
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Record a model switch, replacing a trailing switch notice rather
    /// than stacking a second one.
    pub fn note_model_switch(&mut self, model_name: &str) {
        self.model = model_name.to_string();
        let notice = Message::system(format!("{MODEL_SWITCH_PREFIX}{model_name}"));
        if let Some(last) = self.messages.last_mut()
            && last.role == Role::System
            && matches!(&last.body, MessageBody::Text(text) if text.starts_with(MODEL_SWITCH_PREFIX))
        {
            *last = notice;
            return;
        }
        self.messages.push(notice);
    }
}

/// Compute the `YYYY-MM-DD` day key for a local instant.
pub fn day_key(date: DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%d").to_string()
}
