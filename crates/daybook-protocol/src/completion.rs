//! Completion Provider wire contract: chat completions with function calling.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single message on the wire, role plus text content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireMessage {
    /// Speaker role (`system`, `user`, or `assistant`).
    pub role: String,
    /// Raw text content.
    pub content: String,
}

impl WireMessage {
    /// Build a wire message from role and content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Declarative description of a callable function, sent with every
/// classification request. The `parameters` value is a JSON-Schema-like
/// object with `properties` and `required` entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionSchema {
    /// Function name the model may select.
    pub name: String,
    /// Human-readable description used by the model for selection.
    pub description: String,
    /// JSON schema for the function arguments.
    pub parameters: Value,
}

/// Request body for a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Provider model identifier.
    pub model: String,
    /// Ordered message list forming the prompt.
    pub messages: Vec<WireMessage>,
    /// Function schemas offered for selection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionSchema>>,
    /// Function-call mode; `auto` lets the model choose.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<String>,
}

impl ChatRequest {
    /// Build a plain completion request without function schemas.
    pub fn completion(model: impl Into<String>, messages: Vec<WireMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            functions: None,
            function_call: None,
        }
    }

    /// Build a classification request offering the full schema registry.
    pub fn classification(
        model: impl Into<String>,
        messages: Vec<WireMessage>,
        functions: Vec<FunctionSchema>,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            functions: Some(functions),
            function_call: Some("auto".to_string()),
        }
    }
}

/// Structured function-call request returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCall {
    /// Selected function name.
    pub name: String,
    /// Arguments as a JSON-encoded string.
    pub arguments: String,
}

/// Message payload inside a response choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChoiceMessage {
    /// Text completion content, when the model replied with text.
    #[serde(default)]
    pub content: Option<String>,
    /// Function-call request, when the model selected a function.
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
}

/// A single completion choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatChoice {
    /// Response message for this choice.
    pub message: ChoiceMessage,
}

/// Response body for a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatResponse {
    /// Completion choices; the first is authoritative.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Text content of the first choice, if present.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }

    /// Function-call request of the first choice, if present.
    pub fn function_call(&self) -> Option<&FunctionCall> {
        self.choices
            .first()
            .and_then(|choice| choice.message.function_call.as_ref())
    }
}

/// Remote completion service contract.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run a chat completion and return the provider response.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// List model identifiers available to the configured credential.
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;
}
