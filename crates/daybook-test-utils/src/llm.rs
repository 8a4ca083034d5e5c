use async_trait::async_trait;
use daybook_protocol::{
    ChatChoice, ChatRequest, ChatResponse, ChoiceMessage, CompletionProvider, FunctionCall,
    ProviderError,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

pub fn text_response(text: impl Into<String>) -> ChatResponse {
    ChatResponse {
        choices: vec![ChatChoice {
            message: ChoiceMessage {
                content: Some(text.into()),
                function_call: None,
            },
        }],
    }
}

pub fn function_call_response(
    name: impl Into<String>,
    arguments: impl Into<String>,
) -> ChatResponse {
    ChatResponse {
        choices: vec![ChatChoice {
            message: ChoiceMessage {
                content: None,
                function_call: Some(FunctionCall {
                    name: name.into(),
                    arguments: arguments.into(),
                }),
            },
        }],
    }
}

pub fn empty_response() -> ChatResponse {
    ChatResponse::default()
}

/// Replies with queued responses in order, falling back to a fixed text
/// completion once the queue is drained. Every request is recorded.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<VecDeque<Result<ChatResponse, ProviderError>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    models: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(self, models: &[&str]) -> Self {
        *self.models.lock() = models.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn push_response(&self, response: ChatResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    pub fn push_error(&self, error: ProviderError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("mock completion")))
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.models.lock().clone())
    }
}

/// Fails every call with an authentication error.
#[derive(Clone)]
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        Err(ProviderError::Authentication(self.message.clone()))
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Authentication(self.message.clone()))
    }
}
