//! Error taxonomy for the session engine.

use crate::archive::ArchiveError;
use daybook_protocol::{ProviderError, ToolError};
use thiserror::Error;

/// Errors raised while running a turn.
///
/// Everything here is caught at the turn boundary and rendered into a
/// single trailing assistant message via [`ChatError::user_message`];
/// none of these crash the session.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Provider rejected the configured credential.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Selected model is missing from the current catalog.
    #[error("model unavailable: {0}")]
    UnavailableModel(String),
    /// Function-call arguments failed to parse or missed required fields.
    #[error("malformed function call: {0}")]
    MalformedFunctionCall(String),
    /// Any other provider failure: non-2xx status, transport, or a
    /// response the engine could not decode.
    #[error("provider error: {0}")]
    Provider(String),
    /// A device integration lacked the required permission.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Unexpected missing field while composing a reply.
    #[error("internal state error: {0}")]
    InternalState(String),
    /// A turn is already in flight for this chat.
    #[error("turn already in flight for {0}")]
    TurnInFlight(String),
    /// Day key is unknown to the engine.
    #[error("unknown chat: {0}")]
    UnknownChat(String),
    /// Chat archive failure.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl ChatError {
    /// User-facing description appended to the chat when a turn fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(_) => {
                "I couldn't reach the model because the credential was rejected. \
                 Please check your API key or enable the built-in key."
                    .to_string()
            }
            Self::PermissionDenied(_) => {
                "I don't have permission to do that on this device. \
                 Please grant access in system settings and try again."
                    .to_string()
            }
            _ => "Something went wrong while answering. Please try again.".to_string(),
        }
    }
}

impl From<ProviderError> for ChatError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Authentication(message) => Self::Authentication(message),
            other => Self::Provider(other.to_string()),
        }
    }
}

impl From<ToolError> for ChatError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::ToolNotFound(name) => {
                Self::MalformedFunctionCall(format!("unknown function: {name}"))
            }
            ToolError::InvalidArguments(message) => Self::MalformedFunctionCall(message),
            ToolError::PermissionDenied(message) => Self::PermissionDenied(message),
            ToolError::ExecutionFailed(message) => Self::InternalState(message),
            ToolError::Provider(provider) => provider.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChatError;
    use daybook_protocol::{ProviderError, ToolError};

    #[test]
    fn provider_auth_failures_keep_their_identity() {
        let err: ChatError = ProviderError::Authentication("bad key".to_string()).into();
        assert!(matches!(err, ChatError::Authentication(_)));
        assert!(err.user_message().contains("API key"));

        let err: ChatError = ProviderError::Status {
            status: 500,
            body: "oops".to_string(),
        }
        .into();
        assert!(matches!(err, ChatError::Provider(_)));
        assert!(err.user_message().contains("try again"));
    }

    #[test]
    fn tool_errors_map_onto_the_taxonomy() {
        let err: ChatError = ToolError::InvalidArguments("missing field".to_string()).into();
        assert!(matches!(err, ChatError::MalformedFunctionCall(_)));

        let err: ChatError = ToolError::PermissionDenied("calendar".to_string()).into();
        assert!(err.user_message().contains("permission"));

        let err: ChatError =
            ToolError::Provider(ProviderError::Authentication("expired".to_string())).into();
        assert!(matches!(err, ChatError::Authentication(_)));
    }
}
