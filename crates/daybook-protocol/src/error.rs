//! Error types shared across the provider and tool contracts.

use thiserror::Error;

/// Errors returned by remote providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential was rejected by the provider.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Provider returned a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// Provider response could not be decoded.
    #[error("malformed provider response: {0}")]
    Malformed(String),
    /// Request could not reach the provider.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors returned by tools and the dispatcher.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Function name was not found in the registry.
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    /// Arguments failed to parse or missed required fields.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// Tool execution failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    /// A device integration lacked the required permission.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// A provider call made by the tool failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
