//! OpenAI-style HTTP client for the completion and image providers.

use async_trait::async_trait;
use daybook_protocol::{
    ChatRequest, ChatResponse, CompletionProvider, GeneratedImage, ImageProvider, ImageRequest,
    ImageResponse, ProviderError,
};
use log::debug;
use serde::Deserialize;

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Provider model used for image generation.
const IMAGE_MODEL: &str = "dall-e-3";

/// HTTP client for an OpenAI-style API.
///
/// The base URL is overridable so tests can point at a local server.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Create a client against the standard API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// POST a JSON body and decode a JSON response, mapping HTTP status
    /// codes onto the provider error taxonomy.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{path}", self.base_url);
        debug!("provider request (path={path})");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        Self::decode(response).await
    }

    /// Decode a response, mapping non-success statuses.
    async fn decode<R>(response: reqwest::Response) -> Result<R, ProviderError>
    where
        R: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if status.as_u16() == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Authentication(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<R>()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))
    }
}

/// Shape of the `GET /models` response.
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.post_json("chat/completions", &request).await
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let models: ModelsResponse = Self::decode(response).await?;
        Ok(models.data.into_iter().map(|entry| entry.id).collect())
    }
}

#[async_trait]
impl ImageProvider for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let request = ImageRequest::single(IMAGE_MODEL, prompt);
        let response: ImageResponse = self.post_json("images/generations", &request).await?;
        response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("image response carried no data".to_string()))
    }
}
