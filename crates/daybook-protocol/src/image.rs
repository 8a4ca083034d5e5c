//! Image Generation Provider wire contract.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body for an image generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRequest {
    /// Provider model identifier.
    pub model: String,
    /// Text prompt to render.
    pub prompt: String,
    /// Number of images requested.
    pub n: u8,
    /// Output size, e.g. `1024x1024`.
    pub size: String,
}

impl ImageRequest {
    /// Build a single-image request with the standard size.
    pub fn single(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            n: 1,
            size: "1024x1024".to_string(),
        }
    }
}

/// One generated image: URL plus the provider-revised prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedImage {
    /// URL of the rendered image.
    pub url: String,
    /// Prompt as rewritten by the provider.
    #[serde(default)]
    pub revised_prompt: String,
}

/// Response body for an image generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ImageResponse {
    /// Generated images; the first is authoritative.
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
}

/// Remote image generation service contract.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Render a prompt and return the first generated image.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::{ImageRequest, ImageResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn single_request_uses_standard_shape() {
        let request = ImageRequest::single("dall-e-3", "a quiet harbor at dawn");
        let encoded = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            encoded,
            json!({
                "model": "dall-e-3",
                "prompt": "a quiet harbor at dawn",
                "n": 1,
                "size": "1024x1024",
            })
        );
    }

    #[test]
    fn response_tolerates_missing_revised_prompt() {
        let body = json!({ "data": [{ "url": "https://img.example/1.png" }] });
        let response: ImageResponse = serde_json::from_value(body).expect("deserialize");
        assert_eq!(response.data[0].url, "https://img.example/1.png");
        assert_eq!(response.data[0].revised_prompt, "");
    }
}
