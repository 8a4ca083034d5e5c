//! Builtin tool for image generation requests.

use crate::builtins::utils::parse_args;
use crate::reply::ToolReply;
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use daybook_protocol::ToolError;
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

/// Tool rendering an image when the user asked for one.
///
/// A false gate means the classification model decided the message was a
/// normal request after all; the turn falls through to a plain
/// completion.
#[derive(Debug, Default)]
pub struct GenerateImageTool;

#[async_trait]
impl Tool for GenerateImageTool {
    fn name(&self) -> &str {
        "generateDallEImage"
    }

    fn description(&self) -> &str {
        "Generate an image from a text prompt when the user asks for one"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "shouldGenerateImage": {
                    "type": "boolean",
                    "description": "Whether the user asked for an image."
                },
                "imagePrompt": {
                    "type": "string",
                    "description": "Prompt describing the image to render."
                }
            },
            "required": ["shouldGenerateImage"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError> {
        let input: GenerateImageArgs = parse_args(args)?;
        if !input.should_generate_image {
            return Ok(ToolReply::plain_completion());
        }
        let prompt = input
            .image_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("imagePrompt is required to generate an image".to_string())
            })?;
        info!("image generation (prompt_len={})", prompt.len());
        let image = ctx.image()?.generate(prompt).await?;
        let revised = if image.revised_prompt.is_empty() {
            prompt
        } else {
            image.revised_prompt.as_str()
        };
        Ok(ToolReply::assistant(format!(
            "<img src={} data-revised-prompt={revised}>",
            image.url
        )))
    }
}

/// Arguments for GenerateImageTool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateImageArgs {
    should_generate_image: bool,
    #[serde(default)]
    image_prompt: Option<String>,
}
