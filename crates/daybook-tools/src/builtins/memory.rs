//! Builtin tools for the memory ledger.

use crate::builtins::utils::parse_args;
use crate::reply::{ReplyMessage, ToolReply};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use daybook_protocol::ToolError;
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

/// Tool appending a memory record.
#[derive(Debug, Default)]
pub struct SaveMemoryTool;

#[async_trait]
impl Tool for SaveMemoryTool {
    fn name(&self) -> &str {
        "saveMemory"
    }

    fn description(&self) -> &str {
        "Save a fact the user asked the assistant to remember"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memoryContent": {
                    "type": "string",
                    "description": "The fact to remember, in the user's words."
                }
            },
            "required": ["memoryContent"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError> {
        let input: SaveMemoryArgs = parse_args(args)?;
        let content = input.memory_content.trim();
        if content.is_empty() {
            return Err(ToolError::InvalidArguments(
                "memoryContent cannot be empty".to_string(),
            ));
        }
        ctx.memory()?
            .append(content)
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        info!("memory saved (content_len={})", content.len());
        Ok(ToolReply::system("Memory saved"))
    }
}

/// Tool recalling saved memories for the current question.
#[derive(Debug, Default)]
pub struct CheckMemoriesTool;

#[async_trait]
impl Tool for CheckMemoriesTool {
    fn name(&self) -> &str {
        "checkMemories"
    }

    fn description(&self) -> &str {
        "Search saved memories relevant to the user's question"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "shouldCheckMemories": {
                    "type": "boolean",
                    "description": "Whether saved memories could answer the question."
                },
                "searchTerms": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Keywords to match against memory contents."
                }
            },
            "required": ["shouldCheckMemories", "searchTerms"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError> {
        let input: CheckMemoriesArgs = parse_args(args)?;
        if !input.should_check_memories {
            return Ok(ToolReply::plain_completion());
        }
        let terms = input.search_terms.into_terms();
        let matches = ctx
            .memory()?
            .search(&terms)
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        info!(
            "memory search (terms={}, matched={})",
            terms.len(),
            matches.len()
        );
        let context = if matches.is_empty() {
            "No saved memories match the user's question.".to_string()
        } else {
            let mut lines = vec!["Saved memories relevant to the user's question:".to_string()];
            for record in &matches {
                lines.push(format!(
                    "- {} (saved {})",
                    record.content,
                    record.timestamp.format("%Y-%m-%d")
                ));
            }
            lines.join("\n")
        };
        Ok(ToolReply::Context {
            preamble: vec![ReplyMessage::system("Accessing memories")],
            context: Some(context),
        })
    }
}

/// Arguments for SaveMemoryTool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveMemoryArgs {
    memory_content: String,
}

/// Arguments for CheckMemoriesTool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckMemoriesArgs {
    should_check_memories: bool,
    search_terms: SearchTerms,
}

/// Search terms as the model sends them: an array, or one string of
/// comma-separated keywords.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchTerms {
    Many(Vec<String>),
    One(String),
}

impl SearchTerms {
    fn into_terms(self) -> Vec<String> {
        match self {
            Self::Many(terms) => terms,
            Self::One(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}
