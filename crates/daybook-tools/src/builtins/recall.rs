//! Builtin tool resolving references to an earlier assistant reply.

use crate::builtins::utils::parse_args;
use crate::context::HistoryEntry;
use crate::reply::ToolReply;
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use daybook_protocol::ToolError;
use serde::Deserialize;
use serde_json::{Value, json};

/// How far back a "that"/"it" reference may reach: three turns.
const LOOKBACK_MESSAGES: usize = 6;

/// Tool re-grounding a follow-up question in a previous reply.
#[derive(Debug, Default)]
pub struct CheckPreviousResponseTool;

#[async_trait]
impl Tool for CheckPreviousResponseTool {
    fn name(&self) -> &str {
        "checkPreviousResponse"
    }

    fn description(&self) -> &str {
        "Resolve a reference to something the assistant said earlier"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "isPreviousReference": {
                    "type": "boolean",
                    "description": "Whether the user is referring to an earlier reply."
                },
                "referenceType": {
                    "type": "string",
                    "enum": ["text", "image"],
                    "description": "Whether the reference is to text or a generated image."
                }
            },
            "required": ["isPreviousReference"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError> {
        let input: CheckPreviousResponseArgs = parse_args(args)?;
        if !input.is_previous_reference {
            return Ok(ToolReply::plain_completion());
        }
        let Some(previous) = last_assistant_entry(&ctx.history) else {
            return Ok(ToolReply::assistant(
                "I'm not sure which earlier reply you mean. Could you say a bit more about it?",
            ));
        };
        let referent = if input.reference_type.as_deref() == Some("image") {
            previous
                .revised_prompt
                .as_deref()
                .unwrap_or(previous.content.as_str())
        } else {
            previous.content.as_str()
        };
        Ok(ToolReply::with_context(format!(
            "The user is referring to this previous response:\n{referent}"
        )))
    }
}

/// Arguments for CheckPreviousResponseTool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckPreviousResponseArgs {
    is_previous_reference: bool,
    #[serde(default)]
    reference_type: Option<String>,
}

/// The most recent assistant message within the lookback window. The
/// history ends with the question being classified right now, so a
/// trailing user entry does not count against the window.
fn last_assistant_entry(history: &[HistoryEntry]) -> Option<&HistoryEntry> {
    let prior = match history.last() {
        Some(entry) if entry.role == "user" => &history[..history.len() - 1],
        _ => history,
    };
    prior
        .iter()
        .rev()
        .take(LOOKBACK_MESSAGES)
        .find(|entry| entry.role == "assistant")
}

#[cfg(test)]
mod tests {
    use super::CheckPreviousResponseTool;
    use crate::context::{HistoryEntry, ToolContext, TurnServices};
    use crate::reply::ToolReply;
    use crate::tool::Tool;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn context_with(history: Vec<HistoryEntry>) -> ToolContext {
        let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").expect("timestamp");
        ToolContext::new(now, Arc::new(TurnServices::default())).with_history(history)
    }

    #[tokio::test]
    async fn injects_the_most_recent_assistant_reply() {
        let ctx = context_with(vec![
            HistoryEntry::new("assistant", "older answer"),
            HistoryEntry::new("user", "thanks"),
            HistoryEntry::new("assistant", "You have two meetings tomorrow."),
            HistoryEntry::new("user", "move the first one"),
        ]);
        let reply = CheckPreviousResponseTool
            .call(&ctx, json!({ "isPreviousReference": true }))
            .await
            .expect("reply");
        match reply {
            ToolReply::Context { context, .. } => {
                let context = context.expect("context block");
                assert!(context.contains("two meetings tomorrow"));
                assert!(!context.contains("older answer"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn image_references_use_the_revised_prompt() {
        let mut image_entry = HistoryEntry::new(
            "assistant",
            "<img src=https://img.example/1.png data-revised-prompt=a quiet harbor>",
        );
        image_entry.revised_prompt = Some("a quiet harbor".to_string());
        let ctx = context_with(vec![image_entry, HistoryEntry::new("user", "make it stormy")]);

        let reply = CheckPreviousResponseTool
            .call(
                &ctx,
                json!({ "isPreviousReference": true, "referenceType": "image" }),
            )
            .await
            .expect("reply");
        match reply {
            ToolReply::Context { context, .. } => {
                let context = context.expect("context block");
                assert!(context.ends_with("a quiet harbor"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_recent_assistant_reply_asks_for_clarification() {
        let ctx = context_with(vec![HistoryEntry::new("user", "what about that?")]);
        let reply = CheckPreviousResponseTool
            .call(&ctx, json!({ "isPreviousReference": true }))
            .await
            .expect("reply");
        match reply {
            ToolReply::Messages(messages) => assert_eq!(messages.len(), 1),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn the_window_counts_from_before_the_current_question() {
        let mut history = vec![HistoryEntry::new("assistant", "Try the park for the picnic.")];
        for _ in 0..2 {
            history.push(HistoryEntry::new("user", "filler"));
            history.push(HistoryEntry::new("system", "notice"));
        }
        history.push(HistoryEntry::new("system", "notice"));
        history.push(HistoryEntry::new("user", "what about that idea?"));
        let ctx = context_with(history);

        let reply = CheckPreviousResponseTool
            .call(&ctx, json!({ "isPreviousReference": true }))
            .await
            .expect("reply");
        match reply {
            ToolReply::Context { context, .. } => {
                let context = context.expect("context block");
                assert!(context.contains("park for the picnic"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn replies_outside_the_lookback_window_are_ignored() {
        let mut history = vec![HistoryEntry::new("assistant", "ancient answer")];
        for _ in 0..3 {
            history.push(HistoryEntry::new("user", "filler"));
            history.push(HistoryEntry::new("system", "notice"));
        }
        let ctx = context_with(history);
        let reply = CheckPreviousResponseTool
            .call(&ctx, json!({ "isPreviousReference": true }))
            .await
            .expect("reply");
        assert!(matches!(reply, ToolReply::Messages(_)));
    }
}
