//! Builtin tool for reminder queries.

use crate::builtins::utils::{display_time, parse_args, parse_timeframe};
use crate::reply::ToolReply;
use crate::services::Reminder;
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use daybook_protocol::ToolError;
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

/// Tool answering "what do I need to do" queries.
#[derive(Debug, Default)]
pub struct CheckRemindersTool;

#[async_trait]
impl Tool for CheckRemindersTool {
    fn name(&self) -> &str {
        "checkReminders"
    }

    fn description(&self) -> &str {
        "Check the user's reminders for a given timeframe"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "isReminderQuery": {
                    "type": "boolean",
                    "description": "Whether the user is asking about reminders."
                },
                "timeframe": {
                    "type": "string",
                    "enum": ["today", "tomorrow", "week"],
                    "description": "The period the user is asking about."
                },
                "listType": {
                    "type": "string",
                    "description": "Optional filter matched against reminder titles, notes, and list names."
                }
            },
            "required": ["isReminderQuery", "timeframe"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError> {
        let input: CheckRemindersArgs = parse_args(args)?;
        if !input.is_reminder_query {
            return Ok(ToolReply::plain_completion());
        }
        let timeframe = parse_timeframe(&input.timeframe)?;
        let (start, end) = timeframe.range(ctx.now);
        let mut reminders = ctx.reminders()?.reminders_between(start, end).await?;
        if let Some(filter) = &input.list_type {
            reminders.retain(|reminder| reminder.matches_filter(filter));
        }
        info!(
            "reminder query (timeframe={:?}, matched={})",
            timeframe,
            reminders.len()
        );
        Ok(ToolReply::with_context(format_reminder_context(
            &reminders,
            &input.timeframe,
        )))
    }
}

/// Arguments for CheckRemindersTool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckRemindersArgs {
    is_reminder_query: bool,
    timeframe: String,
    #[serde(default)]
    list_type: Option<String>,
}

/// Render queried reminders as a context block.
fn format_reminder_context(reminders: &[Reminder], timeframe: &str) -> String {
    if reminders.is_empty() {
        return format!("The user has no reminders for {timeframe}.");
    }
    let mut lines = vec![format!("The user's reminders for {timeframe}:")];
    for reminder in reminders {
        let mut line = format!("- {} ({})", reminder.title, reminder.list);
        if let Some(due) = reminder.due {
            line.push_str(&format!(", due {}", display_time(due)));
        }
        if let Some(notes) = &reminder.notes {
            line.push_str(&format!(": {notes}"));
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::CheckRemindersTool;
    use crate::context::{ToolContext, TurnServices};
    use crate::reply::ToolReply;
    use crate::services::{Reminder, ReminderService};
    use crate::tool::Tool;
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset};
    use daybook_protocol::ToolError;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).expect("timestamp")
    }

    fn reminder(title: &str, list: &str, notes: Option<&str>) -> Reminder {
        Reminder {
            title: title.to_string(),
            due: None,
            notes: notes.map(str::to_string),
            list: list.to_string(),
            completed: false,
        }
    }

    #[derive(Default)]
    struct StubReminders {
        reminders: Vec<Reminder>,
        queried: Mutex<Vec<(DateTime<FixedOffset>, DateTime<FixedOffset>)>>,
    }

    #[async_trait]
    impl ReminderService for StubReminders {
        async fn reminders_between(
            &self,
            start: DateTime<FixedOffset>,
            end: DateTime<FixedOffset>,
        ) -> Result<Vec<Reminder>, ToolError> {
            self.queried.lock().push((start, end));
            Ok(self.reminders.clone())
        }
    }

    fn context_with(service: Arc<StubReminders>) -> ToolContext {
        let services = TurnServices {
            reminders: Some(service),
            ..TurnServices::default()
        };
        ToolContext::new(at("2024-05-01T12:00:00+02:00"), Arc::new(services))
    }

    #[tokio::test]
    async fn list_type_filters_by_substring() {
        let service = Arc::new(StubReminders {
            reminders: vec![
                reminder("Buy milk", "Errands", None),
                reminder("Finish report", "Work", Some("quarterly numbers")),
            ],
            ..StubReminders::default()
        });
        let ctx = context_with(service.clone());

        let reply = CheckRemindersTool
            .call(
                &ctx,
                json!({
                    "isReminderQuery": true,
                    "timeframe": "week",
                    "listType": "work"
                }),
            )
            .await
            .expect("reply");

        let queries = service.queried.lock();
        assert_eq!(queries[0].0, at("2024-05-01T00:00:00+02:00"));
        assert_eq!(queries[0].1, at("2024-05-08T00:00:00+02:00"));

        match reply {
            ToolReply::Context { context, .. } => {
                let context = context.expect("context block");
                assert!(context.contains("Finish report"));
                assert!(!context.contains("Buy milk"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn gate_false_is_a_plain_completion() {
        let service = Arc::new(StubReminders::default());
        let ctx = context_with(service.clone());
        let reply = CheckRemindersTool
            .call(
                &ctx,
                json!({ "isReminderQuery": false, "timeframe": "today" }),
            )
            .await
            .expect("reply");
        assert_eq!(reply, ToolReply::plain_completion());
        assert!(service.queried.lock().is_empty());
    }
}
