//! Builtin tools for calendar queries and event creation.

use crate::builtins::utils::{display_time, parse_args, parse_local_datetime, parse_timeframe};
use crate::reply::ToolReply;
use crate::services::{CalendarEvent, NewCalendarEvent};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};
use daybook_config::settings::KEY_DEFAULT_CALENDAR;
use daybook_protocol::ToolError;
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

/// Default event length when the model omits an end date.
const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;

/// Tool answering "what's on my calendar" queries.
#[derive(Debug, Default)]
pub struct CheckCalendarTool;

#[async_trait]
impl Tool for CheckCalendarTool {
    fn name(&self) -> &str {
        "checkCalendar"
    }

    fn description(&self) -> &str {
        "Check the user's calendar for events in a given timeframe"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "isCalendarQuery": {
                    "type": "boolean",
                    "description": "Whether the user is asking about calendar events."
                },
                "timeframe": {
                    "type": "string",
                    "enum": ["today", "tomorrow", "week"],
                    "description": "The period the user is asking about."
                }
            },
            "required": ["isCalendarQuery", "timeframe"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError> {
        let input: CheckCalendarArgs = parse_args(args)?;
        if !input.is_calendar_query {
            return Ok(ToolReply::plain_completion());
        }
        let timeframe = parse_timeframe(&input.timeframe)?;
        let (start, end) = timeframe.range(ctx.now);
        info!(
            "calendar query (timeframe={:?}, start={}, end={})",
            timeframe, start, end
        );
        let events = ctx.calendar()?.events_between(start, end).await?;
        Ok(ToolReply::with_context(format_event_context(
            &events, start, end,
        )))
    }
}

/// Tool creating a calendar event from model-extracted fields.
#[derive(Debug, Default)]
pub struct CreateCalendarEventTool;

#[async_trait]
impl Tool for CreateCalendarEventTool {
    fn name(&self) -> &str {
        "createCalendarEvent"
    }

    fn description(&self) -> &str {
        "Create a calendar event with a title, start, and optional details"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "shouldCreateEvent": {
                    "type": "boolean",
                    "description": "Whether the user asked to create an event."
                },
                "title": {
                    "type": "string",
                    "description": "Event title."
                },
                "startDate": {
                    "type": "string",
                    "description": "Event start, ISO 8601 or YYYY-MM-DD HH:MM."
                },
                "endDate": {
                    "type": "string",
                    "description": "Event end; defaults to one hour after the start."
                },
                "allDay": {
                    "type": "boolean",
                    "description": "Whether the event spans the whole day."
                },
                "calendar": {
                    "type": "string",
                    "description": "Target calendar; the default calendar when omitted."
                },
                "location": {
                    "type": "string",
                    "description": "Event location."
                },
                "notes": {
                    "type": "string",
                    "description": "Event notes."
                }
            },
            "required": ["shouldCreateEvent", "title", "startDate"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError> {
        let input: CreateCalendarEventArgs = parse_args(args)?;
        if !input.should_create_event {
            return Ok(ToolReply::plain_completion());
        }
        let offset = *ctx.now.offset();
        let start = parse_local_datetime(&input.start_date, offset)?;
        let end = match &input.end_date {
            Some(end_date) => parse_local_datetime(end_date, offset)?,
            None => start + Duration::minutes(DEFAULT_EVENT_DURATION_MINUTES),
        };
        if end < start {
            return Err(ToolError::InvalidArguments(
                "event end precedes its start".to_string(),
            ));
        }
        let all_day = input.all_day.unwrap_or(false);
        let (start, end) = shift_past_start(start, end, all_day, ctx.now);

        let calendar = match input.calendar {
            Some(name) => Some(name),
            None => default_calendar(ctx)?,
        };
        let created = ctx
            .calendar()?
            .create_event(NewCalendarEvent {
                title: input.title,
                start,
                end,
                all_day,
                calendar,
                location: input.location,
                notes: input.notes,
            })
            .await?;
        info!(
            "calendar event created (calendar={}, start={})",
            created.calendar, created.start
        );
        let when = if created.all_day {
            format!("all day on {}", created.start.format("%Y-%m-%d"))
        } else {
            display_time(created.start)
        };
        Ok(ToolReply::assistant(format!(
            "Added \"{}\" to {} ({}).",
            created.title, created.calendar, when
        )))
    }
}

/// Tool listing the user's calendars.
#[derive(Debug, Default)]
pub struct ListCalendarsTool;

#[async_trait]
impl Tool for ListCalendarsTool {
    fn name(&self) -> &str {
        "listCalendars"
    }

    fn description(&self) -> &str {
        "List the user's calendars and which one is the default"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn call(&self, ctx: &ToolContext, _args: Value) -> Result<ToolReply, ToolError> {
        let names = ctx.calendar()?.calendar_names().await?;
        if names.is_empty() {
            return Ok(ToolReply::assistant("You have no calendars configured."));
        }
        let default = default_calendar(ctx)?;
        let rendered: Vec<String> = names
            .into_iter()
            .map(|name| {
                if default.as_deref() == Some(name.as_str()) {
                    format!("{name} (default)")
                } else {
                    name
                }
            })
            .collect();
        Ok(ToolReply::assistant(format!(
            "Your calendars: {}.",
            rendered.join(", ")
        )))
    }
}

/// Tool changing the default calendar preference.
#[derive(Debug, Default)]
pub struct SetDefaultCalendarTool;

#[async_trait]
impl Tool for SetDefaultCalendarTool {
    fn name(&self) -> &str {
        "setDefaultCalendar"
    }

    fn description(&self) -> &str {
        "Set which calendar new events go to by default"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "calendarName": {
                    "type": "string",
                    "description": "Name of the calendar to make the default."
                }
            },
            "required": ["calendarName"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError> {
        let input: SetDefaultCalendarArgs = parse_args(args)?;
        let names = ctx.calendar()?.calendar_names().await?;
        let Some(matched) = names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(&input.calendar_name))
        else {
            return Ok(ToolReply::assistant(format!(
                "I couldn't find a calendar named \"{}\". Your calendars: {}.",
                input.calendar_name,
                names.join(", ")
            )));
        };
        ctx.settings()?
            .set(KEY_DEFAULT_CALENDAR, matched)
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        info!("default calendar changed (calendar={matched})");
        Ok(ToolReply::assistant(format!(
            "Default calendar set to {matched}."
        )))
    }
}

/// Arguments for CheckCalendarTool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckCalendarArgs {
    is_calendar_query: bool,
    timeframe: String,
}

/// Arguments for CreateCalendarEventTool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCalendarEventArgs {
    should_create_event: bool,
    title: String,
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    all_day: Option<bool>,
    #[serde(default)]
    calendar: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Arguments for SetDefaultCalendarTool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetDefaultCalendarArgs {
    calendar_name: String,
}

/// Read the default calendar preference when a settings store is wired.
fn default_calendar(ctx: &ToolContext) -> Result<Option<String>, ToolError> {
    let Some(settings) = ctx.services.settings.as_ref() else {
        return Ok(None);
    };
    settings
        .get(KEY_DEFAULT_CALENDAR)
        .map_err(|err| ToolError::ExecutionFailed(err.to_string()))
}

/// Move a timed event whose start already passed to the next calendar
/// day, preserving its time of day and duration.
fn shift_past_start(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    all_day: bool,
    now: DateTime<FixedOffset>,
) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    if all_day || start >= now {
        return (start, end);
    }
    let duration = end - start;
    let shifted_date = now.date_naive() + Duration::days(1);
    let shifted = shifted_date
        .and_time(start.time())
        .and_local_timezone(*now.offset())
        .single()
        .unwrap_or(start);
    (shifted, shifted + duration)
}

/// Render queried events as a context block for the follow-up completion.
fn format_event_context(
    events: &[CalendarEvent],
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> String {
    let window = format!("{} to {}", display_time(start), display_time(end));
    if events.is_empty() {
        return format!("The user's calendar has no events from {window}.");
    }
    let mut lines = vec![format!("The user's calendar from {window}:")];
    for event in events {
        let when = if event.all_day {
            format!("all day on {}", event.start.format("%Y-%m-%d"))
        } else {
            format!("{} to {}", display_time(event.start), display_time(event.end))
        };
        let mut line = format!("- {} ({when}, {})", event.title, event.calendar);
        if let Some(location) = &event.location {
            line.push_str(&format!(" at {location}"));
        }
        lines.push(line);
    }
    lines.join("\n")
}
