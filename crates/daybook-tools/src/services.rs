//! Device integration interfaces for calendar, reminders, and location.
//!
//! Implementations live outside the engine (platform bindings in the
//! application, fakes in tests). Permission failures surface as
//! `ToolError::PermissionDenied`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use daybook_protocol::ToolError;

/// A calendar event as reported or created by the calendar integration.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    /// Event title.
    pub title: String,
    /// Event start.
    pub start: DateTime<FixedOffset>,
    /// Event end.
    pub end: DateTime<FixedOffset>,
    /// Whether the event spans whole days.
    pub all_day: bool,
    /// Owning calendar name.
    pub calendar: String,
    /// Optional location text.
    pub location: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// A calendar event to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendarEvent {
    /// Event title.
    pub title: String,
    /// Event start.
    pub start: DateTime<FixedOffset>,
    /// Event end.
    pub end: DateTime<FixedOffset>,
    /// Whether the event spans whole days.
    pub all_day: bool,
    /// Target calendar name; the integration's default when absent.
    pub calendar: Option<String>,
    /// Optional location text.
    pub location: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// A reminder as reported by the reminders integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    /// Reminder title.
    pub title: String,
    /// Optional due instant.
    pub due: Option<DateTime<FixedOffset>>,
    /// Optional notes.
    pub notes: Option<String>,
    /// Owning list name.
    pub list: String,
    /// Whether the reminder is completed.
    pub completed: bool,
}

impl Reminder {
    /// Whether the filter text appears in the title, notes, or list name,
    /// ignoring case.
    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.list.to_lowercase().contains(&needle)
            || self
                .notes
                .as_ref()
                .is_some_and(|notes| notes.to_lowercase().contains(&needle))
    }
}

/// A geographic coordinate from the location integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Query window the classification model may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    /// The current calendar day.
    Today,
    /// The next calendar day.
    Tomorrow,
    /// Seven days starting today.
    Week,
}

impl Timeframe {
    /// Parse a timeframe argument, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "today" => Some(Self::Today),
            "tomorrow" => Some(Self::Tomorrow),
            "week" => Some(Self::Week),
            _ => None,
        }
    }

    /// Resolve the half-open `[start, end)` range for this timeframe
    /// relative to the given local instant.
    pub fn range(
        &self,
        now: DateTime<FixedOffset>,
    ) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        let midnight = now
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_local_timezone(*now.offset())
            .single()
            .unwrap_or(now);
        match self {
            Self::Today => (midnight, midnight + Duration::days(1)),
            Self::Tomorrow => (midnight + Duration::days(1), midnight + Duration::days(2)),
            Self::Week => (midnight, midnight + Duration::days(7)),
        }
    }
}

#[async_trait]
/// Calendar integration used by the calendar tools.
pub trait CalendarService: Send + Sync {
    /// Events overlapping the half-open `[start, end)` range.
    async fn events_between(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<CalendarEvent>, ToolError>;

    /// Create an event, returning it as stored.
    async fn create_event(&self, event: NewCalendarEvent) -> Result<CalendarEvent, ToolError>;

    /// Names of the user's calendars.
    async fn calendar_names(&self) -> Result<Vec<String>, ToolError>;
}

#[async_trait]
/// Reminders integration used by the reminder tools.
pub trait ReminderService: Send + Sync {
    /// Incomplete reminders due in the half-open `[start, end)` range,
    /// plus reminders with no due date.
    async fn reminders_between(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<Reminder>, ToolError>;
}

#[async_trait]
/// Location integration used by the location tool.
pub trait LocationService: Send + Sync {
    /// The device's current coordinate.
    async fn current(&self) -> Result<GeoLocation, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::{Reminder, Timeframe};
    use chrono::{DateTime, FixedOffset};
    use pretty_assertions::assert_eq;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).expect("timestamp")
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Timeframe::parse("Today"), Some(Timeframe::Today));
        assert_eq!(Timeframe::parse(" WEEK "), Some(Timeframe::Week));
        assert_eq!(Timeframe::parse("fortnight"), None);
    }

    #[test]
    fn tomorrow_range_covers_the_next_calendar_day() {
        let now = at("2024-05-01T15:30:00+02:00");
        let (start, end) = Timeframe::Tomorrow.range(now);
        assert_eq!(start, at("2024-05-02T00:00:00+02:00"));
        assert_eq!(end, at("2024-05-03T00:00:00+02:00"));
    }

    #[test]
    fn week_range_starts_today_and_spans_seven_days() {
        let now = at("2024-05-01T09:00:00-05:00");
        let (start, end) = Timeframe::Week.range(now);
        assert_eq!(start, at("2024-05-01T00:00:00-05:00"));
        assert_eq!(end, at("2024-05-08T00:00:00-05:00"));
    }

    #[test]
    fn reminder_filter_checks_title_notes_and_list() {
        let reminder = Reminder {
            title: "Buy groceries".to_string(),
            due: None,
            notes: Some("milk and eggs".to_string()),
            list: "Errands".to_string(),
            completed: false,
        };
        assert!(reminder.matches_filter("GROCERIES"));
        assert!(reminder.matches_filter("eggs"));
        assert!(reminder.matches_filter("errands"));
        assert!(reminder.matches_filter(""));
        assert!(!reminder.matches_filter("work"));
    }
}
