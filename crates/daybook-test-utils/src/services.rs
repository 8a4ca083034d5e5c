use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use daybook_protocol::{GeneratedImage, ImageProvider, ProviderError, ToolError};
use daybook_tools::{
    CalendarEvent, CalendarService, GeoLocation, LocationService, NewCalendarEvent, Reminder,
    ReminderService,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub fn fixed_clock(
    rfc3339: &str,
) -> Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync> {
    let now = DateTime::parse_from_rfc3339(rfc3339).expect("fixed clock timestamp");
    Arc::new(move || now)
}

/// Calendar fake: serves fixed events and records created ones.
#[derive(Default)]
pub struct StubCalendar {
    events: Vec<CalendarEvent>,
    calendars: Vec<String>,
    pub created: Mutex<Vec<NewCalendarEvent>>,
}

impl StubCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_calendars(mut self, names: &[&str]) -> Self {
        self.calendars = names.iter().map(|name| name.to_string()).collect();
        self
    }
}

#[async_trait]
impl CalendarService for StubCalendar {
    async fn events_between(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<CalendarEvent>, ToolError> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.start < end && event.end > start)
            .cloned()
            .collect())
    }

    async fn create_event(&self, event: NewCalendarEvent) -> Result<CalendarEvent, ToolError> {
        self.created.lock().push(event.clone());
        Ok(CalendarEvent {
            title: event.title,
            start: event.start,
            end: event.end,
            all_day: event.all_day,
            calendar: event.calendar.unwrap_or_else(|| "Personal".to_string()),
            location: event.location,
            notes: event.notes,
        })
    }

    async fn calendar_names(&self) -> Result<Vec<String>, ToolError> {
        Ok(self.calendars.clone())
    }
}

/// Reminders fake serving a fixed list.
#[derive(Default)]
pub struct StubReminders {
    reminders: Vec<Reminder>,
}

impl StubReminders {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        Self { reminders }
    }
}

#[async_trait]
impl ReminderService for StubReminders {
    async fn reminders_between(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<Reminder>, ToolError> {
        Ok(self
            .reminders
            .iter()
            .filter(|reminder| {
                !reminder.completed
                    && reminder
                        .due
                        .is_none_or(|due| due >= start && due < end)
            })
            .cloned()
            .collect())
    }
}

/// Location fake reporting a fixed coordinate.
pub struct StubLocation {
    location: GeoLocation,
}

impl StubLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            location: GeoLocation {
                latitude,
                longitude,
            },
        }
    }
}

#[async_trait]
impl LocationService for StubLocation {
    async fn current(&self) -> Result<GeoLocation, ToolError> {
        Ok(self.location)
    }
}

/// Image fake echoing a fixed URL and revised prompt.
pub struct StubImage {
    url: String,
    revised_prompt: String,
}

impl StubImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            revised_prompt: String::new(),
        }
    }

    pub fn with_revised_prompt(mut self, revised_prompt: impl Into<String>) -> Self {
        self.revised_prompt = revised_prompt.into();
        self
    }
}

#[async_trait]
impl ImageProvider for StubImage {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedImage, ProviderError> {
        Ok(GeneratedImage {
            url: self.url.clone(),
            revised_prompt: self.revised_prompt.clone(),
        })
    }
}
