//! Function-calling tools for the Daybook chat engine.
//!
//! Each tool the classification model may select is a [`Tool`]
//! implementation registered in a [`ToolRegistry`]; the
//! [`FunctionDispatcher`] validates provider-returned calls against the
//! registered schemas before running them.

pub mod builtins;
pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod reply;
pub mod services;
pub mod tool;

/// Builtin tool registration.
pub use builtins::register_builtin_tools;
/// Tool execution context and shared turn services.
pub use context::{HistoryEntry, ToolContext, TurnServices};
/// Validating dispatcher over the registry.
pub use dispatcher::FunctionDispatcher;
/// Tool registry.
pub use registry::ToolRegistry;
/// Tool reply model.
pub use reply::{ReplyBody, ReplyMessage, ReplyRole, ToolReply};
/// Device integration interfaces.
pub use services::{
    CalendarEvent, CalendarService, GeoLocation, LocationService, NewCalendarEvent, Reminder,
    ReminderService, Timeframe,
};
/// Tool interface.
pub use tool::Tool;
