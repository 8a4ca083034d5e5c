//! Test helpers shared across Daybook crates.

pub mod events;
pub mod llm;
pub mod services;

pub use events::RecordingSink;
pub use llm::{
    FailingProvider, ScriptedProvider, empty_response, function_call_response, text_response,
};
pub use services::{StubCalendar, StubImage, StubLocation, StubReminders, fixed_clock};
