//! Builtin tools, one module per dispatch tag.

mod calendar;
mod image;
mod location;
mod memory;
mod recall;
mod reminders;
mod utils;

pub use calendar::{
    CheckCalendarTool, CreateCalendarEventTool, ListCalendarsTool, SetDefaultCalendarTool,
};
pub use image::GenerateImageTool;
pub use location::CurrentLocationTool;
pub use memory::{CheckMemoriesTool, SaveMemoryTool};
pub use recall::CheckPreviousResponseTool;
pub use reminders::CheckRemindersTool;

use crate::registry::ToolRegistry;
use std::sync::Arc;

/// Register every builtin tool in the given registry.
pub fn register_builtin_tools(registry: &ToolRegistry) {
    registry.register(Arc::new(CheckCalendarTool));
    registry.register(Arc::new(CreateCalendarEventTool));
    registry.register(Arc::new(ListCalendarsTool));
    registry.register(Arc::new(SetDefaultCalendarTool));
    registry.register(Arc::new(CheckRemindersTool));
    registry.register(Arc::new(GenerateImageTool));
    registry.register(Arc::new(CheckPreviousResponseTool));
    registry.register(Arc::new(SaveMemoryTool));
    registry.register(Arc::new(CheckMemoriesTool));
    registry.register(Arc::new(CurrentLocationTool));
}
