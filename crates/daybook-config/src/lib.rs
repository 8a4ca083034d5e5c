//! Configuration models and preference storage for Daybook.
//!
//! This crate owns the config schema, file loading, and the small durable
//! key/value settings store read by the engine at startup.

mod error;
mod loader;
mod model;
pub mod settings;

/// Public error type returned by config loading and settings APIs.
pub use error::ConfigError;
/// Config file loading helpers.
pub use loader::load_config;
/// Configuration schema models.
pub use model::*;
/// Durable key/value preference store.
pub use settings::{FileSettingsStore, SettingsStore};
