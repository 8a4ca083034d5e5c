//! Configuration schema for Daybook.

use serde::{Deserialize, Serialize};

/// Root config for the Daybook engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DaybookConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub timezone: TimezoneConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl DaybookConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> DaybookConfigBuilder {
        DaybookConfigBuilder::new()
    }
}

/// Builder for assembling a `DaybookConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct DaybookConfigBuilder {
    config: DaybookConfig,
}

impl DaybookConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: DaybookConfig::default(),
        }
    }

    /// Replace the model preferences.
    pub fn models(mut self, models: ModelsConfig) -> Self {
        self.config.models = models;
        self
    }

    /// Replace the time zone configuration.
    pub fn timezone(mut self, timezone: TimezoneConfig) -> Self {
        self.config.timezone = timezone;
        self
    }

    /// Replace the provider credentials.
    pub fn credentials(mut self, credentials: CredentialsConfig) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// Replace the storage paths.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Finalize and return the built `DaybookConfig`.
    pub fn build(self) -> DaybookConfig {
        self.config
    }
}

/// Model selection preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Display name of the model used for new chats.
    #[serde(default = "default_model_name")]
    pub default_model: String,
    /// Display names hidden from the model picker.
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default_model: default_model_name(),
            hidden: Vec::new(),
        }
    }
}

/// Display name of the built-in local model.
fn default_model_name() -> String {
    "Daybook".to_string()
}

/// Time zone used to compute calendar-day keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TimezoneConfig {
    /// Offset from UTC in minutes; positive is east of UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Provider credentials. Presence of a key enables the provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CredentialsConfig {
    /// Primary Completion Provider API key.
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Secondary provider API key.
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
}

impl CredentialsConfig {
    /// Whether the primary provider credential is configured.
    pub fn has_primary(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Whether the secondary provider credential is configured.
    pub fn has_secondary(&self) -> bool {
        self.anthropic_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Durable storage locations for the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory holding one chat blob per day.
    #[serde(default)]
    pub chats_path: Option<String>,
    /// Path of the memory ledger blob.
    #[serde(default)]
    pub memory_path: Option<String>,
    /// Path of the settings blob.
    #[serde(default)]
    pub settings_path: Option<String>,
}
