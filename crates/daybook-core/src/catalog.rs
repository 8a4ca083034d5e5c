//! Model name resolution and the baseline fallback.

use daybook_config::CredentialsConfig;
use daybook_protocol::{CompletionProvider, ModelDescriptor, ProviderError};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;

/// Display name of the built-in local model.
pub const BASELINE_MODEL_NAME: &str = "Daybook";
/// Provider identifier of the built-in local model.
pub const BASELINE_MODEL_ID: &str = "daybook-local";
/// Display name of the secondary provider's model.
pub const SECONDARY_MODEL_NAME: &str = "Claude";
/// Provider identifier of the secondary provider's model.
pub const SECONDARY_MODEL_ID: &str = "claude-3-5-sonnet-latest";

/// Prefix identifying chat-capable models in the provider's list.
const RECOGNIZED_PREFIX: &str = "gpt";

/// Derived display-name to provider-id lookup.
///
/// Rebuilt whenever the credential set or the provider's model list
/// changes; resolution falls back to the baseline model so a stale
/// preference can never select a model that no longer exists.
pub struct ModelCatalog {
    provider: Arc<dyn CompletionProvider>,
    credentials: RwLock<CredentialsConfig>,
    hidden: Vec<String>,
    models: RwLock<Vec<ModelDescriptor>>,
}

impl ModelCatalog {
    /// Create a catalog holding only the baseline list.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        credentials: CredentialsConfig,
        hidden: Vec<String>,
    ) -> Self {
        let baseline = baseline_models(&credentials);
        Self {
            provider,
            credentials: RwLock::new(credentials),
            hidden,
            models: RwLock::new(baseline),
        }
    }

    /// Rebuild the model list from the provider.
    ///
    /// Without a primary credential this is just the baseline list. A
    /// provider failure keeps the previous list and reports the error.
    pub async fn refresh(&self) -> Result<(), ProviderError> {
        let credentials = self.credentials.read().clone();
        let mut models = baseline_models(&credentials);
        if credentials.has_primary() {
            let listed = self.provider.list_models().await.inspect_err(|err| {
                warn!("model list refresh failed: {err}");
            })?;
            for id in listed {
                if !id.starts_with(RECOGNIZED_PREFIX) {
                    continue;
                }
                if models.iter().any(|known| known.id == id) {
                    continue;
                }
                let name = title_case_id(&id);
                models.push(ModelDescriptor::new(id, name));
            }
        }
        info!("model catalog refreshed (models={})", models.len());
        *self.models.write() = models;
        Ok(())
    }

    /// Replace the credential set and rebuild the catalog.
    pub async fn update_credentials(
        &self,
        credentials: CredentialsConfig,
    ) -> Result<(), ProviderError> {
        *self.credentials.write() = credentials;
        self.refresh().await
    }

    /// Current catalog with hidden models removed.
    pub fn models(&self) -> Vec<ModelDescriptor> {
        self.models
            .read()
            .iter()
            .filter(|model| !self.hidden.contains(&model.name))
            .cloned()
            .collect()
    }

    /// Whether a display name is present in the catalog. Hidden models
    /// count; hiding is a display preference, not a removal.
    pub fn contains(&self, display_name: &str) -> bool {
        self.models
            .read()
            .iter()
            .any(|model| model.name == display_name)
    }

    /// Map a display name to its provider id, falling back to the
    /// baseline id when unmapped.
    pub fn resolve(&self, display_name: &str) -> String {
        let resolved = self
            .models
            .read()
            .iter()
            .find(|model| model.name == display_name)
            .map(|model| model.id.clone());
        match resolved {
            Some(id) => id,
            None => {
                debug!("unmapped model name, using baseline (name={display_name})");
                BASELINE_MODEL_ID.to_string()
            }
        }
    }
}

/// The fixed baseline list for a credential set.
fn baseline_models(credentials: &CredentialsConfig) -> Vec<ModelDescriptor> {
    let mut models = vec![ModelDescriptor::new(BASELINE_MODEL_ID, BASELINE_MODEL_NAME)];
    if credentials.has_secondary() {
        models.push(ModelDescriptor::new(
            SECONDARY_MODEL_ID,
            SECONDARY_MODEL_NAME,
        ));
    }
    models
}

/// Turn a provider id into a display name: `gpt-4o-mini` to `Gpt 4o Mini`.
fn title_case_id(id: &str) -> String {
    id.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{
        BASELINE_MODEL_ID, BASELINE_MODEL_NAME, ModelCatalog, SECONDARY_MODEL_NAME, title_case_id,
    };
    use async_trait::async_trait;
    use daybook_config::CredentialsConfig;
    use daybook_protocol::{ChatRequest, ChatResponse, CompletionProvider, ProviderError};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct ListingProvider {
        ids: Vec<&'static str>,
    }

    #[async_trait]
    impl CompletionProvider for ListingProvider {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            Err(ProviderError::Transport("not wired".to_string()))
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(self.ids.iter().map(|id| id.to_string()).collect())
        }
    }

    fn credentials(primary: Option<&str>, secondary: Option<&str>) -> CredentialsConfig {
        CredentialsConfig {
            openai_api_key: primary.map(str::to_string),
            anthropic_api_key: secondary.map(str::to_string),
        }
    }

    #[test]
    fn title_case_splits_on_dashes() {
        assert_eq!(title_case_id("gpt-4o-mini"), "Gpt 4o Mini");
        assert_eq!(title_case_id("gpt-4"), "Gpt 4");
    }

    #[tokio::test]
    async fn no_credential_keeps_the_baseline_list() {
        let provider = Arc::new(ListingProvider {
            ids: vec!["gpt-4o"],
        });
        let catalog = ModelCatalog::new(provider, credentials(None, Some("sk-ant")), Vec::new());
        catalog.refresh().await.expect("refresh");

        let names: Vec<String> = catalog.models().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec![BASELINE_MODEL_NAME, SECONDARY_MODEL_NAME]);
    }

    #[tokio::test]
    async fn refresh_filters_and_title_cases_provider_models() {
        let provider = Arc::new(ListingProvider {
            ids: vec!["gpt-4o", "gpt-4o-mini", "whisper-1", "dall-e-3"],
        });
        let catalog = ModelCatalog::new(provider, credentials(Some("sk-test"), None), Vec::new());
        catalog.refresh().await.expect("refresh");

        let names: Vec<String> = catalog.models().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec![BASELINE_MODEL_NAME, "Gpt 4o", "Gpt 4o Mini"]);
        assert_eq!(catalog.resolve("Gpt 4o Mini"), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn unmapped_names_resolve_to_the_baseline_id() {
        let provider = Arc::new(ListingProvider { ids: Vec::new() });
        let catalog = ModelCatalog::new(provider, credentials(None, None), Vec::new());
        assert_eq!(catalog.resolve("Gpt 9"), BASELINE_MODEL_ID);
        assert!(catalog.contains(BASELINE_MODEL_NAME));
        assert!(!catalog.contains("Gpt 9"));
    }

    #[tokio::test]
    async fn hidden_models_are_filtered_from_listing() {
        let provider = Arc::new(ListingProvider {
            ids: vec!["gpt-4o"],
        });
        let catalog = ModelCatalog::new(
            provider,
            credentials(Some("sk-test"), None),
            vec!["Gpt 4o".to_string()],
        );
        catalog.refresh().await.expect("refresh");

        let names: Vec<String> = catalog.models().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec![BASELINE_MODEL_NAME]);
        // Hidden models still resolve; hiding is a display preference.
        assert_eq!(catalog.resolve("Gpt 4o"), "gpt-4o");
    }

    #[tokio::test]
    async fn credential_change_rebuilds_the_catalog() {
        let provider = Arc::new(ListingProvider {
            ids: vec!["gpt-4o"],
        });
        let catalog = ModelCatalog::new(provider, credentials(None, None), Vec::new());
        assert_eq!(catalog.models().len(), 1);

        catalog
            .update_credentials(credentials(Some("sk-test"), None))
            .await
            .expect("update");
        let names: Vec<String> = catalog.models().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec![BASELINE_MODEL_NAME, "Gpt 4o"]);
    }
}
