//! Provider metadata and enablement rules.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::Capability;

/// Values accepted as "on" for feature-flag environment toggles.
const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];

/// Metadata describing one provider: identity, claimed capabilities,
/// credential mappings, enablement gate, and selection priority.
///
/// Constructed once per provider at startup and replaced wholesale through
/// [`update_provider`]; never partially mutated.
///
/// [`update_provider`]: crate::registry::ProviderRegistry::update_provider
#[derive(Debug, Clone)]
pub struct ProviderMeta {
    /// Unique registry key.
    pub provider_id: String,
    pub display_name: String,
    /// Modalities this provider claims to support.
    pub capabilities: BTreeSet<Capability>,
    /// Logical credential name -> environment variable name.
    pub env_keys: BTreeMap<String, String>,
    /// Environment toggle gating enablement; `None` means always enabled.
    pub feature_flag_env: Option<String>,
    /// Lower sorts first in listings.
    pub priority: i32,
    /// Capability wire name -> default model identifier.
    pub default_models: BTreeMap<String, String>,
}

impl ProviderMeta {
    pub fn new(provider_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            display_name: display_name.into(),
            capabilities: BTreeSet::new(),
            env_keys: BTreeMap::new(),
            feature_flag_env: None,
            priority: 100,
            default_models: BTreeMap::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn with_capabilities(
        mut self,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    pub fn with_env_key(
        mut self,
        logical_name: impl Into<String>,
        env_var: impl Into<String>,
    ) -> Self {
        self.env_keys.insert(logical_name.into(), env_var.into());
        self
    }

    pub fn with_feature_flag(mut self, env_var: impl Into<String>) -> Self {
        self.feature_flag_env = Some(env_var.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_default_model(
        mut self,
        capability: Capability,
        model: impl Into<String>,
    ) -> Self {
        self.default_models
            .insert(capability.as_str().to_string(), model.into());
        self
    }

    /// Whether this provider claims the given capability.
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Default model identifier declared for a capability, if any.
    pub fn default_model(&self, capability: Capability) -> Option<&str> {
        self.default_models
            .get(capability.as_str())
            .map(String::as_str)
    }

    /// Whether the provider is currently enabled.
    ///
    /// Re-evaluated from the environment on every call so tests can toggle
    /// flags between calls. With no flag configured the provider is always
    /// enabled.
    pub fn is_enabled(&self) -> bool {
        match &self.feature_flag_env {
            None => true,
            Some(env_var) => std::env::var(env_var)
                .map(|value| TRUTHY.contains(&value.to_lowercase().as_str()))
                .unwrap_or(false),
        }
    }

    /// Whether at least one credential mapping is declared.
    pub fn requires_credentials(&self) -> bool {
        !self.env_keys.is_empty()
    }
}
