//! Provider registry and adapter dispatch.
//!
//! The registry owns two tables: provider metadata keyed by id, and adapter
//! factories keyed by `(provider, capability)`. It is populated once at
//! startup by the provider modules and read many times by request-handling
//! code; each table sits behind its own `RwLock` so lookups never block each
//! other and never block adapter dispatch.
//!
//! Prefer an explicitly constructed [`ProviderRegistry`] wired through your
//! own composition code; [`global_registry`] exists only for the outermost
//! composition point of an application.

mod factory;
mod meta;

pub use factory::{AdapterFactory, placeholder_factory};
pub use meta::ProviderMeta;

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::error::GenError;
use crate::traits::{
    Adapter, AudioGeneration, ImageGeneration, SpeechSynthesis, TextGeneration, VideoGeneration,
};
use crate::types::Capability;

/// Holds provider definitions and adapter factories.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, ProviderMeta>>,
    factories: RwLock<HashMap<(String, Capability), AdapterFactory>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in (feature-enabled) provider registered.
    pub fn with_builtin_providers() -> Self {
        let registry = Self::new();
        if let Err(error) = crate::providers::register_builtin_providers(&registry) {
            // Built-in wiring failures are startup-ordering bugs; keep
            // whatever did register but say so loudly.
            tracing::error!(%error, "failed to register built-in providers");
        }
        registry
    }

    /// Insert provider metadata, failing if the id is already present.
    pub fn register_provider(&self, meta: ProviderMeta) -> Result<(), GenError> {
        let mut providers = self.providers.write().map_err(|_| poisoned())?;
        if providers.contains_key(&meta.provider_id) {
            return Err(GenError::DuplicateProvider(meta.provider_id.clone()));
        }
        tracing::debug!(provider_id = %meta.provider_id, "registered provider");
        providers.insert(meta.provider_id.clone(), meta);
        Ok(())
    }

    /// Unconditional upsert: replaces any prior metadata for the id.
    ///
    /// Used to recover from a failed [`register_provider`] during idempotent
    /// module (re-)initialization.
    ///
    /// [`register_provider`]: ProviderRegistry::register_provider
    pub fn update_provider(&self, meta: ProviderMeta) -> Result<(), GenError> {
        let mut providers = self.providers.write().map_err(|_| poisoned())?;
        tracing::debug!(provider_id = %meta.provider_id, "updated provider");
        providers.insert(meta.provider_id.clone(), meta);
        Ok(())
    }

    /// Snapshot of the metadata registered for a provider id.
    pub fn get_provider(&self, provider_id: &str) -> Result<ProviderMeta, GenError> {
        self.providers
            .read()
            .map_err(|_| poisoned())?
            .get(provider_id)
            .cloned()
            .ok_or_else(|| GenError::UnknownProvider(provider_id.to_string()))
    }

    /// Bind a factory for `(provider_id, capability)`.
    ///
    /// The provider's metadata must already be registered. Rebinding an
    /// existing pair wins over the previous factory — the documented
    /// placeholder-to-real swap — and leaves an audit line in the logs so
    /// accidental double registration is visible.
    pub fn register_adapter(
        &self,
        provider_id: &str,
        capability: Capability,
        factory: AdapterFactory,
    ) -> Result<(), GenError> {
        {
            let providers = self.providers.read().map_err(|_| poisoned())?;
            if !providers.contains_key(provider_id) {
                return Err(GenError::UnregisteredProvider(provider_id.to_string()));
            }
        }
        let mut factories = self.factories.write().map_err(|_| poisoned())?;
        let previous = factories.insert((provider_id.to_string(), capability), factory);
        if previous.is_some() {
            tracing::debug!(provider_id, capability = %capability, "adapter binding overwritten");
        }
        Ok(())
    }

    /// List registered providers, optionally filtered by capability and
    /// enablement, sorted by (priority ascending, display name
    /// case-insensitive ascending).
    pub fn list_providers(
        &self,
        capability: Option<Capability>,
        include_disabled: bool,
    ) -> Result<Vec<ProviderMeta>, GenError> {
        let providers = self.providers.read().map_err(|_| poisoned())?;
        let mut result: Vec<ProviderMeta> = providers
            .values()
            .filter(|meta| capability.is_none_or(|c| meta.supports(c)))
            .filter(|meta| include_disabled || meta.is_enabled())
            .cloned()
            .collect();
        drop(providers);
        result.sort_by_key(|meta| (meta.priority, meta.display_name.to_lowercase()));
        Ok(result)
    }

    /// Produce a fresh adapter instance for `(provider_id, capability)`.
    ///
    /// The stored factory runs on every call — no instance caching — so each
    /// caller gets independent internal state.
    pub fn get_adapter(
        &self,
        provider_id: &str,
        capability: Capability,
    ) -> Result<Adapter, GenError> {
        let factory = self
            .factories
            .read()
            .map_err(|_| poisoned())?
            .get(&(provider_id.to_string(), capability))
            .cloned()
            .ok_or_else(|| GenError::no_adapter(provider_id, capability))?;
        // Construction may be arbitrarily expensive; run it outside the lock.
        let adapter = factory()?;
        if adapter.capability() != capability {
            return Err(GenError::Internal(format!(
                "factory for provider '{provider_id}' capability '{capability}' produced a '{}' adapter",
                adapter.capability()
            )));
        }
        Ok(adapter)
    }

    /// Fresh text generation adapter for a provider.
    pub fn text_adapter(&self, provider_id: &str) -> Result<Box<dyn TextGeneration>, GenError> {
        self.get_adapter(provider_id, Capability::Text)?.into_text()
    }

    /// Fresh image generation adapter for a provider.
    pub fn image_adapter(&self, provider_id: &str) -> Result<Box<dyn ImageGeneration>, GenError> {
        self.get_adapter(provider_id, Capability::Image)?
            .into_image()
    }

    /// Fresh video generation adapter for a provider.
    pub fn video_adapter(&self, provider_id: &str) -> Result<Box<dyn VideoGeneration>, GenError> {
        self.get_adapter(provider_id, Capability::Video)?
            .into_video()
    }

    /// Fresh audio generation adapter for a provider.
    pub fn audio_adapter(&self, provider_id: &str) -> Result<Box<dyn AudioGeneration>, GenError> {
        self.get_adapter(provider_id, Capability::Audio)?
            .into_audio()
    }

    /// Fresh speech synthesis adapter for a provider.
    pub fn tts_adapter(&self, provider_id: &str) -> Result<Box<dyn SpeechSynthesis>, GenError> {
        self.get_adapter(provider_id, Capability::Tts)?.into_tts()
    }

    /// Verify every declared credential variable is present and non-empty in
    /// the process environment.
    ///
    /// Fails before any network attempt, listing all absent variable names
    /// (deduplicated, sorted) so operators can fix configuration in one pass.
    pub fn ensure_credentials(&self, provider_id: &str) -> Result<(), GenError> {
        let meta = self.get_provider(provider_id)?;
        let mut missing: Vec<String> = meta
            .env_keys
            .values()
            .filter(|env_var| {
                std::env::var(env_var.as_str())
                    .map(|value| value.is_empty())
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GenError::MissingCredentials {
                provider_id: meta.provider_id,
                variables: missing,
            })
        }
    }
}

fn poisoned() -> GenError {
    GenError::Internal("registry lock poisoned".to_string())
}

static GLOBAL: OnceLock<ProviderRegistry> = OnceLock::new();

/// Process-wide default registry with built-in providers pre-registered.
///
/// Offered for the application's outermost composition point; library code
/// should take a `&ProviderRegistry` instead.
pub fn global_registry() -> &'static ProviderRegistry {
    GLOBAL.get_or_init(ProviderRegistry::with_builtin_providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TextGeneration;
    use crate::types::{Prompt, TextOptions, TextResult};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoText;

    #[async_trait::async_trait]
    impl TextGeneration for EchoText {
        async fn generate_text(
            &self,
            prompt: &Prompt,
            _options: &TextOptions,
        ) -> Result<TextResult, GenError> {
            Ok(TextResult {
                generations: vec![prompt.text.clone()],
                ..Default::default()
            })
        }
    }

    fn echo_factory() -> AdapterFactory {
        Arc::new(|| Ok(Adapter::Text(Box::new(EchoText))))
    }

    fn meta(id: &str, name: &str) -> ProviderMeta {
        ProviderMeta::new(id, name).with_capability(Capability::Text)
    }

    #[test]
    fn duplicate_registration_fails_then_update_succeeds() {
        let registry = ProviderRegistry::new();
        registry.register_provider(meta("acme", "Acme")).unwrap();

        let err = registry
            .register_provider(meta("acme", "Acme Two"))
            .unwrap_err();
        assert!(matches!(err, GenError::DuplicateProvider(id) if id == "acme"));

        registry.update_provider(meta("acme", "Acme Two")).unwrap();
        let stored = registry.get_provider("acme").unwrap();
        assert_eq!(stored.display_name, "Acme Two");
    }

    #[test]
    fn adapter_registration_requires_metadata() {
        let registry = ProviderRegistry::new();
        let err = registry
            .register_adapter("missing", Capability::Text, echo_factory())
            .unwrap_err();
        assert!(matches!(err, GenError::UnregisteredProvider(id) if id == "missing"));
    }

    #[test]
    fn get_adapter_invokes_factory_per_call() {
        let registry = ProviderRegistry::new();
        registry.register_provider(meta("acme", "Acme")).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        registry
            .register_adapter(
                "acme",
                Capability::Text,
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Adapter::Text(Box::new(EchoText)))
                }),
            )
            .unwrap();

        registry.get_adapter("acme", Capability::Text).unwrap();
        registry.get_adapter("acme", Capability::Text).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn placeholder_then_real_swap() {
        let registry = ProviderRegistry::new();
        registry.register_provider(meta("acme", "Acme")).unwrap();
        registry
            .register_adapter(
                "acme",
                Capability::Text,
                placeholder_factory("acme", Capability::Text),
            )
            .unwrap();

        let err = registry.get_adapter("acme", Capability::Text).unwrap_err();
        assert!(matches!(err, GenError::NoAdapter { .. }));

        // Last registration wins.
        registry
            .register_adapter("acme", Capability::Text, echo_factory())
            .unwrap();
        let adapter = registry.get_adapter("acme", Capability::Text).unwrap();
        assert_eq!(adapter.capability(), Capability::Text);
    }

    #[test]
    fn mismatched_factory_output_is_internal_error() {
        let registry = ProviderRegistry::new();
        registry
            .register_provider(meta("acme", "Acme").with_capability(Capability::Image))
            .unwrap();
        // Bound under Image but produces a text adapter.
        registry
            .register_adapter("acme", Capability::Image, echo_factory())
            .unwrap();

        let err = registry.get_adapter("acme", Capability::Image).unwrap_err();
        assert!(matches!(err, GenError::Internal(_)));
    }

    #[test]
    fn typed_accessor_returns_working_adapter() {
        let registry = ProviderRegistry::new();
        registry.register_provider(meta("acme", "Acme")).unwrap();
        registry
            .register_adapter("acme", Capability::Text, echo_factory())
            .unwrap();

        let adapter = registry.text_adapter("acme").unwrap();
        let result = tokio_test::block_on(
            adapter.generate_text(&Prompt::new("hello"), &TextOptions::default()),
        )
        .unwrap();
        assert_eq!(result.generations, ["hello"]);
    }
}
