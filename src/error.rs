//! Error types for the provider registry and adapters.
//!
//! Every failure condition carries enough identifying context (provider id,
//! capability, missing variable names) to diagnose without inspecting
//! registry internals. The registry never swallows errors; adapters surface
//! remote failures as [`GenError::Provider`] and the core propagates them
//! unchanged.

use thiserror::Error;

use crate::types::Capability;

/// Errors surfaced by the registry and the built-in adapters.
#[derive(Debug, Error)]
pub enum GenError {
    /// Strict registration of a provider id that already exists.
    ///
    /// Recoverable by switching to [`update_provider`] semantics.
    ///
    /// [`update_provider`]: crate::registry::ProviderRegistry::update_provider
    #[error("provider '{0}' already registered")]
    DuplicateProvider(String),

    /// Lookup of a provider id that was never registered.
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    /// Adapter registration attempted before the provider's metadata exists.
    /// A startup-ordering bug; not worth retrying.
    #[error("register provider metadata before adding adapters: '{0}'")]
    UnregisteredProvider(String),

    /// No factory bound for the (provider, capability) pair, or the bound
    /// factory is still a placeholder. Surfaced as "not yet available".
    #[error("no adapter registered for provider '{provider_id}' capability '{capability}'")]
    NoAdapter {
        provider_id: String,
        capability: Capability,
    },

    /// Required credential environment variables are unset or empty.
    /// Lists every absent variable so operators can fix configuration in one
    /// pass.
    #[error("provider '{provider_id}' requires environment variables: {}", .variables.join(", "))]
    MissingCredentials {
        provider_id: String,
        variables: Vec<String>,
    },

    /// Recoverable remote failure reported by a provider adapter (bad
    /// request, API error, network failure).
    #[error("provider error: {0}")]
    Provider(String),

    /// Invalid local configuration (bad base URL, empty model, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invariant violation inside the registry itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GenError {
    /// Shorthand for a [`GenError::Provider`] failure.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Shorthand for a [`GenError::NoAdapter`] failure.
    pub fn no_adapter(provider_id: impl Into<String>, capability: Capability) -> Self {
        Self::NoAdapter {
            provider_id: provider_id.into(),
            capability,
        }
    }
}
