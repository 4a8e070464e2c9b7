//! Adapter factory bindings.

use std::sync::Arc;

use crate::error::GenError;
use crate::traits::Adapter;
use crate::types::Capability;

/// Zero-argument constructor producing a capability-typed adapter instance.
///
/// Invoked afresh on every dispatch; the registry never caches the produced
/// instance, so each invocation yields independent internal state.
pub type AdapterFactory = Arc<dyn Fn() -> Result<Adapter, GenError> + Send + Sync>;

/// Factory that deterministically fails until replaced by a working
/// implementation.
///
/// Lets a provider module declare "I support capability X" before the real
/// adapter exists; dispatch reports the capability as not yet available
/// instead of unknown.
pub fn placeholder_factory(provider_id: &str, capability: Capability) -> AdapterFactory {
    let provider_id = provider_id.to_string();
    Arc::new(move || Err(GenError::no_adapter(provider_id.clone(), capability)))
}
