//! Built-in provider modules.
//!
//! Each module declares a `register` function that installs its metadata and
//! adapter factories into a [`ProviderRegistry`]. Registration is idempotent:
//! strict registration falls back to update semantics on a duplicate id, so
//! re-running composition code is safe.

#[cfg(feature = "google")]
pub mod google;
#[cfg(feature = "openrouter")]
pub mod openrouter;

use crate::error::GenError;
use crate::registry::ProviderRegistry;

/// Register every built-in provider enabled in this build.
pub fn register_builtin_providers(registry: &ProviderRegistry) -> Result<(), GenError> {
    #[cfg(feature = "google")]
    google::register(registry)?;

    #[cfg(feature = "openrouter")]
    openrouter::register(registry)?;

    #[cfg(not(any(feature = "google", feature = "openrouter")))]
    let _ = registry;

    Ok(())
}
