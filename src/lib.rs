//! genmux
//!
//! A unified generative-media provider interface: request a capability (text,
//! image, video, audio, speech synthesis) without hard-coding which vendor
//! fulfills it.
//!
//! The core is a [`registry::ProviderRegistry`] holding provider metadata and
//! `(provider, capability)` adapter factory bindings. Provider modules
//! register themselves at composition time; request-handling code looks up
//! enabled providers for a capability and asks for a fresh adapter instance.
//!
//! ```rust,no_run
//! use genmux::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = genmux::registry::global_registry();
//!
//!     // Who can generate text right now?
//!     for meta in registry.list_providers(Some(Capability::Text), false)? {
//!         println!("{} ({})", meta.display_name, meta.provider_id);
//!     }
//!
//!     registry.ensure_credentials("openrouter")?;
//!     let adapter = registry.text_adapter("openrouter")?;
//!     let result = adapter
//!         .generate_text(&Prompt::new("Say hello"), &TextOptions::default())
//!         .await?;
//!     println!("{}", result.generations.join("\n"));
//!     Ok(())
//! }
//! ```
#![deny(unsafe_code)]

pub mod error;
pub mod providers;
pub mod registry;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::GenError;

/// Commonly used types, one import away.
pub mod prelude {
    pub use crate::error::GenError;
    pub use crate::registry::{
        AdapterFactory, ProviderMeta, ProviderRegistry, global_registry, placeholder_factory,
    };
    pub use crate::traits::{
        Adapter, AudioGeneration, ImageGeneration, SpeechSynthesis, TextGeneration,
        VideoGeneration,
    };
    pub use crate::types::{
        AudioOptions, AudioResult, Capability, ExtraParams, ImageOptions, ImageResult,
        MediaArtifact, MediaAttachment, Prompt, ProviderTelemetry, TextOptions, TextResult,
        TokenUsage, TtsOptions, TtsResult, VideoOptions, VideoResult,
    };
}
