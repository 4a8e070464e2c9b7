//! Capability and data model: the value objects exchanged at the adapter
//! boundary.
//!
//! Pure data, no behavior beyond construction and equality. Code that
//! computes a derived result belongs to an adapter, not here.

mod capability;
mod media;
mod options;
mod result;
mod telemetry;

pub use capability::Capability;
pub use media::{MediaArtifact, MediaAttachment, Prompt};
pub use options::{
    AudioOptions, ExtraParams, ImageOptions, TextOptions, TtsOptions, VideoOptions,
};
pub use result::{AudioResult, ImageResult, TextResult, TtsResult, VideoResult};
pub use telemetry::{ProviderTelemetry, TokenUsage};
