//! Capability service traits and the adapter wrapper.
//!
//! Each generation modality exposes exactly one operation. Adapters are
//! concrete types implementing one of these traits; the registry hands them
//! out wrapped in [`Adapter`], typed by the capability they were requested
//! for.

use async_trait::async_trait;

use crate::error::GenError;
use crate::types::{
    AudioOptions, AudioResult, Capability, ImageOptions, ImageResult, Prompt, TextOptions,
    TextResult, TtsOptions, TtsResult, VideoOptions, VideoResult,
};

/// Provider-backed text generation.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    async fn generate_text(
        &self,
        prompt: &Prompt,
        options: &TextOptions,
    ) -> Result<TextResult, GenError>;
}

/// Provider-backed image generation.
#[async_trait]
pub trait ImageGeneration: Send + Sync {
    async fn generate_images(
        &self,
        prompt: &Prompt,
        options: &ImageOptions,
    ) -> Result<ImageResult, GenError>;
}

/// Provider-backed video generation.
#[async_trait]
pub trait VideoGeneration: Send + Sync {
    async fn generate_video(
        &self,
        prompt: &Prompt,
        options: &VideoOptions,
    ) -> Result<VideoResult, GenError>;
}

/// Provider-backed audio generation.
#[async_trait]
pub trait AudioGeneration: Send + Sync {
    async fn generate_audio(
        &self,
        prompt: &Prompt,
        options: &AudioOptions,
    ) -> Result<AudioResult, GenError>;
}

/// Provider-backed speech synthesis.
#[async_trait]
pub trait SpeechSynthesis: Send + Sync {
    async fn synthesize(&self, text: &str, options: &TtsOptions) -> Result<TtsResult, GenError>;
}

/// A capability-typed adapter instance produced by a factory.
///
/// The registry returns a fresh `Adapter` on every dispatch; unwrap it with
/// the accessor matching the requested capability.
pub enum Adapter {
    Text(Box<dyn TextGeneration>),
    Image(Box<dyn ImageGeneration>),
    Video(Box<dyn VideoGeneration>),
    Audio(Box<dyn AudioGeneration>),
    Tts(Box<dyn SpeechSynthesis>),
}

impl Adapter {
    /// The capability this instance serves.
    pub fn capability(&self) -> Capability {
        match self {
            Adapter::Text(_) => Capability::Text,
            Adapter::Image(_) => Capability::Image,
            Adapter::Video(_) => Capability::Video,
            Adapter::Audio(_) => Capability::Audio,
            Adapter::Tts(_) => Capability::Tts,
        }
    }

    pub fn into_text(self) -> Result<Box<dyn TextGeneration>, GenError> {
        match self {
            Adapter::Text(service) => Ok(service),
            other => Err(mismatch(Capability::Text, other.capability())),
        }
    }

    pub fn into_image(self) -> Result<Box<dyn ImageGeneration>, GenError> {
        match self {
            Adapter::Image(service) => Ok(service),
            other => Err(mismatch(Capability::Image, other.capability())),
        }
    }

    pub fn into_video(self) -> Result<Box<dyn VideoGeneration>, GenError> {
        match self {
            Adapter::Video(service) => Ok(service),
            other => Err(mismatch(Capability::Video, other.capability())),
        }
    }

    pub fn into_audio(self) -> Result<Box<dyn AudioGeneration>, GenError> {
        match self {
            Adapter::Audio(service) => Ok(service),
            other => Err(mismatch(Capability::Audio, other.capability())),
        }
    }

    pub fn into_tts(self) -> Result<Box<dyn SpeechSynthesis>, GenError> {
        match self {
            Adapter::Tts(service) => Ok(service),
            other => Err(mismatch(Capability::Tts, other.capability())),
        }
    }
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Adapter").field(&self.capability()).finish()
    }
}

fn mismatch(expected: Capability, actual: Capability) -> GenError {
    GenError::Internal(format!(
        "expected a '{expected}' adapter, got '{actual}'"
    ))
}
