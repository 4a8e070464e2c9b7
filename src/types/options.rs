//! Per-capability invocation options.
//!
//! Every options struct carries a typed `model` override, the tunables its
//! capability understands, and an [`ExtraParams`] bag for provider-specific
//! knobs that have no cross-provider meaning.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed extension bag for provider-specific tunables.
///
/// Values are converted to JSON at insertion time and deserialized on access,
/// so a malformed value fails at the boundary instead of deep inside an
/// adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraParams {
    #[serde(flatten)]
    params: HashMap<String, Value>,
}

impl ExtraParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, consuming and returning self for chaining.
    pub fn with_param<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        self.set(key, value);
        self
    }

    /// Insert a parameter in place.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.params.insert(key, value);
            }
            Err(error) => {
                tracing::debug!(%key, %error, "dropping unserializable extra param");
            }
        }
    }

    /// Typed access; `None` when the key is absent or the value does not
    /// deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.params
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Options for text generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextOptions {
    /// Model override; adapters fall back to their configured default.
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
    /// Provider-shaped safety settings, passed through opaquely.
    pub safety_settings: Option<Value>,
    #[serde(default)]
    pub extra: ExtraParams,
}

/// Options for image generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageOptions {
    pub model: Option<String>,
    pub aspect_ratio: Option<String>,
    pub negative_prompt: Option<String>,
    /// Number of images to request; adapters clamp to at least one.
    pub count: u32,
    pub seed: Option<u64>,
    #[serde(default)]
    pub extra: ExtraParams,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            model: None,
            aspect_ratio: None,
            negative_prompt: None,
            count: 1,
            seed: None,
            extra: ExtraParams::default(),
        }
    }
}

/// Options for video generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoOptions {
    pub model: Option<String>,
    pub aspect_ratio: Option<String>,
    pub duration_seconds: Option<u32>,
    pub resolution: Option<String>,
    pub frame_rate: Option<u32>,
    pub audio_enabled: Option<bool>,
    #[serde(default)]
    pub extra: ExtraParams,
}

/// Options for audio (music / sound) generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioOptions {
    pub model: Option<String>,
    pub duration_seconds: Option<u32>,
    pub voice: Option<String>,
    #[serde(default)]
    pub extra: ExtraParams,
}

/// Options for speech synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsOptions {
    pub model: Option<String>,
    pub voice: Option<String>,
    pub language_code: Option<String>,
    pub speaking_rate: Option<f32>,
    #[serde(default)]
    pub extra: ExtraParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_params_typed_roundtrip() {
        let extra = ExtraParams::new()
            .with_param("timeout", 45u64)
            .with_param("tag", "fast");
        assert_eq!(extra.get::<u64>("timeout"), Some(45));
        assert_eq!(extra.get::<String>("tag"), Some("fast".to_string()));
        // Wrong type and missing key both come back as None.
        assert_eq!(extra.get::<u64>("tag"), None);
        assert_eq!(extra.get::<u64>("absent"), None);
    }

    #[test]
    fn image_options_default_to_one_image() {
        assert_eq!(ImageOptions::default().count, 1);
    }

    #[test]
    fn extra_params_flatten_in_serde() {
        let options = TextOptions {
            temperature: Some(0.2),
            extra: ExtraParams::new().with_param("timeout", 10u64),
            ..Default::default()
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["extra"]["timeout"], 10);
        assert_eq!(json["temperature"], 0.2f32);
    }
}
