//! Per-capability result value objects.
//!
//! Immutable records handed back by adapters. The registry never inspects
//! their contents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::media::MediaArtifact;
use super::telemetry::ProviderTelemetry;

/// Response from a text generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextResult {
    /// Generated candidate texts, in provider order.
    pub generations: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<ProviderTelemetry>,
}

/// Response from an image generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageResult {
    pub artifacts: Vec<MediaArtifact>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<ProviderTelemetry>,
}

/// Response from a video generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoResult {
    pub artifacts: Vec<MediaArtifact>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<ProviderTelemetry>,
}

/// Response from an audio generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioResult {
    pub artifacts: Vec<MediaArtifact>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<ProviderTelemetry>,
}

/// Response from a speech synthesis request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsResult {
    /// The synthesized audio artifact.
    pub audio: MediaArtifact,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<ProviderTelemetry>,
}
