//! Generation capability enumeration.

use serde::{Deserialize, Serialize};

/// One supported generation modality.
///
/// The set is closed: providers declare a subset in their metadata and the
/// registry keys adapter bindings by `(provider, capability)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Text generation.
    Text,
    /// Image generation.
    Image,
    /// Video generation.
    Video,
    /// Audio (music / sound) generation.
    Audio,
    /// Speech synthesis.
    Tts,
}

impl Capability {
    /// All capabilities, in declaration order.
    pub const ALL: [Capability; 5] = [
        Capability::Text,
        Capability::Image,
        Capability::Video,
        Capability::Audio,
        Capability::Tts,
    ];

    /// Lowercase wire name, matching the serde representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::Text => "text",
            Capability::Image => "image",
            Capability::Video => "video",
            Capability::Audio => "audio",
            Capability::Tts => "tts",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
