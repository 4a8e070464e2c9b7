//! Prompt and media value objects exchanged with adapters.
//!
//! These are plain immutable records: any derived computation belongs to the
//! adapter that produces or consumes them, not here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An input media attachment supplied alongside a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Coarse kind of the attachment ("image", "audio", "video", ...).
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl MediaAttachment {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Attachment referencing a URI, with the mime type inferred from the
    /// path extension when recognizable.
    pub fn from_uri(kind: impl Into<String>, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let mime_type = mime_guess::from_path(&uri)
            .first()
            .map(|m| m.essence_str().to_string());
        Self {
            kind: kind.into(),
            uri: Some(uri),
            mime_type,
            ..Default::default()
        }
    }

    /// Attach inline bytes with an explicit mime type.
    pub fn with_data(mut self, data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.data = Some(data);
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A generated media output artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaArtifact {
    /// Coarse kind of the artifact ("image", "audio", "video", ...).
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl MediaArtifact {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_data(mut self, data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.data = Some(data);
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// User prompt text plus an ordered sequence of media attachments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MediaAttachment>,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: MediaAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
