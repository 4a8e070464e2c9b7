//! Observational telemetry attached to adapter results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Token usage reported by a provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// Telemetry record emitted by a provider call.
///
/// Purely observational: never required, never validated by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTelemetry {
    pub provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    /// Provider-assigned request id when the vendor returns one; otherwise a
    /// locally generated UUID so log lines stay correlatable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_info: Option<Value>,
}

impl ProviderTelemetry {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_name: None,
            latency_ms: None,
            request_id: Some(Uuid::new_v4().to_string()),
            token_usage: None,
            timestamp: Utc::now(),
            raw_info: None,
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    /// Replace the locally generated request id with the provider's own.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_token_usage(mut self, token_usage: TokenUsage) -> Self {
        self.token_usage = Some(token_usage);
        self
    }

    pub fn with_raw_info(mut self, raw_info: Value) -> Self {
        self.raw_info = Some(raw_info);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_generated_by_default() {
        let telemetry = ProviderTelemetry::new("acme");
        let id = telemetry.request_id.expect("generated id");
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn provider_request_id_wins() {
        let telemetry = ProviderTelemetry::new("acme").with_request_id("req-123");
        assert_eq!(telemetry.request_id.as_deref(), Some("req-123"));
    }
}
