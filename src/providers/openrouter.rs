//! OpenRouter provider module.
//!
//! Text generation through OpenRouter's OpenAI-compatible `chat/completions`
//! endpoint. The provider also claims the image capability but ships no image
//! adapter yet, so image dispatch reports "not yet available" until one is
//! bound.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::GenError;
use crate::registry::{ProviderMeta, ProviderRegistry};
use crate::traits::{Adapter, TextGeneration};
use crate::types::{Capability, Prompt, ProviderTelemetry, TextOptions, TextResult, TokenUsage};

pub const PROVIDER_ID: &str = "openrouter";

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "google/gemini-1.5-flash";
const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OpenRouter client configuration.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    /// Model used when the request options carry no override.
    pub model: String,
    /// Environment variable holding the API key, read at call time.
    pub api_key_env: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: API_KEY_ENV.to_string(),
        }
    }
}

/// Text generation adapter using OpenRouter's OpenAI-compatible API.
pub struct OpenRouterTextGeneration {
    config: OpenRouterConfig,
    http_client: reqwest::Client,
}

impl Default for OpenRouterTextGeneration {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenRouterTextGeneration {
    pub fn new() -> Self {
        Self::with_config(OpenRouterConfig::default())
    }

    pub fn with_config(config: OpenRouterConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Use a caller-provided HTTP client (shared pools, proxies).
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    fn resolve_api_key(&self) -> Result<String, GenError> {
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                GenError::provider(format!(
                    "OpenRouter API key not configured. Set the {} environment variable.",
                    self.config.api_key_env
                ))
            })
    }

    fn build_request_body(&self, prompt: &Prompt, options: &TextOptions, model: &str) -> Value {
        let mut body = json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt.text }],
        });
        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = options.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(max_tokens) = options.max_output_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }
}

#[async_trait]
impl TextGeneration for OpenRouterTextGeneration {
    async fn generate_text(
        &self,
        prompt: &Prompt,
        options: &TextOptions,
    ) -> Result<TextResult, GenError> {
        let api_key = self.resolve_api_key()?;
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.config.model.clone());
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let timeout = Duration::from_secs(
            options
                .extra
                .get::<u64>("timeout")
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        let body = self.build_request_body(prompt, options, &model);

        let start = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenError::provider(format!("OpenRouter request failed: {e}")))?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenError::provider(format!(
                "OpenRouter error {}: {detail}",
                status.as_u16()
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|_| GenError::provider("OpenRouter returned a non-JSON response"))?;

        let generations: Vec<String> = data["choices"]
            .as_array()
            .map(|choices| {
                choices
                    .iter()
                    .filter_map(|choice| choice["message"]["content"].as_str())
                    .filter(|content| !content.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if generations.is_empty() {
            return Err(GenError::provider(
                "OpenRouter response contained no generations",
            ));
        }

        let mut telemetry = ProviderTelemetry::new(PROVIDER_ID)
            .with_model(&model)
            .with_latency_ms(latency_ms);
        if let Some(id) = data["id"].as_str() {
            telemetry = telemetry.with_request_id(id);
        }
        if let Some(usage) = data.get("usage") {
            telemetry = telemetry
                .with_token_usage(TokenUsage {
                    prompt_tokens: usage["prompt_tokens"].as_u64().map(|v| v as u32),
                    completion_tokens: usage["completion_tokens"].as_u64().map(|v| v as u32),
                    total_tokens: usage["total_tokens"].as_u64().map(|v| v as u32),
                })
                .with_raw_info(json!({ "usage": usage }));
        }
        tracing::debug!(
            provider_id = PROVIDER_ID,
            model = %model,
            latency_ms,
            request_id = telemetry.request_id.as_deref().unwrap_or_default(),
            "text generation completed"
        );

        Ok(TextResult {
            generations,
            metadata: [("model_name".to_string(), json!(model))].into(),
            telemetry: Some(telemetry),
        })
    }
}

/// Provider metadata for OpenRouter.
pub fn provider_meta() -> ProviderMeta {
    ProviderMeta::new(PROVIDER_ID, "OpenRouter")
        .with_capabilities([Capability::Text, Capability::Image])
        .with_env_key("api_key", API_KEY_ENV)
        .with_feature_flag("ENABLE_PROVIDER_OPENROUTER")
        .with_priority(50)
        .with_default_model(Capability::Text, DEFAULT_MODEL)
}

/// Register OpenRouter metadata and adapters.
pub fn register(registry: &ProviderRegistry) -> Result<(), GenError> {
    let meta = provider_meta();
    match registry.register_provider(meta.clone()) {
        Ok(()) => {}
        Err(GenError::DuplicateProvider(_)) => registry.update_provider(meta)?,
        Err(error) => return Err(error),
    }

    registry.register_adapter(
        PROVIDER_ID,
        Capability::Text,
        Arc::new(|| Ok(Adapter::Text(Box::new(OpenRouterTextGeneration::new())))),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EnvGuard, env_lock};

    #[test]
    fn config_defaults() {
        let config = OpenRouterConfig::default();
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn request_body_includes_only_set_tunables() {
        let adapter = OpenRouterTextGeneration::new();
        let prompt = Prompt::new("hello");

        let sparse = adapter.build_request_body(&prompt, &TextOptions::default(), "m");
        assert_eq!(sparse["model"], "m");
        assert_eq!(sparse["messages"][0]["role"], "user");
        assert_eq!(sparse["messages"][0]["content"], "hello");
        assert!(sparse.get("temperature").is_none());
        assert!(sparse.get("max_tokens").is_none());

        let options = TextOptions {
            temperature: Some(0.7),
            max_output_tokens: Some(256),
            ..Default::default()
        };
        let full = adapter.build_request_body(&prompt, &options, "m");
        assert_eq!(full["temperature"], 0.7f32);
        assert_eq!(full["max_tokens"], 256);
        assert!(full.get("top_p").is_none());
    }

    #[test]
    fn missing_api_key_is_a_provider_error() {
        let _lock = env_lock();
        let _unset = EnvGuard::remove("OPENROUTER_API_KEY");

        let adapter = OpenRouterTextGeneration::new();
        let err = adapter.resolve_api_key().unwrap_err();
        assert!(matches!(err, GenError::Provider(msg) if msg.contains("OPENROUTER_API_KEY")));
    }

    #[test]
    fn metadata_shape() {
        let meta = provider_meta();
        assert_eq!(meta.provider_id, "openrouter");
        assert!(meta.supports(Capability::Text));
        assert!(meta.supports(Capability::Image));
        assert!(!meta.supports(Capability::Video));
        assert_eq!(meta.priority, 50);
        assert!(meta.requires_credentials());
        assert_eq!(
            meta.feature_flag_env.as_deref(),
            Some("ENABLE_PROVIDER_OPENROUTER")
        );
    }
}
