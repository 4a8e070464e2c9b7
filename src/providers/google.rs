//! Google generative provider module.
//!
//! Adapters over the generative-language HTTP API: Gemini text generation,
//! Imagen image generation via the `:predict` endpoint, and Gemini speech
//! synthesis. Registration binds placeholder factories for every declared
//! capability first, then swaps in the working text/image/tts factories;
//! video and audio stay placeholders until implemented.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use serde_json::{Value, json};

use crate::error::GenError;
use crate::registry::{ProviderMeta, ProviderRegistry, placeholder_factory};
use crate::traits::{Adapter, ImageGeneration, SpeechSynthesis, TextGeneration};
use crate::types::{
    Capability, ImageOptions, ImageResult, MediaArtifact, Prompt, ProviderTelemetry, TextOptions,
    TextResult, TokenUsage, TtsOptions, TtsResult,
};

pub const PROVIDER_ID: &str = "google-vertex";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_TTS_VOICE: &str = "Alnilam";
const DEFAULT_TTS_LANGUAGE: &str = "en-US";

/// Google generative-language client configuration.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub base_url: String,
    /// Environment variable holding the API key, read at call time.
    pub api_key_env: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: API_KEY_ENV.to_string(),
        }
    }
}

impl GoogleConfig {
    fn resolve_api_key(&self) -> Result<String, GenError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                GenError::provider(format!(
                    "Google API key not configured. Set the {} environment variable.",
                    self.api_key_env
                ))
            })
    }

    fn model_url(&self, model: &str, verb: &str) -> String {
        format!(
            "{}/models/{model}:{verb}",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// POST a JSON body with the API key header and parse the JSON response.
async fn post_json(
    http_client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &Value,
) -> Result<Value, GenError> {
    let response = http_client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| GenError::provider(format!("Google request failed: {e}")))?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let detail = response.text().await.unwrap_or_default();
        return Err(GenError::provider(format!(
            "Google error {}: {detail}",
            status.as_u16()
        )));
    }

    response
        .json()
        .await
        .map_err(|_| GenError::provider("Google returned a non-JSON response"))
}

fn decode_base64(data: &str, what: &str) -> Result<Vec<u8>, GenError> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|_| GenError::provider(format!("Google returned invalid base64 {what} data")))
}

fn token_usage_from_metadata(data: &Value) -> Option<TokenUsage> {
    let usage = data.get("usageMetadata")?;
    Some(TokenUsage {
        prompt_tokens: usage["promptTokenCount"].as_u64().map(|v| v as u32),
        completion_tokens: usage["candidatesTokenCount"].as_u64().map(|v| v as u32),
        total_tokens: usage["totalTokenCount"].as_u64().map(|v| v as u32),
    })
}

/// Adapter for Gemini text generation.
pub struct GoogleTextGeneration {
    config: GoogleConfig,
    http_client: reqwest::Client,
}

impl Default for GoogleTextGeneration {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTextGeneration {
    pub fn new() -> Self {
        Self::with_config(GoogleConfig::default())
    }

    pub fn with_config(config: GoogleConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    fn build_request_body(&self, prompt: &Prompt, options: &TextOptions) -> Value {
        let mut generation_config = json!({ "responseModalities": ["TEXT"] });
        if let Some(temperature) = options.temperature {
            generation_config["temperature"] = json!(temperature);
        }
        if let Some(top_p) = options.top_p {
            generation_config["topP"] = json!(top_p);
        }
        if let Some(max_tokens) = options.max_output_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }

        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt.text }] }],
            "generationConfig": generation_config,
        });
        if let Some(safety_settings) = &options.safety_settings {
            body["safetySettings"] = safety_settings.clone();
        }
        body
    }
}

#[async_trait]
impl TextGeneration for GoogleTextGeneration {
    async fn generate_text(
        &self,
        prompt: &Prompt,
        options: &TextOptions,
    ) -> Result<TextResult, GenError> {
        let api_key = self.config.resolve_api_key()?;
        let model = options.model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL);
        let url = self.config.model_url(model, "generateContent");
        let body = self.build_request_body(prompt, options);

        let start = Instant::now();
        let data = post_json(&self.http_client, &url, &api_key, &body).await?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let mut generations: Vec<String> = Vec::new();
        if let Some(candidates) = data["candidates"].as_array() {
            for candidate in candidates {
                if let Some(parts) = candidate["content"]["parts"].as_array() {
                    generations.extend(
                        parts
                            .iter()
                            .filter_map(|part| part["text"].as_str())
                            .filter(|text| !text.is_empty())
                            .map(str::to_string),
                    );
                }
            }
        }

        let mut telemetry = ProviderTelemetry::new(PROVIDER_ID)
            .with_model(model)
            .with_latency_ms(latency_ms);
        if let Some(id) = data["responseId"].as_str() {
            telemetry = telemetry.with_request_id(id);
        }
        if let Some(usage) = token_usage_from_metadata(&data) {
            telemetry = telemetry.with_token_usage(usage);
        }
        tracing::debug!(
            provider_id = PROVIDER_ID,
            model,
            latency_ms,
            candidates = generations.len(),
            "text generation completed"
        );

        Ok(TextResult {
            generations,
            metadata: [("model_name".to_string(), json!(model))].into(),
            telemetry: Some(telemetry),
        })
    }
}

/// Adapter for Imagen image generation via `:predict`.
pub struct GoogleImageGeneration {
    config: GoogleConfig,
    http_client: reqwest::Client,
}

impl Default for GoogleImageGeneration {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleImageGeneration {
    pub fn new() -> Self {
        Self::with_config(GoogleConfig::default())
    }

    pub fn with_config(config: GoogleConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    fn build_request_body(&self, prompt: &Prompt, options: &ImageOptions) -> Value {
        let mut parameters = json!({
            "sampleCount": options.count.max(1),
            "aspectRatio": options.aspect_ratio.as_deref().unwrap_or("1:1"),
        });
        if let Some(negative_prompt) = &options.negative_prompt {
            parameters["negativePrompt"] = json!(negative_prompt);
        }
        if let Some(seed) = options.seed {
            parameters["seed"] = json!(seed);
        }
        json!({
            "instances": [{ "prompt": prompt.text }],
            "parameters": parameters,
        })
    }
}

#[async_trait]
impl ImageGeneration for GoogleImageGeneration {
    async fn generate_images(
        &self,
        prompt: &Prompt,
        options: &ImageOptions,
    ) -> Result<ImageResult, GenError> {
        let api_key = self.config.resolve_api_key()?;
        let model = options.model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL);
        let url = self.config.model_url(model, "predict");
        let body = self.build_request_body(prompt, options);

        let start = Instant::now();
        let data = post_json(&self.http_client, &url, &api_key, &body).await?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let mut artifacts: Vec<MediaArtifact> = Vec::new();
        if let Some(predictions) = data["predictions"].as_array() {
            for (index, prediction) in predictions.iter().enumerate() {
                let mut artifact = MediaArtifact::new("image")
                    .with_metadata("candidate_index", json!(index));
                if let Some(encoded) = prediction["bytesBase64Encoded"].as_str() {
                    let mime_type = prediction["mimeType"].as_str().unwrap_or("image/png");
                    artifact = artifact.with_data(decode_base64(encoded, "image")?, mime_type);
                }
                if let Some(uri) = prediction["gcsUri"].as_str() {
                    artifact = artifact.with_uri(uri);
                }
                artifacts.push(artifact);
            }
        }

        let telemetry = ProviderTelemetry::new(PROVIDER_ID)
            .with_model(model)
            .with_latency_ms(latency_ms);
        tracing::debug!(
            provider_id = PROVIDER_ID,
            model,
            latency_ms,
            candidates = artifacts.len(),
            "image generation completed"
        );

        Ok(ImageResult {
            metadata: [
                ("model_name".to_string(), json!(model)),
                ("candidate_count".to_string(), json!(artifacts.len())),
            ]
            .into(),
            artifacts,
            telemetry: Some(telemetry),
        })
    }
}

/// Adapter for Gemini speech synthesis.
pub struct GoogleSpeechSynthesis {
    config: GoogleConfig,
    http_client: reqwest::Client,
}

impl Default for GoogleSpeechSynthesis {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleSpeechSynthesis {
    pub fn new() -> Self {
        Self::with_config(GoogleConfig::default())
    }

    pub fn with_config(config: GoogleConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    fn build_request_body(&self, text: &str, options: &TtsOptions) -> Value {
        let voice = options.voice.as_deref().unwrap_or(DEFAULT_TTS_VOICE);
        let language_code = options
            .language_code
            .as_deref()
            .unwrap_or(DEFAULT_TTS_LANGUAGE);
        // An optional style prompt is prepended as a natural-language
        // instruction; Gemini TTS takes direction from the text itself.
        let spoken = match options.extra.get::<String>("prompt") {
            Some(style) if !style.is_empty() => format!("{style}\n\n{text}"),
            _ => text.to_string(),
        };
        json!({
            "contents": [{ "parts": [{ "text": spoken }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice }
                    },
                    "languageCode": language_code,
                },
            },
        })
    }
}

#[async_trait]
impl SpeechSynthesis for GoogleSpeechSynthesis {
    async fn synthesize(&self, text: &str, options: &TtsOptions) -> Result<TtsResult, GenError> {
        let api_key = self.config.resolve_api_key()?;
        let model = options.model.as_deref().unwrap_or(DEFAULT_TTS_MODEL);
        let url = self.config.model_url(model, "generateContent");
        let voice = options.voice.as_deref().unwrap_or(DEFAULT_TTS_VOICE);
        let language_code = options
            .language_code
            .as_deref()
            .unwrap_or(DEFAULT_TTS_LANGUAGE);
        let body = self.build_request_body(text, options);

        let start = Instant::now();
        let data = post_json(&self.http_client, &url, &api_key, &body).await?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let inline = data["candidates"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|candidate| candidate["content"]["parts"].as_array())
            .flatten()
            .find_map(|part| part.get("inlineData"))
            .ok_or_else(|| GenError::provider("Google response contained no audio data"))?;
        let encoded = inline["data"]
            .as_str()
            .ok_or_else(|| GenError::provider("Google response contained no audio data"))?;
        let mime_type = inline["mimeType"].as_str().unwrap_or("audio/wav");

        let audio = MediaArtifact::new("audio")
            .with_data(decode_base64(encoded, "audio")?, mime_type)
            .with_metadata("voice_name", json!(voice))
            .with_metadata("language_code", json!(language_code));

        let telemetry = ProviderTelemetry::new(PROVIDER_ID)
            .with_model(model)
            .with_latency_ms(latency_ms);
        tracing::debug!(
            provider_id = PROVIDER_ID,
            model,
            latency_ms,
            voice,
            "speech synthesis completed"
        );

        Ok(TtsResult {
            audio,
            metadata: [("model_name".to_string(), json!(model))].into(),
            telemetry: Some(telemetry),
        })
    }
}

/// Provider metadata for the Google generative provider.
pub fn provider_meta() -> ProviderMeta {
    ProviderMeta::new(PROVIDER_ID, "Google Vertex AI")
        .with_capabilities(Capability::ALL)
        .with_env_key("api_key", API_KEY_ENV)
        .with_priority(10)
        .with_default_model(Capability::Text, DEFAULT_TEXT_MODEL)
        .with_default_model(Capability::Image, DEFAULT_IMAGE_MODEL)
        .with_default_model(Capability::Tts, DEFAULT_TTS_MODEL)
}

/// Register Google provider metadata and adapters.
///
/// Every declared capability gets a placeholder binding up front so that
/// dispatch for an unimplemented modality reports "not yet available"; the
/// implemented ones are swapped in immediately afterwards.
pub fn register(registry: &ProviderRegistry) -> Result<(), GenError> {
    let meta = provider_meta();
    match registry.register_provider(meta.clone()) {
        Ok(()) => {}
        Err(GenError::DuplicateProvider(_)) => registry.update_provider(meta.clone())?,
        Err(error) => return Err(error),
    }

    for capability in meta.capabilities.iter().copied() {
        registry.register_adapter(
            PROVIDER_ID,
            capability,
            placeholder_factory(PROVIDER_ID, capability),
        )?;
    }

    registry.register_adapter(
        PROVIDER_ID,
        Capability::Text,
        Arc::new(|| Ok(Adapter::Text(Box::new(GoogleTextGeneration::new())))),
    )?;
    registry.register_adapter(
        PROVIDER_ID,
        Capability::Image,
        Arc::new(|| Ok(Adapter::Image(Box::new(GoogleImageGeneration::new())))),
    )?;
    registry.register_adapter(
        PROVIDER_ID,
        Capability::Tts,
        Arc::new(|| Ok(Adapter::Tts(Box::new(GoogleSpeechSynthesis::new())))),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_declares_all_capabilities() {
        let meta = provider_meta();
        assert_eq!(meta.provider_id, "google-vertex");
        assert_eq!(meta.priority, 10);
        for capability in Capability::ALL {
            assert!(meta.supports(capability), "missing {capability}");
        }
        assert!(meta.feature_flag_env.is_none());
        assert_eq!(meta.default_model(Capability::Text), Some(DEFAULT_TEXT_MODEL));
    }

    #[test]
    fn text_request_body_shape() {
        let adapter = GoogleTextGeneration::new();
        let options = TextOptions {
            temperature: Some(0.3),
            max_output_tokens: Some(1024),
            ..Default::default()
        };
        let body = adapter.build_request_body(&Prompt::new("describe rust"), &options);

        assert_eq!(body["contents"][0]["parts"][0]["text"], "describe rust");
        assert_eq!(body["generationConfig"]["responseModalities"][0], "TEXT");
        assert_eq!(body["generationConfig"]["temperature"], 0.3f32);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert!(body["generationConfig"].get("topP").is_none());
        assert!(body.get("safetySettings").is_none());
    }

    #[test]
    fn image_request_body_clamps_count() {
        let adapter = GoogleImageGeneration::new();
        let options = ImageOptions {
            count: 0,
            negative_prompt: Some("blurry".to_string()),
            ..Default::default()
        };
        let body = adapter.build_request_body(&Prompt::new("a fox"), &options);

        assert_eq!(body["instances"][0]["prompt"], "a fox");
        assert_eq!(body["parameters"]["sampleCount"], 1);
        assert_eq!(body["parameters"]["aspectRatio"], "1:1");
        assert_eq!(body["parameters"]["negativePrompt"], "blurry");
        assert!(body["parameters"].get("seed").is_none());
    }

    #[test]
    fn tts_request_body_uses_voice_defaults() {
        let adapter = GoogleSpeechSynthesis::new();
        let body = adapter.build_request_body("hello there", &TtsOptions::default());

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello there");
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            DEFAULT_TTS_VOICE
        );
        assert_eq!(
            body["generationConfig"]["speechConfig"]["languageCode"],
            DEFAULT_TTS_LANGUAGE
        );
        assert_eq!(body["generationConfig"]["responseModalities"][0], "AUDIO");
    }

    #[test]
    fn tts_style_prompt_is_prepended() {
        let adapter = GoogleSpeechSynthesis::new();
        let options = TtsOptions {
            extra: crate::types::ExtraParams::new().with_param("prompt", "whisper softly"),
            ..Default::default()
        };
        let body = adapter.build_request_body("goodnight", &options);
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "whisper softly\n\ngoodnight"
        );
    }

    #[test]
    fn registration_leaves_video_and_audio_as_placeholders() {
        let registry = ProviderRegistry::new();
        register(&registry).unwrap();

        for capability in [Capability::Video, Capability::Audio] {
            let err = registry.get_adapter(PROVIDER_ID, capability).unwrap_err();
            assert!(
                matches!(err, GenError::NoAdapter { .. }),
                "expected placeholder failure for {capability}"
            );
        }
        // The swapped-in factories construct working adapters.
        assert!(registry.get_adapter(PROVIDER_ID, Capability::Text).is_ok());
        assert!(registry.get_adapter(PROVIDER_ID, Capability::Image).is_ok());
        assert!(registry.get_adapter(PROVIDER_ID, Capability::Tts).is_ok());
    }
}
