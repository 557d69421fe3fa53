//! OpenAI API Providers
//!
//! Completion provider backed by the Chat Completions API and an embedding
//! provider backed by the Embeddings API. Both speak to OpenAI-compatible
//! endpoints so self-hosted gateways work via `api_base`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{Completion, CompletionProvider, EmbeddingProvider, ProviderConfig};
use crate::types::{Result, WikiError};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Validate an endpoint URL and normalize away the trailing slash.
fn validate_endpoint(endpoint: &str) -> Result<String> {
    let url = url::Url::parse(endpoint)
        .map_err(|e| WikiError::Config(format!("Invalid endpoint URL '{}': {}", endpoint, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(WikiError::Config(format!(
            "Endpoint must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    Ok(endpoint.trim_end_matches('/').to_string())
}

fn resolve_api_key(config: &ProviderConfig) -> Result<SecretString> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .map(SecretString::from)
        .ok_or_else(|| {
            WikiError::Config(
                "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                    .to_string(),
            )
        })
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| WikiError::api("openai", format!("Failed to create HTTP client: {}", e)))
}

// =============================================================================
// Completions
// =============================================================================

/// OpenAI Chat Completions provider with secure API key handling
pub struct OpenAiCompletions {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiCompletions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletions")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiCompletions {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = resolve_api_key(&config)?;
        let api_base =
            validate_endpoint(config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE))?;
        let model = config
            .model
            .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string());
        let client = build_client(config.timeout_secs)?;

        Ok(Self {
            api_key,
            api_base,
            model,
            temperature: config.temperature,
            client,
        })
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletions {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        let request = self.build_request(prompt);
        let url = format!("{}/chat/completions", self.api_base);

        debug!("Sending completion request to {} ({})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| WikiError::api("openai", format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(WikiError::api_status("openai", status, body));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| WikiError::api("openai", format!("failed to parse response: {}", e)))?;

        let message = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| WikiError::api("openai", "no choices in response"))?;

        // Providers normally return plain text; anything else degrades to its
        // JSON string representation.
        let content = match message.content {
            Some(serde_json::Value::String(text)) => text,
            Some(other) => other.to_string(),
            None => return Err(WikiError::api("openai", "no content in response")),
        };

        Ok(Completion {
            content,
            model: body.model.unwrap_or_else(|| self.model.clone()),
        })
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<serde_json::Value>,
}

// =============================================================================
// Embeddings
// =============================================================================

/// OpenAI Embeddings provider
pub struct OpenAiEmbeddings {
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiEmbeddings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddings")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiEmbeddings {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = resolve_api_key(&config)?;
        let api_base =
            validate_endpoint(config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE))?;
        let model = config
            .model
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let client = build_client(config.timeout_secs)?;

        Ok(Self {
            api_key,
            api_base,
            model,
            client,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };
        let url = format!("{}/embeddings", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| WikiError::api("openai", format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(WikiError::api_status("openai", status, body));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| WikiError::api("openai", format!("failed to parse response: {}", e)))?;

        body.data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| WikiError::api("openai", "no embedding in response"))
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
