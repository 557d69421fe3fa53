//! Model Provider Abstraction
//!
//! Defines the two logical external operations the pipeline consumes:
//! a text completion call and a vector embedding call. Providers are
//! stateless and safely invokable concurrently from multiple workers.

mod openai;

pub use openai::{OpenAiCompletions, OpenAiEmbeddings};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::constants::network;
use crate::types::Result;

// =============================================================================
// Responses
// =============================================================================

/// Text produced by a completion call
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text content
    pub content: String,
    /// Model that produced the response
    pub model: String,
}

/// Shared completion provider for concurrent access across workers.
pub type SharedCompletions = Arc<dyn CompletionProvider>;

/// Shared embedding provider for concurrent access across workers.
pub type SharedEmbeddings = Arc<dyn EmbeddingProvider>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for model providers
///
/// Note: API keys are handled securely - they are never serialized to output
/// and are redacted in debug output. Each provider converts the key to
/// SecretString internally for runtime protection.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "openai"
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// API key; never serialized to output for security
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Temperature for generation (completion providers only)
    pub temperature: f32,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key: None,
            api_base: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
        }
    }
}

// =============================================================================
// Provider Traits
// =============================================================================

/// Text-completion provider
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run a single completion call for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<Completion>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Vector-embedding provider
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Compute the embedding vector for one chunk of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

// =============================================================================
// Factories
// =============================================================================

/// Create a shared completion provider from configuration
pub fn create_completion_provider(config: &ProviderConfig) -> Result<SharedCompletions> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiCompletions::new(config.clone())?)),
        _ => Err(crate::types::WikiError::Config(format!(
            "Unknown completion provider: {}. Supported: openai",
            config.provider
        ))),
    }
}

/// Create a shared embedding provider from configuration
pub fn create_embedding_provider(config: &ProviderConfig) -> Result<SharedEmbeddings> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiEmbeddings::new(config.clone())?)),
        _ => Err(crate::types::WikiError::Config(format!(
            "Unknown embedding provider: {}. Supported: openai",
            config.provider
        ))),
    }
}
