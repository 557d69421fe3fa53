//! Model Integration Layer
//!
//! Provider abstraction for completion and embedding calls plus the
//! rate-limit-aware retry wrapper around completions.

pub mod provider;
pub mod retry;

pub use provider::{
    Completion, CompletionProvider, EmbeddingProvider, OpenAiCompletions, OpenAiEmbeddings,
    ProviderConfig, SharedCompletions, SharedEmbeddings, create_completion_provider,
    create_embedding_provider,
};
pub use retry::RetryingCompletionClient;
