//! CodeWiki - AI-Assisted Source Tree Documentation
//!
//! Walks a source directory, summarizes each file with a completion model,
//! embeds overlapping content chunks, extracts structural facts and renders
//! the results as a Markdown wiki backed by a document store.
//!
//! ## Core Features
//!
//! - **Concurrent Pipeline**: bounded worker pool, per-file failure isolation
//! - **Rate-Limit-Aware Retry**: exponential backoff around completion calls
//! - **Pluggable Stores**: local SQLite or ArangoDB over HTTP
//! - **Deterministic Output**: stable Markdown regardless of completion order
//!
//! ## Quick Start
//!
//! ```ignore
//! use codewiki::{AnalysisScheduler, FileAnalysisWorker, RetryingCompletionClient};
//!
//! let worker = FileAnalysisWorker::new(
//!     RetryingCompletionClient::new(completions),
//!     embeddings,
//! );
//! let scheduler = AnalysisScheduler::new(worker, concurrency);
//! let batch = scheduler.analyze(&root).await?;
//! let markdown = codewiki::wiki::render_wiki(&batch);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider abstraction and retry policy
//! - [`analyzer`]: discovery, chunking, extraction and the scheduler
//! - [`storage`]: document-store backends
//! - [`config`]: layered configuration
//! - [`wiki`]: Markdown rendering

pub mod ai;
pub mod analyzer;
pub mod config;
pub mod constants;
pub mod storage;
pub mod types;
pub mod wiki;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, StoreBackend};

// Error Types
pub use types::{FileAnalysis, Result, WikiError};

// Storage
pub use storage::{PersistenceGateway, SharedStore, create_store};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use analyzer::{AnalysisScheduler, Chunker, FileAnalysisWorker, SourceScanner};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    Completion, CompletionProvider, EmbeddingProvider, ProviderConfig, RetryingCompletionClient,
    SharedCompletions, SharedEmbeddings, create_completion_provider, create_embedding_provider,
};
