//! Persistence Layer
//!
//! Document-store gateway for analysis batches. Storage is upsert-style
//! and keyed by `relative_path`; a record that fails to persist is logged
//! and never blocks its siblings.

mod arango;
mod sqlite;

pub use arango::ArangoStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};
use crate::types::{FileAnalysis, Result};

/// Shared store handle for async contexts.
pub type SharedStore = Arc<dyn PersistenceGateway>;

/// Batch persistence with idempotent per-record upserts.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Persist a batch, returning the number of records stored.
    ///
    /// Per-record failures are logged and skipped; an error is returned
    /// only when the store itself became unusable.
    async fn persist(&self, batch: &[FileAnalysis]) -> Result<usize>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Create a store from configuration
pub async fn create_store(config: &StoreConfig) -> Result<SharedStore> {
    match config.backend {
        StoreBackend::Sqlite => Ok(Arc::new(SqliteStore::open(&config.path)?)),
        StoreBackend::Arango => Ok(Arc::new(ArangoStore::connect(config).await?)),
    }
}
