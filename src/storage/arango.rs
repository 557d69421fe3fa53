//! ArangoDB Document Store
//!
//! HTTP backend speaking the ArangoDB REST API: the database is created
//! through the `_system` database on first use (an existing database is
//! fine), the collection is ensured, and records are written with
//! overwrite semantics so re-runs replace earlier documents.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info, warn};

use super::PersistenceGateway;
use crate::config::StoreConfig;
use crate::types::{FileAnalysis, Result, WikiError};

/// HTTP status returned for duplicate database/collection creation
const STATUS_CONFLICT: u16 = 409;

pub struct ArangoStore {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: SecretString,
    database: String,
    collection: String,
}

impl std::fmt::Debug for ArangoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArangoStore")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

impl ArangoStore {
    /// Connect to the server and ensure the database and collection exist.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let url = url::Url::parse(&config.endpoint).map_err(|e| {
            WikiError::Config(format!(
                "Invalid store endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(WikiError::Config(format!(
                "Store endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WikiError::Store(format!("failed to create HTTP client: {}", e)))?;

        let store = Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: SecretString::from(config.password.clone().unwrap_or_default()),
            database: config.database.clone(),
            collection: config.collection.clone(),
        };

        store.ensure_database().await?;
        store.ensure_collection().await?;
        Ok(store)
    }

    async fn ensure_database(&self) -> Result<()> {
        let url = format!("{}/_db/_system/_api/database", self.endpoint);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(&json!({ "name": self.database }))
            .send()
            .await
            .map_err(|e| WikiError::Store(format!("database creation request failed: {}", e)))?;

        let status = response.status().as_u16();
        if response.status().is_success() {
            info!("Created database {}", self.database);
            return Ok(());
        }
        if status == STATUS_CONFLICT {
            debug!("Database {} already exists", self.database);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(WikiError::Store(format!(
            "failed to create database {} ({}): {}",
            self.database, status, body
        )))
    }

    async fn ensure_collection(&self) -> Result<()> {
        let url = format!(
            "{}/_db/{}/_api/collection",
            self.endpoint, self.database
        );
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(&json!({ "name": self.collection }))
            .send()
            .await
            .map_err(|e| WikiError::Store(format!("collection creation request failed: {}", e)))?;

        let status = response.status().as_u16();
        if response.status().is_success() || status == STATUS_CONFLICT {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(WikiError::Store(format!(
            "failed to create collection {} ({}): {}",
            self.collection, status, body
        )))
    }

    async fn insert(&self, analysis: &FileAnalysis) -> Result<()> {
        let mut document = serde_json::to_value(analysis)?;
        if let Some(object) = document.as_object_mut() {
            object.insert(
                "_key".to_string(),
                json!(document_key(&analysis.relative_path)),
            );
        }

        let url = format!(
            "{}/_db/{}/_api/document/{}?overwriteMode=replace",
            self.endpoint, self.database, self.collection
        );
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(&document)
            .send()
            .await
            .map_err(|e| WikiError::Store(format!("document insert request failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(WikiError::Store(format!(
            "failed to store document ({}): {}",
            status, body
        )))
    }
}

#[async_trait]
impl PersistenceGateway for ArangoStore {
    async fn persist(&self, batch: &[FileAnalysis]) -> Result<usize> {
        let mut stored = 0usize;
        for analysis in batch {
            match self.insert(analysis).await {
                Ok(()) => {
                    debug!("Stored {}", analysis.relative_path);
                    stored += 1;
                }
                Err(e) => warn!("Failed to store {}: {}", analysis.relative_path, e),
            }
        }
        Ok(stored)
    }

    fn name(&self) -> &str {
        "arango"
    }
}

/// Map a relative path onto ArangoDB's document-key charset.
fn document_key(relative_path: &str) -> String {
    relative_path
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '@') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
