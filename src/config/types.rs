//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Values resolve from defaults, then the project `codewiki.toml`, then
//! `CODEWIKI_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{chunking, network, scanner};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Source discovery and analysis settings
    pub analysis: AnalysisConfig,

    /// Completion model settings
    pub llm: LlmConfig,

    /// Embedding model settings
    pub embedding: EmbeddingConfig,

    /// Document store settings
    pub store: StoreConfig,

    /// Wiki output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisConfig::default(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            store: StoreConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `WikiError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.analysis.chunk_size == 0 {
            return Err(crate::types::WikiError::Config(
                "analysis.chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.analysis.chunk_overlap >= self.analysis.chunk_size {
            return Err(crate::types::WikiError::Config(format!(
                "analysis.chunk_overlap ({}) must be smaller than analysis.chunk_size ({})",
                self.analysis.chunk_overlap, self.analysis.chunk_size
            )));
        }

        if self.analysis.concurrency == Some(0) {
            return Err(crate::types::WikiError::Config(
                "analysis.concurrency must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(crate::types::WikiError::Config(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 || self.embedding.timeout_secs == 0 {
            return Err(crate::types::WikiError::Config(
                "provider timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Worker pool size; defaults to available parallelism when unset
    pub concurrency: Option<usize>,

    /// Extension of files considered for analysis
    pub extension: String,

    /// Package-initializer filename excluded from analysis
    pub initializer: String,

    /// Target chunk size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            extension: scanner::SOURCE_EXTENSION.to_string(),
            initializer: scanner::PACKAGE_INITIALIZER.to_string(),
            chunk_size: chunking::CHUNK_SIZE,
            chunk_overlap: chunking::CHUNK_OVERLAP,
        }
    }
}

impl AnalysisConfig {
    /// Effective worker pool size for this run.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type (currently "openai")
    pub provider: String,

    /// Completion model identifier
    pub model: String,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// API key; never serialized to output for security
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4.1-mini".to_string(),
            api_base: None,
            api_key: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider type (currently "openai")
    pub provider: String,

    /// Embedding model identifier
    pub model: String,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// API key; never serialized to output for security
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_base: None,
            api_key: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Document store backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local SQLite file (default)
    #[default]
    Sqlite,
    /// ArangoDB over HTTP
    Arango,
}

impl StoreBackend {
    /// Parse backend from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "arango" => Some(Self::Arango),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,

    /// SQLite database path (sqlite backend)
    pub path: PathBuf,

    /// Server endpoint (arango backend)
    pub endpoint: String,

    /// Server username (arango backend)
    pub username: String,

    /// Server password; never serialized to output for security
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Database name (arango backend)
    pub database: String,

    /// Collection name (arango backend)
    pub collection: String,

    /// Request timeout in seconds (arango backend)
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: PathBuf::from(".codewiki/wiki.db"),
            endpoint: "http://localhost:8529".to_string(),
            username: "root".to_string(),
            password: None,
            database: "codewiki".to_string(),
            collection: "files".to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Markdown output path; parent directories are created as needed
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("docs/wiki.md"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.extension, "py");
        assert_eq!(config.analysis.initializer, "__init__.py");
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
    }

    #[test]
    fn test_overlap_must_stay_below_chunk_size() {
        let mut config = Config::default();
        config.analysis.chunk_overlap = config.analysis.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.analysis.concurrency = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_concurrency_prefers_explicit_value() {
        let mut analysis = AnalysisConfig::default();
        analysis.concurrency = Some(3);
        assert_eq!(analysis.effective_concurrency(), 3);

        analysis.concurrency = None;
        assert!(analysis.effective_concurrency() >= 1);
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(StoreBackend::parse("sqlite"), Some(StoreBackend::Sqlite));
        assert_eq!(StoreBackend::parse("Arango"), Some(StoreBackend::Arango));
        assert_eq!(StoreBackend::parse("mongo"), None);
    }

    #[test]
    fn test_secrets_never_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        config.store.password = Some("hunter2".to_string());

        let rendered = toml::to_string(&config).expect("serialize config");
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("hunter2"));
    }
}
