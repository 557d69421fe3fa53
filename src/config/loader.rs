//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Project config (codewiki.toml)
//! 3. Environment variables (CODEWIKI_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::Path;

use tracing::debug;

use super::types::Config;
use crate::types::{Result, WikiError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the full resolution chain:
    /// defaults → project file → env vars.
    ///
    /// A missing project file is not an error; the defaults and environment
    /// still apply.
    pub fn load(project_file: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if project_file.exists() {
            debug!("Loading project config from: {}", project_file.display());
            figment = figment.merge(Toml::file(project_file));
        }

        // e.g. CODEWIKI_LLM_MODEL -> llm.model
        figment = figment.merge(Env::prefixed("CODEWIKI_").split("_").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| WikiError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only (defaults still apply).
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| WikiError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_project_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ConfigLoader::load(&dir.path().join("codewiki.toml")).expect("load");
        assert_eq!(config.llm.model, "gpt-4.1-mini");
        assert_eq!(config.embedding.model, "text-embedding-3-small");
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("codewiki.toml");
        let mut file = std::fs::File::create(&path).expect("create config");
        writeln!(
            file,
            r#"
[llm]
model = "gpt-4.1"

[analysis]
chunk_size = 1000
chunk_overlap = 100

[output]
path = "out/wiki.md"
"#
        )
        .expect("write config");

        let config = ConfigLoader::load(&path).expect("load");
        assert_eq!(config.llm.model, "gpt-4.1");
        assert_eq!(config.analysis.chunk_size, 1000);
        assert_eq!(config.analysis.chunk_overlap, 100);
        assert_eq!(config.output.path, std::path::PathBuf::from("out/wiki.md"));
        // Untouched sections keep their defaults
        assert_eq!(config.store.database, "codewiki");
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("codewiki.toml");
        std::fs::write(&path, "[analysis]\nchunk_size = 100\nchunk_overlap = 100\n")
            .expect("write config");

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
