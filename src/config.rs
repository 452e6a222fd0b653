use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

use crate::id::DEFAULT_ENTITY_TYPES;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub identifiers: IdentifiersConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Base URI all entity identifiers are minted under (HTTPS, no
    /// trailing slash required; one is trimmed at generation time).
    pub base_uri: String,
}

/// Identifier generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifiersConfig {
    /// Entity types accepted for slug-based identifiers. The remote
    /// graph service owns the authoritative set; override here when it
    /// drifts from the built-in default.
    #[serde(default = "default_entity_types")]
    pub entity_types: Vec<String>,
}

impl Default for IdentifiersConfig {
    fn default() -> Self {
        Self {
            entity_types: default_entity_types(),
        }
    }
}

fn default_entity_types() -> Vec<String> {
    DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()).collect()
}

/// Validation configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    /// When true, missing recommended fields are errors, not warnings.
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in KGLINK_CONFIG environment variable
    /// 2. ./kglink.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KGLINK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("kglink.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse kglink.toml")?;

        config.validate()?;

        log::debug!(
            "loaded config: base_uri={}, {} entity types, strict={}",
            config.dataset.base_uri,
            config.identifiers.entity_types.len(),
            config.validation.strict
        );

        Ok(config)
    }

    /// Programmatic configuration for a dataset base URI, with the
    /// default entity-type set and non-strict validation.
    pub fn for_dataset(base_uri: &str) -> Self {
        Self {
            dataset: DatasetConfig {
                base_uri: base_uri.to_string(),
            },
            identifiers: IdentifiersConfig::default(),
            validation: ValidationConfig::default(),
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.dataset.base_uri)
            .with_context(|| format!("dataset.base_uri is not a valid URL: {}", self.dataset.base_uri))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "dataset.base_uri must use http or https, got scheme: {}",
                parsed.scheme()
            );
        }

        if self.identifiers.entity_types.is_empty() {
            anyhow::bail!("identifiers.entity_types must not be empty");
        }

        for entity_type in &self.identifiers.entity_types {
            let ok = !entity_type.is_empty()
                && entity_type
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
            if !ok {
                anyhow::bail!(
                    "identifiers.entity_types entries must be lowercase alphanumeric tokens, got: {:?}",
                    entity_type
                );
            }
        }

        Ok(())
    }
}
