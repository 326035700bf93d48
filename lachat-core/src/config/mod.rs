//! Configuration types for the LaChat cache layer.
//!
//! Configurations are plain serde structs with defaults and a `validate()`
//! method. [`LachatConfig::load`] layers, in order of increasing priority:
//!
//! 1. built-in defaults
//! 2. an optional TOML/JSON file
//! 3. `LACHAT__*` environment variables (e.g. `LACHAT__CACHE__CACHE_DIR`)

pub mod cache;
pub mod chunking;
pub mod embedder;
pub mod retrieval;

pub use cache::*;
pub use chunking::*;
pub use embedder::*;
pub use retrieval::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::Result;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "LACHAT";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LachatConfig {
    /// Cache layout.
    pub cache: CacheConfig,

    /// Chunking parameters.
    pub chunking: ChunkingConfig,

    /// Embedding model settings.
    pub embedder: EmbedderConfig,

    /// Retrieval settings.
    pub retrieval: RetrievalConfig,
}

impl LachatConfig {
    /// Load configuration from defaults, an optional file, and the environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be parsed, an
    /// environment value has the wrong type, or validation fails.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            debug!("Loading configuration file: {}", path.display());
            builder = builder.add_source(::config::File::from(path));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        self.chunking.validate()?;
        self.embedder.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }
}
