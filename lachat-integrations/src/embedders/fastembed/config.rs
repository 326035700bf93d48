//! Configuration for the FastEmbed embedder.

use lachat_core::config::EmbedderConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FastEmbedError;

/// Model names this embedder can load, with their output dimension.
pub(crate) const SUPPORTED_MODELS: [(&str, usize); 7] = [
    ("intfloat/multilingual-e5-small", 384),
    ("intfloat/multilingual-e5-base", 768),
    ("intfloat/multilingual-e5-large", 1024),
    ("BAAI/bge-small-en-v1.5", 384),
    ("BAAI/bge-base-en-v1.5", 768),
    ("BAAI/bge-large-en-v1.5", 1024),
    ("sentence-transformers/all-MiniLM-L6-v2", 384),
];

/// Configuration for [`FastEmbedder`](super::FastEmbedder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastEmbedConfig {
    /// Model name
    pub model_name: String,

    /// Maximum sequence length for tokenization
    pub max_length: usize,

    /// Batch size for processing
    pub batch_size: usize,

    /// Cache directory for downloaded models (None = FastEmbed default)
    pub cache_dir: Option<PathBuf>,

    /// Whether to show download progress
    pub show_progress: bool,
}

impl Default for FastEmbedConfig {
    fn default() -> Self {
        Self::from(&EmbedderConfig::default())
    }
}

impl From<&EmbedderConfig> for FastEmbedConfig {
    fn from(config: &EmbedderConfig) -> Self {
        Self {
            model_name: config.model_name.clone(),
            max_length: 512,
            batch_size: config.batch_size,
            cache_dir: None,
            show_progress: false,
        }
    }
}

impl FastEmbedConfig {
    /// Create a new configuration with the specified model.
    pub fn new<S: Into<String>>(model_name: S) -> Self {
        Self {
            model_name: model_name.into(),
            ..Default::default()
        }
    }

    /// Set the cache directory.
    #[must_use]
    pub fn with_cache_dir<P: Into<PathBuf>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Show model download progress.
    #[must_use]
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Output dimension of the configured model, if it is supported.
    pub fn dimension(&self) -> Option<usize> {
        SUPPORTED_MODELS
            .iter()
            .find(|(name, _)| *name == self.model_name)
            .map(|(_, dimension)| *dimension)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), FastEmbedError> {
        if self.dimension().is_none() {
            return Err(FastEmbedError::Config {
                reason: format!("Unsupported model: {:?}", self.model_name),
            });
        }

        if self.max_length == 0 {
            return Err(FastEmbedError::Config {
                reason: "Max length must be greater than 0".to_string(),
            });
        }

        if self.batch_size == 0 {
            return Err(FastEmbedError::Config {
                reason: "Batch size must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_embedder_config() {
        let config = FastEmbedConfig::default();
        assert_eq!(config.model_name, "intfloat/multilingual-e5-base");
        assert_eq!(config.dimension(), Some(768));
        assert_eq!(config.batch_size, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_model_rejected() {
        let config = FastEmbedConfig::new("acme/unknown");
        assert_eq!(config.dimension(), None);
        assert!(config.validate().is_err());
    }
}
