//! Configuration for the embedding model.

use serde::{Deserialize, Serialize};

use crate::{LachatError, Result};

/// Embedding model settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    /// Model identifier.
    pub model_name: String,

    /// L2-normalize embeddings before indexing and querying.
    pub normalize: bool,

    /// Batch size for embedding calls.
    pub batch_size: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_name: "intfloat/multilingual-e5-base".to_string(),
            normalize: true,
            batch_size: 32,
        }
    }
}

impl EmbedderConfig {
    /// Create a configuration for the given model.
    pub fn new<S: Into<String>>(model_name: S) -> Self {
        Self {
            model_name: model_name.into(),
            ..Default::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.model_name.is_empty() {
            return Err(LachatError::configuration("Model name cannot be empty"));
        }

        if self.batch_size == 0 {
            return Err(LachatError::configuration("Batch size must be greater than 0"));
        }

        Ok(())
    }
}
