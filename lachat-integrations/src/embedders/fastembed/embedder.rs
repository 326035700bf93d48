//! `FastEmbed` embedder implementation.

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use lachat_core::{traits::Embedder, Result as CoreResult};
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    config::FastEmbedConfig,
    error::{FastEmbedError, Result},
};

/// Local ONNX embedder backed by `fastembed`.
///
/// Inference runs on the blocking thread pool. Failures are reported once;
/// this embedder does not retry.
pub struct FastEmbedder {
    config: FastEmbedConfig,
    dimension: usize,
    model: Arc<TextEmbedding>,
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("config", &self.config)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl FastEmbedder {
    /// Create an embedder with the default model.
    pub async fn new() -> Result<Self> {
        Self::from_config(FastEmbedConfig::default()).await
    }

    /// Create an embedder for a specific model name.
    pub async fn with_model<S: Into<String>>(model_name: S) -> Result<Self> {
        Self::from_config(FastEmbedConfig::new(model_name)).await
    }

    /// Create an embedder from a custom configuration.
    ///
    /// The model is downloaded on first use, which may take a while.
    pub async fn from_config(config: FastEmbedConfig) -> Result<Self> {
        config.validate()?;
        let dimension = config.dimension().unwrap_or_default();
        let embedding_model = Self::parse_model_name(&config.model_name)?;

        info!("Initializing FastEmbed model: {}", config.model_name);

        let mut init_options = InitOptions::new(embedding_model)
            .with_max_length(config.max_length)
            .with_show_download_progress(config.show_progress);
        if let Some(cache_dir) = &config.cache_dir {
            init_options = init_options.with_cache_dir(cache_dir.clone());
        }

        let model_name = config.model_name.clone();
        let model = tokio::task::spawn_blocking(move || TextEmbedding::try_new(init_options))
            .await
            .map_err(|e| FastEmbedError::ModelInit {
                model: model_name.clone(),
                reason: e.to_string(),
            })?
            .map_err(|e| FastEmbedError::ModelInit {
                model: model_name,
                reason: e.to_string(),
            })?;

        info!("FastEmbed model initialized successfully");

        Ok(Self {
            config,
            dimension,
            model: Arc::new(model),
        })
    }

    /// Get the configuration used by this embedder.
    pub fn config(&self) -> &FastEmbedConfig {
        &self.config
    }

    /// Parse model name string to `EmbeddingModel` enum.
    fn parse_model_name(model_name: &str) -> Result<EmbeddingModel> {
        match model_name {
            "intfloat/multilingual-e5-small" => Ok(EmbeddingModel::MultilingualE5Small),
            "intfloat/multilingual-e5-base" => Ok(EmbeddingModel::MultilingualE5Base),
            "intfloat/multilingual-e5-large" => Ok(EmbeddingModel::MultilingualE5Large),
            "BAAI/bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "BAAI/bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            "BAAI/bge-large-en-v1.5" => Ok(EmbeddingModel::BGELargeENV15),
            "sentence-transformers/all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            _ => Err(FastEmbedError::ModelInit {
                model: model_name.to_string(),
                reason: format!("Unsupported model: {model_name}"),
            }),
        }
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed_batch(&self, texts: Vec<&str>) -> CoreResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let texts: Vec<String> = texts.iter().map(|s| (*s).to_string()).collect();
        let count = texts.len();
        let batch_size = self.config.batch_size;
        let model = Arc::clone(&self.model);

        let embeddings = tokio::task::spawn_blocking(move || model.embed(texts, Some(batch_size)))
            .await
            .map_err(|e| FastEmbedError::Embedding {
                reason: e.to_string(),
            })?
            .map_err(|e| FastEmbedError::Embedding {
                reason: e.to_string(),
            })?;

        debug!("Generated {} embeddings", count);
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_model_parses() {
        for (name, _) in super::super::config::SUPPORTED_MODELS {
            assert!(FastEmbedder::parse_model_name(name).is_ok(), "{name}");
        }
        assert!(FastEmbedder::parse_model_name("acme/unknown").is_err());
    }

    // Requires a model download.
    #[tokio::test]
    #[ignore]
    async fn test_embedding_generation() {
        let embedder = FastEmbedder::new().await.unwrap();
        let embeddings = embedder.embed_batch(vec!["Hello", "World"]).await.unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), embedder.dimension());
    }
}
