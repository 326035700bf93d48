//! Directory-bundle persistence for [`InMemoryVectorIndex`].
//!
//! A bundle directory holds:
//!
//! ```text
//! manifest.json   schema version, embedding model, dimension, chunk count
//! documents.bin   bincode Vec<Document>
//! vectors.bin     bincode Vec<Vec<f32>>
//! ```
//!
//! The manifest is written last. Loading checks it against the builder's
//! embedder, so a bundle built with another model reads as stale.

use async_trait::async_trait;
use lachat_core::config::EmbedderConfig;
use lachat_core::traits::{Embedder, IndexBuilder, VectorIndex};
use lachat_core::{Document, LachatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

use super::memory::{l2_normalize, InMemoryVectorIndex};

/// Current bundle format version.
pub const BUNDLE_SCHEMA_VERSION: u32 = 1;

/// Manifest file name inside a bundle.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Chunk file name inside a bundle.
pub const DOCUMENTS_FILE: &str = "documents.bin";

/// Embedding file name inside a bundle.
pub const VECTORS_FILE: &str = "vectors.bin";

/// Self-description of a persisted index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Bundle format version.
    pub schema_version: u32,
    /// Embedding model the vectors were produced with.
    pub model_name: String,
    /// Embedding dimension.
    pub dimension: usize,
    /// Number of chunks (and vectors).
    pub count: usize,
    /// Whether vectors were L2-normalized.
    pub normalized: bool,
}

/// Embeds chunks into an [`InMemoryVectorIndex`] and persists it as a bundle.
#[derive(Debug, Clone)]
pub struct InMemoryIndexBuilder {
    embedder: Arc<dyn Embedder>,
    normalize: bool,
    batch_size: usize,
}

impl InMemoryIndexBuilder {
    /// Create a builder that normalizes embeddings and embeds 32 chunks per call.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            normalize: true,
            batch_size: 32,
        }
    }

    /// Create a builder with the configured normalization and batch size.
    pub fn from_config(embedder: Arc<dyn Embedder>, config: &EmbedderConfig) -> Self {
        Self::new(embedder)
            .with_normalize(config.normalize)
            .with_batch_size(config.batch_size)
    }

    /// Set whether embeddings are L2-normalized.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the number of chunks per embedding call (at least 1).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// The embedder.
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    fn manifest(&self, count: usize) -> BundleManifest {
        BundleManifest {
            schema_version: BUNDLE_SCHEMA_VERSION,
            model_name: self.embedder.model_name().to_string(),
            dimension: self.embedder.dimension(),
            count,
            normalized: self.normalize,
        }
    }

    fn check_manifest(&self, manifest: &BundleManifest) -> Result<()> {
        let expected = self.manifest(manifest.count);
        if *manifest != expected {
            return Err(LachatError::vector_store(format!(
                "Bundle manifest {manifest:?} does not match {expected:?}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl IndexBuilder for InMemoryIndexBuilder {
    type Index = InMemoryVectorIndex;

    async fn build(&self, chunks: &[Document]) -> Result<InMemoryVectorIndex> {
        let dimension = self.embedder.dimension();
        let mut vectors = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(texts).await?;
            if embeddings.len() != batch.len() {
                return Err(LachatError::embedding(format!(
                    "Embedder returned {} vectors for {} texts",
                    embeddings.len(),
                    batch.len()
                )));
            }
            vectors.extend(embeddings);
        }

        for vector in &mut vectors {
            if vector.len() != dimension {
                return Err(LachatError::embedding(format!(
                    "Embedding has dimension {}, expected {}",
                    vector.len(),
                    dimension
                )));
            }
            if self.normalize {
                l2_normalize(vector);
            }
        }

        info!(
            "Embedded {} chunks with {}",
            chunks.len(),
            self.embedder.model_name()
        );
        InMemoryVectorIndex::new(
            Arc::clone(&self.embedder),
            chunks.to_vec(),
            vectors,
            self.normalize,
        )
    }

    async fn load(&self, path: &Path) -> Result<InMemoryVectorIndex> {
        let manifest: BundleManifest =
            serde_json::from_slice(&fs::read(path.join(MANIFEST_FILE)).await?)?;
        self.check_manifest(&manifest)?;

        let documents: Vec<Document> =
            bincode::deserialize(&fs::read(path.join(DOCUMENTS_FILE)).await?)?;
        let vectors: Vec<Vec<f32>> =
            bincode::deserialize(&fs::read(path.join(VECTORS_FILE)).await?)?;

        if documents.len() != manifest.count || vectors.len() != manifest.count {
            return Err(LachatError::vector_store(format!(
                "Bundle holds {} documents and {} vectors, manifest says {}",
                documents.len(),
                vectors.len(),
                manifest.count
            )));
        }

        debug!("Loaded {} chunks from {}", manifest.count, path.display());
        InMemoryVectorIndex::new(Arc::clone(&self.embedder), documents, vectors, self.normalize)
    }

    async fn save(&self, index: &InMemoryVectorIndex, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await?;

        let documents = bincode::serialize(index.documents())
            .map_err(|e| LachatError::vector_store(format!("Failed to encode documents: {e}")))?;
        let vectors = bincode::serialize(index.vectors())
            .map_err(|e| LachatError::vector_store(format!("Failed to encode vectors: {e}")))?;
        let manifest = serde_json::to_vec_pretty(&self.manifest(index.len()))?;

        fs::write(path.join(DOCUMENTS_FILE), documents).await?;
        fs::write(path.join(VECTORS_FILE), vectors).await?;
        fs::write(path.join(MANIFEST_FILE), manifest).await?;

        debug!("Saved {} chunks to {}", index.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_stores::memory::tests::KeywordEmbedder;
    use lachat_core::traits::VectorIndex;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_case::test_case;

    fn chunks() -> Vec<Document> {
        vec![
            Document::new("revenue grew").with_metadata("page", 0_i64),
            Document::new("cost fell").with_metadata("page", 1_i64),
            Document::new("hiring paused").with_metadata("page", 2_i64),
        ]
    }

    fn builder() -> InMemoryIndexBuilder {
        InMemoryIndexBuilder::new(Arc::new(KeywordEmbedder)).with_batch_size(2)
    }

    #[tokio::test]
    async fn test_build_save_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle");
        let builder = builder();

        let built = builder.build(&chunks()).await.unwrap();
        builder.save(&built, &path).await.unwrap();
        let loaded = builder.load(&path).await.unwrap();

        assert_eq!(loaded.documents(), built.documents());
        assert_eq!(loaded.vectors(), built.vectors());

        let a = built.similarity_search("revenue", 1).await.unwrap();
        let b = loaded.similarity_search("revenue", 1).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_build_normalizes() {
        let index = builder().build(&chunks()).await.unwrap();
        for vector in index.vectors() {
            let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test_case(MANIFEST_FILE ; "manifest")]
    #[test_case(DOCUMENTS_FILE ; "documents")]
    #[test_case(VECTORS_FILE ; "vectors")]
    #[tokio::test]
    async fn test_damaged_bundle_is_corrupt(file: &str) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle");
        let builder = builder();
        builder
            .save(&builder.build(&chunks()).await.unwrap(), &path)
            .await
            .unwrap();

        let bytes = std::fs::read(path.join(file)).unwrap();
        std::fs::write(path.join(file), &bytes[..bytes.len() / 2]).unwrap();

        let err = builder.load(&path).await.unwrap_err();
        assert!(err.is_corrupt_artifact(), "{err}");
    }

    #[tokio::test]
    async fn test_missing_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle");
        let builder = builder();
        builder
            .save(&builder.build(&chunks()).await.unwrap(), &path)
            .await
            .unwrap();
        std::fs::remove_file(path.join(VECTORS_FILE)).unwrap();

        assert!(builder.load(&path).await.unwrap_err().is_corrupt_artifact());
    }

    #[tokio::test]
    async fn test_model_or_normalization_change_is_stale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle");
        let builder = builder();
        builder
            .save(&builder.build(&chunks()).await.unwrap(), &path)
            .await
            .unwrap();

        let raw = builder.clone().with_normalize(false);
        let err = raw.load(&path).await.unwrap_err();
        assert!(matches!(err, LachatError::VectorStore { .. }));

        let mut manifest: BundleManifest =
            serde_json::from_slice(&std::fs::read(path.join(MANIFEST_FILE)).unwrap()).unwrap();
        manifest.model_name = "other-model".to_string();
        std::fs::write(path.join(MANIFEST_FILE), serde_json::to_vec(&manifest).unwrap()).unwrap();

        let err = builder.load(&path).await.unwrap_err();
        assert!(matches!(err, LachatError::VectorStore { .. }));
    }

    #[tokio::test]
    async fn test_empty_corpus_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle");
        let builder = builder();

        let built = builder.build(&[]).await.unwrap();
        builder.save(&built, &path).await.unwrap();
        let loaded = builder.load(&path).await.unwrap();

        assert!(loaded.is_empty());
        assert!(loaded.similarity_search("anything", 4).await.unwrap().is_empty());
    }
}
