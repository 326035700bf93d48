//! Embedding generation traits.

use async_trait::async_trait;

use crate::Result;

/// Generates dense embeddings for text content.
///
/// # Examples
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use lachat_core::traits::Embedder;
/// use lachat_core::Result;
///
/// #[derive(Debug)]
/// struct ConstantEmbedder {
///     dimension: usize,
/// }
///
/// #[async_trait]
/// impl Embedder for ConstantEmbedder {
///     async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
///         Ok(texts.iter().map(|_| vec![0.1; self.dimension]).collect())
///     }
///
///     fn dimension(&self) -> usize {
///         self.dimension
///     }
///
///     fn model_name(&self) -> &str {
///         "constant"
///     }
/// }
/// ```
#[async_trait]
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Generate embeddings for multiple texts in batch.
    ///
    /// The returned vector has one embedding per input text, in order.
    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(vec![text])
            .await?
            .pop()
            .ok_or_else(|| crate::LachatError::embedding("Embedder returned no vectors"))
    }

    /// Get the dimension of embeddings produced by this embedder.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of the embedding model.
    ///
    /// Persisted indexes record this name so that a bundle built with one
    /// model is never loaded against another.
    fn model_name(&self) -> &str;
}
