//! Vector index traits.
//!
//! [`IndexBuilder`] is the embed-and-index collaborator consumed by the
//! vector index cache: it builds an index from chunks, and saves/loads a
//! built index as a self-describing directory bundle. [`VectorIndex`] is
//! the queryable handle it produces.

use async_trait::async_trait;
use std::path::Path;

use crate::{Document, Result, ScoredDocument};

/// A queryable vector index over a chunk collection.
#[async_trait]
pub trait VectorIndex: Send + Sync + std::fmt::Debug {
    /// Return the `k` chunks most similar to `query`, best first.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>>;

    /// Return `k` chunks selected by maximal marginal relevance.
    ///
    /// The `fetch_k` nearest candidates are re-ranked, trading relevance
    /// against diversity with `lambda_mult` (1.0 = pure relevance).
    async fn max_marginal_relevance_search(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda_mult: f32,
    ) -> Result<Vec<ScoredDocument>>;

    /// Number of indexed chunks.
    fn len(&self) -> usize;

    /// Whether the index holds no chunks.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds, persists and restores vector indexes.
#[async_trait]
pub trait IndexBuilder: Send + Sync + std::fmt::Debug {
    /// The index type this builder produces.
    type Index: VectorIndex;

    /// Embed every chunk and build a fresh index over them.
    async fn build(&self, chunks: &[Document]) -> Result<Self::Index>;

    /// Load an index previously written by [`IndexBuilder::save`].
    ///
    /// # Errors
    ///
    /// Implementations report an unreadable or inconsistent bundle with an
    /// error for which [`crate::LachatError::is_corrupt_artifact`] holds.
    async fn load(&self, path: &Path) -> Result<Self::Index>;

    /// Write `index` as a bundle into the (not yet existing) directory `path`.
    async fn save(&self, index: &Self::Index, path: &Path) -> Result<()>;
}
