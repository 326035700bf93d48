//! In-memory flat vector index.
//!
//! Every chunk embedding is kept in a dense `Vec`, and queries are scored
//! against all of them. This is the right shape for the per-upload corpora a
//! chat session indexes: a few thousand chunks at most.

use async_trait::async_trait;
use lachat_core::traits::{Embedder, VectorIndex};
use lachat_core::{Document, LachatError, Result, ScoredDocument};
use std::sync::Arc;
use tracing::debug;

/// Flat index of chunk embeddings with cosine scoring.
///
/// # Examples
///
/// ```rust,ignore
/// use lachat_core::traits::VectorIndex;
///
/// let hits = index.similarity_search("what was revenue in Q3?", 4).await?;
/// let diverse = index.max_marginal_relevance_search("revenue", 4, 20, 0.5).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryVectorIndex {
    embedder: Arc<dyn Embedder>,
    documents: Vec<Document>,
    vectors: Vec<Vec<f32>>,
    dimension: usize,
    normalize: bool,
}

impl InMemoryVectorIndex {
    /// Assemble an index from chunks and their embeddings.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the counts differ or any vector does not
    /// have the embedder's dimension.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        documents: Vec<Document>,
        vectors: Vec<Vec<f32>>,
        normalize: bool,
    ) -> Result<Self> {
        if documents.len() != vectors.len() {
            return Err(LachatError::validation(format!(
                "{} documents but {} vectors",
                documents.len(),
                vectors.len()
            )));
        }

        let dimension = embedder.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(LachatError::validation(format!(
                "Vector dimension {} does not match embedder dimension {}",
                bad.len(),
                dimension
            )));
        }

        Ok(Self {
            embedder,
            documents,
            vectors,
            dimension,
            normalize,
        })
    }

    /// Indexed chunks, in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Chunk embeddings, parallel to [`documents`](Self::documents).
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether embeddings are L2-normalized.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// The embedder used for queries.
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut vector = self.embedder.embed(query).await?;
        if vector.len() != self.dimension {
            return Err(LachatError::embedding(format!(
                "Query embedding has dimension {}, index has {}",
                vector.len(),
                self.dimension
            )));
        }
        if self.normalize {
            l2_normalize(&mut vector);
        }
        Ok(vector)
    }

    /// All chunk positions with their query similarity, best first.
    fn rank(&self, query: &[f32]) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored
    }

    fn scored(&self, hits: impl IntoIterator<Item = (usize, f32)>) -> Vec<ScoredDocument> {
        hits.into_iter()
            .map(|(i, score)| ScoredDocument::new(self.documents[i].clone(), score))
            .collect()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        if k == 0 || self.documents.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embed_query(query).await?;
        let mut ranked = self.rank(&query);
        ranked.truncate(k);

        debug!("Similarity search returned {} results", ranked.len());
        Ok(self.scored(ranked))
    }

    async fn max_marginal_relevance_search(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda_mult: f32,
    ) -> Result<Vec<ScoredDocument>> {
        if k == 0 || self.documents.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embed_query(query).await?;
        let mut candidates = self.rank(&query);
        candidates.truncate(fetch_k.max(k));

        let selected = maximal_marginal_relevance(&candidates, &self.vectors, k, lambda_mult);

        debug!(
            "MMR search selected {} of {} candidates",
            selected.len(),
            candidates.len()
        );
        Ok(self.scored(selected))
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}

/// Select up to `k` candidates trading query relevance against redundancy.
///
/// `candidates` holds `(position, query_similarity)` pairs, best first.
/// Each round picks the candidate maximizing
/// `lambda * relevance - (1 - lambda) * max_similarity_to_selected`.
fn maximal_marginal_relevance(
    candidates: &[(usize, f32)],
    vectors: &[Vec<f32>],
    k: usize,
    lambda_mult: f32,
) -> Vec<(usize, f32)> {
    let mut remaining: Vec<(usize, f32)> = candidates.to_vec();
    let mut selected: Vec<(usize, f32)> = Vec::with_capacity(k.min(remaining.len()));

    while selected.len() < k && !remaining.is_empty() {
        let mut best = 0;
        let mut best_score = f32::NEG_INFINITY;

        for (slot, &(position, relevance)) in remaining.iter().enumerate() {
            let redundancy = selected
                .iter()
                .map(|&(chosen, _)| cosine_similarity(&vectors[position], &vectors[chosen]))
                .fold(f32::NEG_INFINITY, f32::max);
            let redundancy = if selected.is_empty() { 0.0 } else { redundancy };

            let score = lambda_mult * relevance - (1.0 - lambda_mult) * redundancy;
            if score > best_score {
                best_score = score;
                best = slot;
            }
        }

        selected.push(remaining.remove(best));
    }

    selected
}

/// Calculate cosine similarity between two vectors.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = (a.iter().map(|x| x * x).sum::<f32>()).sqrt();
    let norm_b = (b.iter().map(|x| x * x).sum::<f32>()).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Scale `vector` to unit length in place. Zero vectors are left unchanged.
pub(crate) fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Embeds text as counts of a few marker words, in a fixed order.
    #[derive(Debug)]
    pub(crate) struct KeywordEmbedder;

    pub(crate) const KEYWORDS: [&str; 4] = ["revenue", "cost", "hiring", "weather"];

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|text| {
                    let lower = text.to_lowercase();
                    KEYWORDS
                        .iter()
                        .map(|k| lower.matches(k).count() as f32 + 0.01)
                        .collect()
                })
                .collect())
        }

        fn dimension(&self) -> usize {
            KEYWORDS.len()
        }

        fn model_name(&self) -> &str {
            "keyword-counter"
        }
    }

    async fn index(texts: &[&str]) -> InMemoryVectorIndex {
        let embedder: Arc<dyn Embedder> = Arc::new(KeywordEmbedder);
        let vectors = embedder.embed_batch(texts.to_vec()).await.unwrap();
        let documents = texts.iter().map(|t| Document::new(*t)).collect();
        InMemoryVectorIndex::new(embedder, documents, vectors, true).unwrap()
    }

    fn texts(hits: &[ScoredDocument]) -> Vec<&str> {
        hits.iter().map(|h| h.document.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_similarity_search_orders_by_score() {
        let index = index(&["hiring plans", "revenue revenue", "weather report"]).await;

        let hits = index.similarity_search("revenue", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document.text, "revenue revenue");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn test_k_larger_than_index() {
        let index = index(&["revenue", "cost"]).await;
        assert_eq!(index.similarity_search("revenue", 10).await.unwrap().len(), 2);
        assert!(index.similarity_search("revenue", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mmr_prefers_diverse_results() {
        let index = index(&[
            "revenue revenue",
            "revenue revenue revenue",
            "revenue and cost",
            "weather report",
        ])
        .await;

        let plain = index.similarity_search("revenue cost", 2).await.unwrap();
        let mmr = index
            .max_marginal_relevance_search("revenue cost", 2, 4, 0.3)
            .await
            .unwrap();

        assert_eq!(texts(&plain), vec!["revenue and cost", "revenue revenue"]);
        assert_eq!(texts(&mmr), vec!["revenue and cost", "weather report"]);
    }

    #[tokio::test]
    async fn test_mmr_with_lambda_one_matches_similarity() {
        let index = index(&["revenue", "cost", "hiring", "revenue cost"]).await;

        let plain = index.similarity_search("revenue", 3).await.unwrap();
        let mmr = index
            .max_marginal_relevance_search("revenue", 3, 4, 1.0)
            .await
            .unwrap();
        assert_eq!(texts(&mmr), texts(&plain));
    }

    #[test]
    fn test_mismatched_vectors_rejected() {
        let embedder: Arc<dyn Embedder> = Arc::new(KeywordEmbedder);
        let err = InMemoryVectorIndex::new(
            embedder.clone(),
            vec![Document::new("a")],
            vec![],
            false,
        )
        .unwrap_err();
        assert!(matches!(err, LachatError::Validation { .. }));

        let err = InMemoryVectorIndex::new(embedder, vec![Document::new("a")], vec![vec![1.0]], false)
            .unwrap_err();
        assert!(matches!(err, LachatError::Validation { .. }));
    }

    #[test]
    fn test_vector_math() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((cosine_similarity(&v, &[6.0, 8.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
