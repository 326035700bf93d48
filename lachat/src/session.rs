//! Upload-to-index ingestion with both cache tiers.
//!
//! [`IngestSession`] is the explicit context object a chat front end keeps
//! per user session. It owns the extraction cache, the splitter and the
//! vector index cache, and runs
//!
//! ```text
//! uploads ─► load_many ─► split_documents ─► get_or_build ─► index
//! ```

use lachat_core::config::{LachatConfig, SearchType};
use lachat_core::traits::{Embedder, IndexBuilder, VectorIndex};
use lachat_core::{Document, FileBlob, Result, ScoredDocument};
use lachat_indexing::cache::{DocumentExtractionCache, VectorIndexCache};
use lachat_indexing::node_parser::TextSplitter;
use lachat_indexing::TokenTextSplitter;
use lachat_integrations::InMemoryIndexBuilder;
use std::sync::Arc;
use tracing::info;

/// Outcome of one [`IngestSession::process`] call.
#[derive(Debug)]
pub struct IngestReport<I> {
    /// Documents (pages, slides, files) extracted across all uploads.
    pub documents: usize,
    /// Chunks fed to the index.
    pub chunks: usize,
    /// Uploads whose extraction came from the cache.
    pub cached_files: usize,
    /// Whether the index was loaded from a persisted bundle.
    pub index_from_cache: bool,
    /// The queryable index.
    pub index: I,
}

/// Counts of entries removed by [`IngestSession::clear_caches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearedCaches {
    /// Extraction cache entries removed.
    pub extractions: usize,
    /// Vector index bundles removed.
    pub vector_stores: usize,
}

/// Per-session ingestion pipeline over the two cache tiers.
///
/// # Examples
///
/// ```rust,no_run
/// use lachat::prelude::*;
/// use lachat::session::IngestSession;
/// use lachat_integrations::FastEmbedder;
/// use std::sync::Arc;
///
/// # async fn demo() -> Result<()> {
/// let config = LachatConfig::load(None)?;
/// let embedder = FastEmbedder::from_config((&config.embedder).into()).await?;
/// let session = IngestSession::new(config, Arc::new(embedder))?;
///
/// let upload = FileBlob::new("report.pdf", "application/pdf", std::fs::read("report.pdf")?);
/// let report = session.process(&[upload]).await?;
/// let context = session.retrieve(&report.index, "What changed in Q3?").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IngestSession<B: IndexBuilder = InMemoryIndexBuilder> {
    config: LachatConfig,
    extraction_cache: DocumentExtractionCache,
    splitter: Arc<dyn TextSplitter>,
    vector_cache: VectorIndexCache<B>,
}

impl IngestSession<InMemoryIndexBuilder> {
    /// Create a session with the default extractors, a `tiktoken` splitter
    /// and an in-memory index built with `embedder`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid or the tokenizer
    /// encoding is unknown.
    pub fn new(config: LachatConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        config.validate()?;
        let splitter = TokenTextSplitter::from_config(&config.chunking)?;
        let builder = InMemoryIndexBuilder::from_config(embedder, &config.embedder);

        Ok(Self::from_parts(
            DocumentExtractionCache::from_config(&config.cache),
            Arc::new(splitter),
            VectorIndexCache::from_config(&config.cache, builder),
            config,
        ))
    }
}

impl<B: IndexBuilder> IngestSession<B> {
    /// Assemble a session from explicit parts.
    pub fn from_parts(
        extraction_cache: DocumentExtractionCache,
        splitter: Arc<dyn TextSplitter>,
        vector_cache: VectorIndexCache<B>,
        config: LachatConfig,
    ) -> Self {
        Self {
            config,
            extraction_cache,
            splitter,
            vector_cache,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &LachatConfig {
        &self.config
    }

    /// The document extraction cache.
    pub fn extraction_cache(&self) -> &DocumentExtractionCache {
        &self.extraction_cache
    }

    /// The vector index cache.
    pub fn vector_cache(&self) -> &VectorIndexCache<B> {
        &self.vector_cache
    }

    /// Split documents into chunks with the session splitter.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        self.splitter.split_documents(documents)
    }

    /// Extract, chunk and index `files`.
    ///
    /// # Errors
    ///
    /// Fails fast on the first unsupported or unreadable upload, and on any
    /// embedding or index build failure.
    pub async fn process(&self, files: &[FileBlob]) -> Result<IngestReport<B::Index>> {
        let (documents, cached_files) = self.extraction_cache.load_many(files).await?;
        let chunks = self.split_documents(&documents);
        let (index, index_from_cache) = self.vector_cache.get_or_build(&chunks).await?;

        info!(
            "Ingested {} files: {} documents, {} chunks (index cached: {})",
            files.len(),
            documents.len(),
            chunks.len(),
            index_from_cache
        );

        Ok(IngestReport {
            documents: documents.len(),
            chunks: chunks.len(),
            cached_files,
            index_from_cache,
            index,
        })
    }

    /// Retrieve context chunks for `query` using the retrieval settings.
    ///
    /// # Errors
    ///
    /// Embedding failures for the query.
    pub async fn retrieve(&self, index: &B::Index, query: &str) -> Result<Vec<ScoredDocument>> {
        let retrieval = &self.config.retrieval;
        match retrieval.search_type {
            SearchType::Similarity => index.similarity_search(query, retrieval.top_k).await,
            SearchType::Mmr => {
                index
                    .max_marginal_relevance_search(
                        query,
                        retrieval.top_k,
                        retrieval.fetch_k,
                        retrieval.lambda_mult,
                    )
                    .await
            }
        }
    }

    /// Remove every entry from both cache tiers.
    ///
    /// # Errors
    ///
    /// Filesystem errors other than a missing cache directory.
    pub async fn clear_caches(&self) -> Result<ClearedCaches> {
        let cleared = ClearedCaches {
            extractions: self.extraction_cache.clear().await?,
            vector_stores: self.vector_cache.clear().await?,
        };
        info!(
            "Cleared {} extractions and {} vector stores",
            cleared.extractions, cleared.vector_stores
        );
        Ok(cleared)
    }
}
