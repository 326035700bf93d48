//! Per-file cache of extracted documents.
//!
//! Each upload is keyed by [`ContentHasher::hash_file`]. On a miss the bytes
//! are copied into a scoped temporary directory under a random name, the
//! extractor for the file's extension runs on that copy, and the result is
//! stored in the [`BlobCacheStore`].

use lachat_core::config::CacheConfig;
use lachat_core::{ContentHasher, Document, FileBlob, Result};
use tracing::{debug, info};

use super::BlobCacheStore;
use crate::loaders::{ExtractorRegistry, SOURCE_KEY};

/// Caches extraction results keyed by file content and metadata.
///
/// # Examples
///
/// ```rust,no_run
/// use lachat_core::FileBlob;
/// use lachat_indexing::cache::DocumentExtractionCache;
///
/// # async fn demo() -> lachat_core::Result<()> {
/// let cache = DocumentExtractionCache::from_config(&Default::default());
/// let upload = FileBlob::new("report.pdf", "application/pdf", std::fs::read("report.pdf")?);
///
/// let (documents, from_cache) = cache.load(&upload).await?;
/// println!("{} pages, cached: {}", documents.len(), from_cache);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DocumentExtractionCache {
    store: BlobCacheStore,
    registry: ExtractorRegistry,
}

impl DocumentExtractionCache {
    /// Create a cache over `store` that extracts with `registry`.
    pub fn new(store: BlobCacheStore, registry: ExtractorRegistry) -> Self {
        Self { store, registry }
    }

    /// Create a cache from configuration with the default extractors.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            BlobCacheStore::from_config(config),
            ExtractorRegistry::with_defaults(),
        )
    }

    /// The underlying blob store.
    pub fn store(&self) -> &BlobCacheStore {
        &self.store
    }

    /// The extractor dispatch table.
    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Return the documents of `blob`, and whether they came from the cache.
    ///
    /// Every returned document's `source` metadata is the upload's name.
    ///
    /// # Errors
    ///
    /// - [`lachat_core::LachatError::UnsupportedFormat`] if no extractor handles the
    ///   file's extension; nothing is written to the cache.
    /// - Extractor failures, unchanged and without retry.
    /// - Filesystem errors writing the temporary copy or the cache entry.
    pub async fn load(&self, blob: &FileBlob) -> Result<(Vec<Document>, bool)> {
        let key = ContentHasher::hash_file(blob);

        if let Some(documents) = self.store.get::<Vec<Document>>(&key).await? {
            debug!("Using cached extraction for {} ({})", blob.name, key);
            return Ok((documents, true));
        }

        let extension = blob.extension().unwrap_or_default();
        let extractor = self.registry.get(&extension)?;

        let temp_dir = tempfile::Builder::new().prefix("lachat-").tempdir()?;
        let temp_path = temp_dir
            .path()
            .join(format!("{}.{extension}", uuid::Uuid::new_v4()));
        tokio::fs::write(&temp_path, &blob.content).await?;

        let mut documents = extractor.extract(&temp_path).await?;
        drop(temp_dir);

        for document in &mut documents {
            document
                .metadata
                .insert(SOURCE_KEY.to_string(), blob.name.as_str().into());
        }

        info!(
            "Extracted {} documents from {} with {}",
            documents.len(),
            blob.name,
            extractor.name()
        );

        self.store.put(&key, &documents).await?;
        Ok((documents, false))
    }

    /// Load every blob in order, stopping at the first failure.
    ///
    /// Returns the concatenated documents and the number of blobs served
    /// from the cache.
    ///
    /// # Errors
    ///
    /// The first error from [`load`](Self::load). Blobs before the failing
    /// one keep their cache entries.
    pub async fn load_many(&self, blobs: &[FileBlob]) -> Result<(Vec<Document>, usize)> {
        let mut all_documents = Vec::new();
        let mut cached = 0;

        for blob in blobs {
            let (documents, from_cache) = self.load(blob).await?;
            if from_cache {
                cached += 1;
            }
            all_documents.extend(documents);
        }

        info!(
            "Loaded {} documents from {} files ({} cached)",
            all_documents.len(),
            blobs.len(),
            cached
        );
        Ok((all_documents, cached))
    }

    /// Remove every cached extraction. Returns the number of entries removed.
    pub async fn clear(&self) -> Result<usize> {
        self.store.clear().await
    }
}

impl From<BlobCacheStore> for DocumentExtractionCache {
    fn from(store: BlobCacheStore) -> Self {
        Self::new(store, ExtractorRegistry::with_defaults())
    }
}
