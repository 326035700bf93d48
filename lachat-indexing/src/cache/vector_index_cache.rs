//! Per-corpus cache of built vector indexes.
//!
//! A chunk collection is keyed by [`ContentHasher::hash_corpus`], and its
//! index is persisted as a directory bundle at `<root>/vs_<key>/`. Bundles
//! are written into a hidden sibling directory and renamed into place, and
//! a bundle that fails to load is deleted and rebuilt.

use lachat_core::config::CacheConfig;
use lachat_core::traits::IndexBuilder;
use lachat_core::{CacheKey, ContentHasher, Document, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Directory name prefix of every index bundle.
pub const BUNDLE_PREFIX: &str = "vs_";

/// Caches built indexes keyed by the chunk collection they cover.
///
/// # Examples
///
/// ```rust,ignore
/// use lachat_indexing::cache::VectorIndexCache;
///
/// let cache = VectorIndexCache::new(".cache/vector_stores", builder);
/// let (index, from_cache) = cache.get_or_build(&chunks).await?;
/// let hits = index.similarity_search("quarterly revenue", 4).await?;
/// ```
#[derive(Debug, Clone)]
pub struct VectorIndexCache<B> {
    root: PathBuf,
    builder: B,
}

impl<B: IndexBuilder> VectorIndexCache<B> {
    /// Create a cache storing bundles under `root`, built with `builder`.
    pub fn new<P: Into<PathBuf>>(root: P, builder: B) -> Self {
        Self {
            root: root.into(),
            builder,
        }
    }

    /// Create a cache at the configured vector store directory.
    pub fn from_config(config: &CacheConfig, builder: B) -> Self {
        Self::new(config.vector_store_root(), builder)
    }

    /// Directory holding the bundles.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The index builder.
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Bundle directory for `key`, whether or not it exists.
    pub fn bundle_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{BUNDLE_PREFIX}{key}"))
    }

    /// Return an index over `chunks`, and whether it was loaded from disk.
    ///
    /// A bundle that fails to load with a corrupt-artifact error is deleted
    /// and rebuilt; the failure is only logged.
    ///
    /// # Errors
    ///
    /// Embedding and build failures, load failures that are not corruption,
    /// and filesystem errors while persisting the new bundle.
    pub async fn get_or_build(&self, chunks: &[Document]) -> Result<(B::Index, bool)> {
        let key = ContentHasher::hash_corpus(chunks);
        let path = self.bundle_path(&key);

        if fs::try_exists(&path).await? {
            match self.builder.load(&path).await {
                Ok(index) => {
                    info!("Using cached vector store {}", path.display());
                    return Ok((index, true));
                }
                Err(e) if e.is_corrupt_artifact() => {
                    warn!(
                        "Vector store {} is unreadable, rebuilding: {}",
                        path.display(),
                        e
                    );
                    remove_path(&path).await?;
                }
                Err(e) => return Err(e),
            }
        }

        info!("Creating new vector store for {} chunks", chunks.len());
        let index = self.builder.build(chunks).await?;
        self.persist(&key, &index).await?;

        Ok((index, false))
    }

    /// Write `index` as the bundle for `key`, replacing any existing one.
    ///
    /// A bundle that appears under the final name while this one is being
    /// saved wins; the staged copy is discarded.
    async fn persist(&self, key: &CacheKey, index: &B::Index) -> Result<()> {
        fs::create_dir_all(&self.root).await?;

        let path = self.bundle_path(key);
        let staging = self
            .root
            .join(format!(".{BUNDLE_PREFIX}{key}.{}.tmp", uuid::Uuid::new_v4()));

        remove_path(&path).await?;
        if let Err(e) = self.builder.save(index, &staging).await {
            let _ = remove_path(&staging).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, &path).await {
            let _ = remove_path(&staging).await;
            // Another writer renamed its bundle for the same corpus into place first.
            if fs::try_exists(&path).await.unwrap_or(false) {
                debug!(
                    "Vector store {} was written concurrently, keeping it: {}",
                    path.display(),
                    e
                );
                return Ok(());
            }
            return Err(e.into());
        }

        debug!("Saved vector store {}", path.display());
        Ok(())
    }

    /// Delete every bundle and stray staging directory.
    ///
    /// Returns the number of bundles removed.
    pub async fn clear(&self) -> Result<usize> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            if name
                .strip_prefix(BUNDLE_PREFIX)
                .and_then(CacheKey::parse)
                .is_some()
            {
                remove_path(&entry.path()).await?;
                removed += 1;
            } else if name.starts_with(&format!(".{BUNDLE_PREFIX}")) && name.ends_with(".tmp") {
                remove_path(&entry.path()).await?;
            }
        }

        debug!("Cleared {} vector stores from {}", removed, self.root.display());
        Ok(removed)
    }
}

/// Remove a file or directory tree, ignoring a missing path.
async fn remove_path(path: &Path) -> Result<()> {
    let result = match fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) => Err(e),
    };

    match result {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
