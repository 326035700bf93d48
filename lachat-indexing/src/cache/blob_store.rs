//! Flat key-to-blob persistence under a cache directory.
//!
//! Each entry is one file, `<root>/<key>.<ext>`, holding a bincode encoded
//! [`Envelope`] of a schema version and the payload. Entries are written to a
//! hidden temporary file first and renamed into place, so a reader never
//! observes a half-written entry under its final name.

use lachat_core::{CacheKey, LachatError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Current on-disk schema version of blob entries.
///
/// Bump this whenever a cached payload type changes shape; older entries
/// then read as absent and are rebuilt.
pub const BLOB_SCHEMA_VERSION: u32 = 1;

const TEMP_SUFFIX: &str = "tmp";

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema_version: u32,
    payload: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    schema_version: u32,
    payload: T,
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    schema_version: u32,
}

/// Persists one serializable value per [`CacheKey`] under a root directory.
///
/// The root directory is created lazily by the first [`put`](Self::put).
///
/// # Examples
///
/// ```rust,no_run
/// use lachat_core::{ContentHasher, Document};
/// use lachat_indexing::cache::BlobCacheStore;
///
/// # async fn demo() -> lachat_core::Result<()> {
/// let store = BlobCacheStore::new(".cache", "bin");
/// let key = ContentHasher::content_hash(b"hello");
///
/// store.put(&key, &vec![Document::new("hello")]).await?;
/// let docs: Option<Vec<Document>> = store.get(&key).await?;
/// assert!(docs.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BlobCacheStore {
    root: PathBuf,
    extension: String,
}

impl BlobCacheStore {
    /// Create a store rooted at `root` whose entries use `extension`.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(root: P, extension: S) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Create a store from the cache configuration.
    pub fn from_config(config: &lachat_core::config::CacheConfig) -> Self {
        Self::new(config.blob_root(), config.blob_extension.clone())
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for `key`, whether or not it exists.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{key}.{}", self.extension))
    }

    /// Serialize `value` and store it under `key`, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// Fails if the root directory cannot be created or written to. A
    /// permission problem surfaces here, on the first write attempt.
    pub async fn put<T: Serialize + Sync>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let bytes = bincode::serialize(&EnvelopeRef {
            schema_version: BLOB_SCHEMA_VERSION,
            payload: value,
        })
        .map_err(|e| LachatError::internal(format!("Failed to encode cache entry: {e}")))?;

        fs::create_dir_all(&self.root).await?;

        let final_path = self.path_for(key);
        let temp_path = self
            .root
            .join(format!(".{key}.{}.{TEMP_SUFFIX}", uuid::Uuid::new_v4()));

        let written = match fs::write(&temp_path, &bytes).await {
            Ok(()) => fs::rename(&temp_path, &final_path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(
            "Stored cache entry {} ({} bytes)",
            final_path.display(),
            bytes.len()
        );
        Ok(())
    }

    /// Load the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the entry is missing, undecodable, or was
    /// written with another schema version. Such entries are left in place
    /// and overwritten by the next [`put`](Self::put).
    ///
    /// # Errors
    ///
    /// Only environment faults that are not corruption, such as a permission
    /// denied on read, are returned.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        let path = self.path_for(key);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss: {}", key);
                return Ok(None);
            }
            Err(e) => {
                let err = LachatError::from(e);
                if err.is_corrupt_artifact() {
                    warn!("Unreadable cache entry {}: {}", path.display(), err);
                    return Ok(None);
                }
                return Err(err);
            }
        };

        match decode::<T>(&bytes) {
            Ok(value) => {
                debug!("Cache hit: {}", key);
                Ok(Some(value))
            }
            Err(err) if err.is_corrupt_artifact() => {
                warn!("Ignoring corrupt cache entry {}: {}", path.display(), err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Whether an entry file exists for `key`.
    ///
    /// This is a path check only; prefer [`get`](Self::get) and its absent
    /// result over checking first and reading second.
    pub async fn exists(&self, key: &CacheKey) -> bool {
        fs::try_exists(self.path_for(key)).await.unwrap_or(false)
    }

    /// Delete the entry for `key`. Returns whether an entry was removed.
    pub async fn remove(&self, key: &CacheKey) -> Result<bool> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every entry and stray temporary file owned by this store.
    ///
    /// Sub-directories and files that do not look like entries are left
    /// alone. Returns the number of entries removed.
    pub async fn clear(&self) -> Result<usize> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            if self.is_entry_name(name) {
                fs::remove_file(entry.path()).await?;
                removed += 1;
            } else if is_temp_name(name) {
                fs::remove_file(entry.path()).await?;
            }
        }

        debug!("Cleared {} cache entries from {}", removed, self.root.display());
        Ok(removed)
    }

    fn is_entry_name(&self, name: &str) -> bool {
        name.strip_suffix(self.extension.as_str())
            .and_then(|stem| stem.strip_suffix('.'))
            .and_then(CacheKey::parse)
            .is_some()
    }
}

fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(&format!(".{TEMP_SUFFIX}"))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let header: EnvelopeHeader = bincode::deserialize(bytes)?;
    if header.schema_version != BLOB_SCHEMA_VERSION {
        return Err(LachatError::deserialization(format!(
            "Cache entry schema version {} does not match {}",
            header.schema_version, BLOB_SCHEMA_VERSION
        )));
    }

    let envelope: Envelope<T> = bincode::deserialize(bytes)?;
    Ok(envelope.payload)
}
