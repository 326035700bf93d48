//! Configuration for the on-disk cache tiers.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{LachatError, Result};

/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Default sub-directory (under the cache root) holding vector index bundles.
pub const DEFAULT_VECTOR_STORE_DIR: &str = "vector_stores";

/// Default file extension for extraction cache entries.
pub const DEFAULT_BLOB_EXTENSION: &str = "bin";

/// Where and how cache entries are laid out on disk.
///
/// ```text
/// <cache_dir>/<file_hash>.<blob_extension>
/// <cache_dir>/<vector_store_dir>/vs_<corpus_hash>/
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory of both cache tiers.
    pub cache_dir: PathBuf,

    /// Sub-directory name for vector index bundles.
    pub vector_store_dir: String,

    /// Extension of extraction cache entries (without the dot).
    pub blob_extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            vector_store_dir: DEFAULT_VECTOR_STORE_DIR.to_string(),
            blob_extension: DEFAULT_BLOB_EXTENSION.to_string(),
        }
    }
}

impl CacheConfig {
    /// Create a configuration rooted at `cache_dir`.
    pub fn new<P: Into<PathBuf>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ..Default::default()
        }
    }

    /// Directory holding vector index bundles.
    pub fn vector_store_root(&self) -> PathBuf {
        self.cache_dir.join(&self.vector_store_dir)
    }

    /// Root directory of the extraction cache.
    pub fn blob_root(&self) -> &Path {
        &self.cache_dir
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err(LachatError::configuration("Cache directory cannot be empty"));
        }

        if self.vector_store_dir.is_empty()
            || self.vector_store_dir.contains(['/', '\\'])
            || self.vector_store_dir == ".."
        {
            return Err(LachatError::configuration(format!(
                "Vector store directory must be a single path component: {:?}",
                self.vector_store_dir
            )));
        }

        if self.blob_extension.is_empty()
            || !self.blob_extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(LachatError::configuration(format!(
                "Blob extension must be non-empty ASCII alphanumerics: {:?}",
                self.blob_extension
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = CacheConfig::new("/tmp/lachat");
        assert_eq!(config.vector_store_root(), PathBuf::from("/tmp/lachat/vector_stores"));
        assert_eq!(config.blob_root(), Path::new("/tmp/lachat"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_nested_store_dir() {
        let config = CacheConfig {
            vector_store_dir: "a/b".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CacheConfig {
            blob_extension: ".pkl".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
