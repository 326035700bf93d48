//! Content-addressed caches.
//!
//! - [`BlobCacheStore`]: flat key-to-blob files, corrupt entries read as absent
//! - [`DocumentExtractionCache`]: per-file extraction results on a blob store
//! - [`VectorIndexCache`]: per-corpus index bundles that heal themselves

pub mod blob_store;
pub mod extraction_cache;
pub mod vector_index_cache;

pub use blob_store::{BlobCacheStore, BLOB_SCHEMA_VERSION};
pub use extraction_cache::DocumentExtractionCache;
pub use vector_index_cache::{VectorIndexCache, BUNDLE_PREFIX};
