//! Prelude module for convenient imports.

pub use crate::config::{
    CacheConfig, ChunkingConfig, EmbedderConfig, LachatConfig, RetrievalConfig, SearchType,
};
pub use crate::error::{LachatError, Result};
pub use crate::hashing::ContentHasher;
pub use crate::traits::{Embedder, Extractor, IndexBuilder, VectorIndex};
pub use crate::types::{CacheKey, Document, FileBlob, Metadata, MetadataValue, ScoredDocument};
