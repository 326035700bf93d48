//! Core data types for the LaChat cache layer.
//!
//! This module contains the data model shared by every crate:
//!
//! - [`FileBlob`]: one uploaded file (name, size, MIME type, bytes)
//! - [`Document`]: extracted text or a chunk of it, with primitive metadata
//! - [`CacheKey`]: a content-derived hex digest naming a cache entry
//! - [`ScoredDocument`]: a retrieval hit

pub mod cache_key;
pub mod document;
pub mod file_blob;

pub use cache_key::CacheKey;
pub use document::{Document, Metadata, MetadataValue, ScoredDocument};
pub use file_blob::FileBlob;
