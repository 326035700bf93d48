//! Vector index implementations.
//!
//! - [`InMemoryVectorIndex`]: flat cosine index with MMR re-ranking
//! - [`InMemoryIndexBuilder`]: embeds chunks and persists indexes as bundles

pub mod bundle;
pub mod memory;

pub use bundle::{BundleManifest, InMemoryIndexBuilder, BUNDLE_SCHEMA_VERSION};
pub use memory::InMemoryVectorIndex;
