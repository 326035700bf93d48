//! # LaChat
//!
//! Content-addressed caching for a retrieval-augmented chat assistant.
//! Uploaded documents are extracted once per distinct file, and the vector
//! index over a set of chunks is built once per distinct corpus; both are
//! persisted on the local filesystem.
//!
//! ## Quick Start
//!
//! ```rust
//! use lachat::prelude::*;
//!
//! let upload = FileBlob::new("notes.pdf", "application/pdf", b"%PDF-1.7".to_vec());
//! let key = ContentHasher::hash_file(&upload);
//! println!("extraction cache key: {key}");
//! ```
//!
//! ## Architecture
//!
//! - **lachat-core**: types, traits, hashing, configuration, errors
//! - **lachat-indexing**: extractors, splitter, and both cache tiers
//! - **lachat-integrations**: in-memory vector index and `FastEmbed` embedder

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;
pub mod session;

// Re-export all public APIs from sub-crates
pub use lachat_core as core;
pub use lachat_indexing as indexing;
pub use lachat_integrations as integrations;

pub use session::{ClearedCaches, IngestReport, IngestSession};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use lachat_core::prelude::*;

    pub use lachat_indexing::prelude::{
        BlobCacheStore, DocumentExtractionCache, ExtractorRegistry, TextSplitter,
        TokenTextSplitter, VectorIndexCache,
    };
    pub use lachat_integrations::{InMemoryIndexBuilder, InMemoryVectorIndex};

    pub use crate::logging::init_tracing;
    pub use crate::session::{IngestReport, IngestSession};
}

/// Version information for LaChat.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
