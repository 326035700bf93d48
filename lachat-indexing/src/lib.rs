//! Document extraction, chunking, and content-addressed caches for LaChat.
//!
//! This crate provides the two cache tiers and the pieces they drive:
//!
//! - **Caches**: a blob store, the per-file extraction cache, and the
//!   per-corpus vector index cache
//! - **Loaders**: PDF, Word and PowerPoint extractors behind an extension
//!   dispatch table
//! - **Node parsers**: a recursive splitter that measures chunks in tokens
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lachat_core::FileBlob;
//! use lachat_indexing::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> lachat_core::Result<()> {
//!     let cache = DocumentExtractionCache::from_config(&Default::default());
//!     let upload = FileBlob::new("slides.pptx", "application/octet-stream", std::fs::read("slides.pptx")?);
//!
//!     let (documents, cached) = cache.load_many(&[upload]).await?;
//!     let splitter = TokenTextSplitter::from_defaults(900, 100)?;
//!     let chunks = splitter.split_documents(&documents);
//!
//!     println!("{} chunks ({} files cached)", chunks.len(), cached);
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod loaders;
pub mod node_parser;

pub use crate::cache::{BlobCacheStore, DocumentExtractionCache, VectorIndexCache};
pub use crate::node_parser::{text::TokenTextSplitter, TextSplitter};

/// Re-export commonly used types and traits.
pub mod prelude {
    pub use crate::error::{IndexingError, Result as IndexingResult};

    pub use crate::cache::{BlobCacheStore, DocumentExtractionCache, VectorIndexCache};

    pub use crate::loaders::{DocxExtractor, ExtractorRegistry, PdfExtractor, PptxExtractor};

    pub use crate::node_parser::{
        text::{CharacterTokenizer, TiktokenTokenizer, TokenTextSplitter, Tokenizer},
        TextSplitter,
    };
}
