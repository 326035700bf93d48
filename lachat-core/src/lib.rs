//! # LaChat Core
//!
//! Core types, traits, hashing, and configuration for the LaChat
//! content-addressed cache layer.
//!
//! This crate provides:
//!
//! - **Data structures**: `FileBlob`, `Document`, `CacheKey`, `ScoredDocument`
//! - **Collaborator traits**: `Extractor`, `Embedder`, `IndexBuilder`, `VectorIndex`
//! - **Content hashing**: `ContentHasher` for per-file and per-corpus keys
//! - **Configuration**: validated, layered configuration structures
//! - **Error handling**: `LachatError` with corrupt-artifact classification
//!
//! ## Quick Start
//!
//! ```rust
//! use lachat_core::prelude::*;
//!
//! let blob = FileBlob::new("notes.pdf", "application/pdf", b"%PDF-1.7".to_vec());
//! let key = ContentHasher::hash_file(&blob);
//! assert_eq!(key.as_str().len(), CacheKey::HEX_LEN);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod prelude;

pub mod config;
pub mod error;
pub mod hashing;
pub mod traits;
pub mod types;

pub use error::{LachatError, Result};
pub use hashing::ContentHasher;
pub use types::{CacheKey, Document, FileBlob, Metadata, MetadataValue, ScoredDocument};

pub use traits::*;

/// Version information for the LaChat core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
