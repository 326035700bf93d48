//! Embedding and vector index integrations for LaChat.
//!
//! This crate provides concrete implementations of the collaborator traits
//! defined in `lachat-core`:
//!
//! - **Embedders**: local `FastEmbed` models (feature `fastembed`, on by default)
//! - **Vector indexes**: a flat in-memory index with similarity and MMR search,
//!   persisted as a self-describing directory bundle
//!
//! # Feature Flags
//!
//! - `fastembed` (default): local ONNX embeddings via `fastembed`

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod embedders;
pub mod vector_stores;

pub use vector_stores::{InMemoryIndexBuilder, InMemoryVectorIndex};

#[cfg(feature = "fastembed")]
pub use embedders::fastembed::{FastEmbedConfig, FastEmbedder};
