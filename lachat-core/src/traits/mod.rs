//! Collaborator traits for the LaChat cache layer.
//!
//! The caches own hashing and persistence; format parsing, embedding and
//! index construction are delegated to implementations of these traits.

pub mod embedder;
pub mod extractor;
pub mod index;

pub use embedder::*;
pub use extractor::*;
pub use index::*;
