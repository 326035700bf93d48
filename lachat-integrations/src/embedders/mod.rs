//! Embedding model integrations.

#[cfg(feature = "fastembed")]
pub mod fastembed;
