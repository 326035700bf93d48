//! Document extraction traits.
//!
//! An extractor turns a file on disk into page- or slide-level documents.
//! The extraction cache only ever hands extractors a scoped temporary copy
//! of an upload, never the user-supplied path.

use async_trait::async_trait;
use std::path::Path;

use crate::{Document, Result};

/// Extracts text documents from one file format.
///
/// # Examples
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use lachat_core::traits::Extractor;
/// use lachat_core::{Document, Result};
/// use std::path::Path;
///
/// #[derive(Debug)]
/// struct PlainTextExtractor;
///
/// #[async_trait]
/// impl Extractor for PlainTextExtractor {
///     fn extensions(&self) -> &[&'static str] {
///         &["txt"]
///     }
///
///     async fn extract(&self, path: &Path) -> Result<Vec<Document>> {
///         let text = std::fs::read_to_string(path)?;
///         Ok(vec![Document::new(text)])
///     }
/// }
/// ```
#[async_trait]
pub trait Extractor: Send + Sync + std::fmt::Debug {
    /// Lower-case extensions (without the dot) this extractor handles.
    fn extensions(&self) -> &[&'static str];

    /// Extract documents from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed for
    /// this format. Errors are not retried by the cache layer.
    async fn extract(&self, path: &Path) -> Result<Vec<Document>>;

    /// Get a human-readable name for this extractor.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
