//! Format-specific document extractors and their dispatch table.
//!
//! Each extractor turns one file on disk into page-, slide- or file-level
//! [`Document`](lachat_core::Document)s. The [`ExtractorRegistry`] selects an
//! extractor by the lower-cased extension of the uploaded file name.

pub mod docx;
pub mod pdf;
pub mod pptx;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use pptx::PptxExtractor;

use lachat_core::traits::Extractor;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{IndexingError, Result};

/// Metadata key naming the uploaded file a document came from.
pub const SOURCE_KEY: &str = "source";

/// Metadata key holding the zero-based page or slide index.
pub const PAGE_KEY: &str = "page";

/// Extension-to-extractor dispatch table.
///
/// # Examples
///
/// ```rust
/// use lachat_indexing::loaders::ExtractorRegistry;
///
/// let registry = ExtractorRegistry::with_defaults();
/// assert!(registry.get("pdf").is_ok());
/// assert!(registry.get("PPTX").is_ok());
/// assert!(registry.get("xyz").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the PDF, Word and PowerPoint extractors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExtractor::new()));
        registry.register(Arc::new(DocxExtractor::new()));
        registry.register(Arc::new(PptxExtractor::new()));
        registry
    }

    /// Register `extractor` for every extension it declares.
    ///
    /// A later registration for the same extension replaces the earlier one.
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        for extension in extractor.extensions() {
            debug!("Registering {} for .{}", extractor.name(), extension);
            self.extractors
                .insert(extension.to_lowercase(), Arc::clone(&extractor));
        }
    }

    /// Builder-style variant of [`register`](Self::register).
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.register(extractor);
        self
    }

    /// Look up the extractor for `extension` (case-insensitive, no dot).
    ///
    /// # Errors
    ///
    /// Returns [`IndexingError::UnsupportedFormat`] if nothing is registered.
    pub fn get(&self, extension: &str) -> Result<Arc<dyn Extractor>> {
        self.extractors
            .get(&extension.to_lowercase())
            .cloned()
            .ok_or_else(|| IndexingError::unsupported_format(extension))
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.extractors.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }
}

/// Run a blocking extraction closure on the blocking thread pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> lachat_core::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let output = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| IndexingError::text_extraction(format!("Extraction task failed: {e}")))?;
    Ok(output?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dispatch_table() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(registry.extensions(), vec!["docx", "pdf", "pptx"]);
        assert_eq!(registry.get("pdf").unwrap().name(), "PdfExtractor");
        assert_eq!(registry.get("Docx").unwrap().name(), "DocxExtractor");
        assert_eq!(registry.get("pptx").unwrap().name(), "PptxExtractor");
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let registry = ExtractorRegistry::with_defaults();
        let err = registry.get("xyz").unwrap_err();
        assert!(matches!(err, IndexingError::UnsupportedFormat { ref format } if format == "xyz"));
        assert!(registry.get("").is_err());
    }
}
