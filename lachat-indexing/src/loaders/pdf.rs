//! PDF extraction.

use async_trait::async_trait;
use lachat_core::traits::Extractor;
use lachat_core::{Document, Result as CoreResult};
use std::path::Path;
use tracing::debug;

use super::{run_blocking, PAGE_KEY, SOURCE_KEY};
use crate::error::IndexingError;

/// Extracts one document per PDF page.
///
/// Pages are numbered from zero in the `page` metadata. Pages without any
/// extractable text (scans, blank pages) are kept as empty documents so
/// page numbers stay aligned with the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    fn extensions(&self) -> &[&'static str] {
        &["pdf"]
    }

    async fn extract(&self, path: &Path) -> CoreResult<Vec<Document>> {
        debug!("Extracting text from PDF: {}", path.display());

        let bytes = tokio::fs::read(path).await?;
        let pages = run_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|e| IndexingError::text_extraction(format!("PDF extraction failed: {e}")))
        })
        .await?;

        let source = path.display().to_string();
        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(page, text)| {
                Document::new(text)
                    .with_metadata(SOURCE_KEY, source.as_str())
                    .with_metadata(PAGE_KEY, page)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "PdfExtractor"
    }
}
