//! PowerPoint (`.pptx`) extraction.
//!
//! A `.pptx` file is a zip archive with one DrawingML part per slide at
//! `ppt/slides/slide<N>.xml`. Visible text lives in `<a:t>` runs grouped
//! into `<a:p>` paragraphs.

use async_trait::async_trait;
use lachat_core::traits::Extractor;
use lachat_core::{Document, Result as CoreResult};
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use super::{run_blocking, PAGE_KEY, SOURCE_KEY};
use crate::error::{IndexingError, Result};

static SLIDE_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("Invalid slide part regex")
});

static TEXT_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<a:t(?:\s[^>]*)?>(.*?)</a:t>|</a:p>|<a:br\b[^>]*>")
        .expect("Invalid text run regex")
});

/// Extracts one document per slide, in slide order.
///
/// The `page` metadata holds the zero-based slide position.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxExtractor;

impl PptxExtractor {
    /// Create a new PowerPoint extractor.
    pub fn new() -> Self {
        Self
    }
}

/// Text of every slide, ordered by slide number.
fn slide_texts(bytes: Vec<u8>) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IndexingError::text_extraction(format!("PPTX archive is invalid: {e}")))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = SLIDE_PART.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_unstable_by_key(|(number, _)| *number);

    let mut texts = Vec::with_capacity(slides.len());
    for (_, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| IndexingError::text_extraction(format!("Cannot open {name}: {e}")))?
            .read_to_string(&mut xml)?;
        texts.push(xml_text(&xml));
    }

    Ok(texts)
}

fn xml_text(xml: &str) -> String {
    let mut text = String::new();
    for capture in TEXT_RUN.captures_iter(xml) {
        match capture.get(1) {
            Some(run) => text.push_str(&unescape(run.as_str())),
            None => text.push('\n'),
        }
    }
    text.trim().to_string()
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[async_trait]
impl Extractor for PptxExtractor {
    fn extensions(&self) -> &[&'static str] {
        &["pptx"]
    }

    async fn extract(&self, path: &Path) -> CoreResult<Vec<Document>> {
        debug!("Extracting text from presentation: {}", path.display());

        let bytes = tokio::fs::read(path).await?;
        let slides = run_blocking(move || slide_texts(bytes)).await?;

        let source = path.display().to_string();
        Ok(slides
            .into_iter()
            .enumerate()
            .map(|(slide, text)| {
                Document::new(text)
                    .with_metadata(SOURCE_KEY, source.as_str())
                    .with_metadata(PAGE_KEY, slide)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "PptxExtractor"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn slide_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{p}</a:t></a:r></a:p>"))
            .collect();
        format!("<?xml version=\"1.0\"?><p:sld><p:cSld><p:spTree>{body}</p:spTree></p:cSld></p:sld>")
    }

    /// Build a minimal presentation archive with one slide per entry.
    pub(crate) fn build_pptx(slides: &[&[&str]]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();

        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        // Written in reverse to check ordering by slide number.
        for (i, paragraphs) in slides.iter().enumerate().rev() {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
                .unwrap();
            writer.write_all(slide_xml(paragraphs).as_bytes()).unwrap();
        }
        writer.start_file("ppt/slides/_rels/slide1.xml.rels", options).unwrap();
        writer.write_all(b"<Relationships/>").unwrap();

        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_slides_in_numeric_order() {
        let mut slides: Vec<&[&str]> = Vec::new();
        let titles: Vec<String> = (1..=11).map(|i| format!("Slide {i}")).collect();
        let titles: Vec<[&str; 1]> = titles.iter().map(|t| [t.as_str()]).collect();
        for title in &titles {
            slides.push(title);
        }

        let texts = slide_texts(build_pptx(&slides)).unwrap();
        assert_eq!(texts.len(), 11);
        assert_eq!(texts[1], "Slide 2");
        assert_eq!(texts[10], "Slide 11");
    }

    #[test]
    fn test_paragraphs_and_entities() {
        let texts = slide_texts(build_pptx(&[&["Q&amp;A", "a &lt; b"]])).unwrap();
        assert_eq!(texts, vec!["Q&A\na < b".to_string()]);
    }

    #[test]
    fn test_soft_line_break_separates_runs() {
        let xml = "<a:p><a:r><a:t>Line one</a:t></a:r><a:br><a:rPr lang=\"en-US\"/></a:br>\
                   <a:r><a:t>Line two</a:t></a:r><a:br/><a:r><a:t>Line three</a:t></a:r></a:p>";
        assert_eq!(xml_text(xml), "Line one\nLine two\nLine three");
    }

    #[tokio::test]
    async fn test_extract_sets_page_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::write(&path, build_pptx(&[&["Intro"], &["Details"]])).unwrap();

        let docs = PptxExtractor::new().extract(&path).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "Intro");
        assert_eq!(docs[1].get_metadata(PAGE_KEY).and_then(|v| v.as_i64()), Some(1));
    }

    #[test]
    fn test_not_a_zip_is_extraction_error() {
        let err = slide_texts(b"plain text".to_vec()).unwrap_err();
        assert!(matches!(err, IndexingError::TextExtraction { .. }));
    }
}
