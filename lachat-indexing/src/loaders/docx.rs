//! Word (`.docx`) extraction.

use async_trait::async_trait;
use docx_rs::{
    DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use lachat_core::traits::Extractor;
use lachat_core::{Document, Result as CoreResult};
use std::path::Path;
use tracing::debug;

use super::{run_blocking, SOURCE_KEY};
use crate::error::{IndexingError, Result};

/// Extracts a Word document as a single document, one line per paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new Word extractor.
    pub fn new() -> Self {
        Self
    }
}

/// Body text of a Word document, one line per paragraph.
///
/// Table cells are walked row by row, nested tables included. Runs inside
/// hyperlinks and tracked insertions count as paragraph text.
fn docx_text(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| IndexingError::text_extraction(format!("DOCX parsing failed: {e}")))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => lines.push(paragraph_text(para)),
            DocumentChild::Table(table) => table_lines(table, &mut lines),
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

fn table_lines(table: &Table, lines: &mut Vec<String>) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(para) => lines.push(paragraph_text(para)),
                    TableCellContent::Table(nested) => table_lines(nested, lines),
                    _ => {}
                }
            }
        }
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut line = String::new();
    push_children(&para.children, &mut line);
    line
}

fn push_children(children: &[ParagraphChild], line: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, line),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, line),
            ParagraphChild::Insert(insert) => {
                for inserted in &insert.children {
                    if let InsertChild::Run(run) = inserted {
                        push_run(run, line);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(run: &Run, line: &mut String) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(text) => line.push_str(&text.text),
            RunChild::Tab(_) => line.push('\t'),
            RunChild::Break(_) => line.push('\n'),
            _ => {}
        }
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    fn extensions(&self) -> &[&'static str] {
        &["docx"]
    }

    async fn extract(&self, path: &Path) -> CoreResult<Vec<Document>> {
        debug!("Extracting text from Word document: {}", path.display());

        let bytes = tokio::fs::read(path).await?;
        let text = run_blocking(move || docx_text(&bytes)).await?;

        Ok(vec![
            Document::new(text).with_metadata(SOURCE_KEY, path.display().to_string()),
        ])
    }

    fn name(&self) -> &'static str {
        "DocxExtractor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_text_joins_paragraphs() {
        let mut buffer = std::io::Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("First line")),
            )
            .add_paragraph(
                docx_rs::Paragraph::new()
                    .add_run(docx_rs::Run::new().add_text("Sec"))
                    .add_run(docx_rs::Run::new().add_text("ond")),
            )
            .build()
            .pack(&mut buffer)
            .unwrap();

        let text = docx_text(buffer.get_ref()).unwrap();
        assert_eq!(text, "First line\nSecond");
    }

    #[test]
    fn test_docx_text_includes_tables_and_hyperlinks() {
        let mut buffer = std::io::Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Intro")))
            .add_table(Table::new(vec![docx_rs::TableRow::new(vec![
                docx_rs::TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Q3 revenue 12M"))),
            ])]))
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Details: "))
                    .add_hyperlink(
                        docx_rs::Hyperlink::new("https://example.com", docx_rs::HyperlinkType::External)
                            .add_run(Run::new().add_text("see the appendix")),
                    ),
            )
            .build()
            .pack(&mut buffer)
            .unwrap();

        let text = docx_text(buffer.get_ref()).unwrap();
        let intro = text.find("Intro").expect("paragraph text");
        let table = text.find("Q3 revenue 12M").expect("table text");
        let link = text.find("Details: see the appendix").expect("hyperlink text");
        assert!(intro < table && table < link, "unexpected order: {text:?}");
    }

    #[test]
    fn test_garbage_is_extraction_error() {
        let err = docx_text(b"not a zip archive").unwrap_err();
        assert!(matches!(err, IndexingError::TextExtraction { .. }));
    }
}
