//! Document type and related structures.
//!
//! A [`Document`] is one unit of extracted text (a PDF page, a slide, a Word
//! file) or, after splitting, one chunk of such a unit. Both share the same
//! shape: text plus an ordered metadata map of primitive values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A primitive metadata value.
///
/// Metadata is restricted to primitives so that it survives the binary
/// cache format unchanged and renders canonically for hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    /// UTF-8 string value.
    Str(String),
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl MetadataValue {
    /// Get the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered metadata map attached to every document.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// One unit of extracted text together with its metadata.
///
/// Common metadata keys:
/// - `source`: the uploaded file name the text came from
/// - `page`: zero-based page (PDF) or slide (PPTX) index
///
/// # Examples
///
/// ```rust
/// use lachat_core::types::Document;
///
/// let doc = Document::new("Quarterly revenue grew 12%.")
///     .with_metadata("source", "report.pdf")
///     .with_metadata("page", 3_i64);
///
/// assert_eq!(doc.get_metadata_string("source").as_deref(), Some("report.pdf"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text content.
    pub text: String,

    /// Document metadata (source, page, ...).
    pub metadata: Metadata,
}

impl Document {
    /// Create a new document with the given text and no metadata.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Add or update metadata for this document.
    #[must_use]
    pub fn with_metadata<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<MetadataValue>,
    {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get metadata value by key.
    pub fn get_metadata(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    /// Get metadata value as a string.
    pub fn get_metadata_string(&self, key: &str) -> Option<String> {
        self.metadata.get(key)?.as_str().map(String::from)
    }

    /// Get the text length in bytes.
    pub fn size(&self) -> usize {
        self.text.len()
    }

    /// Check if the document text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A document returned from a retrieval query with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// The retrieved document.
    pub document: Document,

    /// Similarity to the query (higher is better).
    pub score: f32,
}

impl ScoredDocument {
    /// Create a new scored document.
    pub fn new(document: Document, score: f32) -> Self {
        Self { document, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder_metadata() {
        let doc = Document::new("hello")
            .with_metadata("source", "a.pdf")
            .with_metadata("page", 2_usize)
            .with_metadata("scanned", false);

        assert_eq!(doc.get_metadata_string("source"), Some("a.pdf".to_string()));
        assert_eq!(doc.get_metadata("page").and_then(MetadataValue::as_i64), Some(2));
        assert_eq!(doc.get_metadata("scanned"), Some(&MetadataValue::Bool(false)));
        assert_eq!(doc.size(), 5);
    }

    #[test]
    fn test_metadata_is_key_ordered() {
        let doc = Document::new("x")
            .with_metadata("zeta", 1_i64)
            .with_metadata("alpha", 2_i64);

        let keys: Vec<&str> = doc.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_documents_survive_bincode() {
        let doc = Document::new("payload")
            .with_metadata("source", "deck.pptx")
            .with_metadata("ratio", 0.5)
            .with_metadata("page", 7_i64);

        let bytes = bincode::serialize(&vec![doc.clone()]).unwrap();
        let decoded: Vec<Document> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, vec![doc]);
    }
}
