//! Uploaded file representation.

use std::path::Path;

/// One uploaded file as presented to the cache layer.
///
/// Blobs are read-only: the cache layer hashes them, may copy their bytes
/// into a scoped temporary file for extraction, and then drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// Original file name, including its extension.
    pub name: String,
    /// Size in bytes as reported by the uploader.
    pub size: u64,
    /// MIME type as reported by the uploader.
    pub mime_type: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

impl FileBlob {
    /// Create a blob whose `size` is taken from the content length.
    pub fn new<N, M>(name: N, mime_type: M, content: Vec<u8>) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            size: content.len() as u64,
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Lower-cased extension of the file name, without the leading dot.
    ///
    /// Returns `None` when the name has no extension.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_defaults_to_content_length() {
        let blob = FileBlob::new("notes.pdf", "application/pdf", vec![1, 2, 3]);
        assert_eq!(blob.size, 3);
    }

    #[test]
    fn test_extension_is_lowercased() {
        let blob = FileBlob::new("Slides.PPTX", "application/octet-stream", vec![]);
        assert_eq!(blob.extension().as_deref(), Some("pptx"));

        let blob = FileBlob::new("README", "text/plain", vec![]);
        assert_eq!(blob.extension(), None);
    }
}
