//! Error types for the indexing module.

use thiserror::Error;

/// Errors that can occur while extracting, splitting, and caching documents.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// IO error occurred while reading files or directories.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error extracting text from binary documents (PDF, Word, etc.).
    #[error("Text extraction error: {message}")]
    TextExtraction {
        /// Error message describing the extraction issue.
        message: String,
    },

    /// Error during text splitting or chunking.
    #[error("Text splitting error: {message}")]
    TextSplitting {
        /// Error message describing the splitting issue.
        message: String,
    },

    /// Unsupported file format.
    #[error("Unsupported file format: {format}")]
    UnsupportedFormat {
        /// The unsupported file extension.
        format: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Core framework error.
    #[error("Core error: {0}")]
    Core(#[from] lachat_core::LachatError),
}

/// Result type alias for indexing operations.
pub type Result<T> = std::result::Result<T, IndexingError>;

impl IndexingError {
    /// Create a new text extraction error.
    pub fn text_extraction<S: Into<String>>(message: S) -> Self {
        Self::TextExtraction {
            message: message.into(),
        }
    }

    /// Create a new text splitting error.
    pub fn text_splitting<S: Into<String>>(message: S) -> Self {
        Self::TextSplitting {
            message: message.into(),
        }
    }

    /// Create a new unsupported format error.
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

// Convert to LachatError for trait compatibility
impl From<IndexingError> for lachat_core::LachatError {
    fn from(err: IndexingError) -> Self {
        match err {
            IndexingError::Io(e) => Self::Io(e),
            IndexingError::Core(e) => e,
            IndexingError::UnsupportedFormat { format } => Self::UnsupportedFormat { extension: format },
            IndexingError::TextExtraction { message } => Self::Extraction { message },
            IndexingError::Configuration { message } => Self::Configuration { message },
            IndexingError::TextSplitting { .. } => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lachat_core::LachatError;

    #[test]
    fn test_unsupported_format_keeps_extension() {
        let err: LachatError = IndexingError::unsupported_format("xyz").into();
        match err {
            LachatError::UnsupportedFormat { extension } => assert_eq!(extension, "xyz"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_core_error_passes_through() {
        let err: LachatError =
            IndexingError::Core(LachatError::deserialization("stale schema")).into();
        assert!(err.is_corrupt_artifact());
    }
}
