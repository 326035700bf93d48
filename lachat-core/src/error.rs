//! Error types for the LaChat cache layer.
//!
//! The cache layer distinguishes between errors that mean "an on-disk cache
//! artifact is unreadable" (recoverable by falling back to a rebuild) and
//! everything else, which is propagated to the caller unchanged.

use thiserror::Error;

/// Core error type shared by every LaChat crate.
#[derive(Error, Debug)]
pub enum LachatError {
    /// I/O related errors (file reading, directory creation, renames, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Binary cache payload could not be decoded, or its schema is stale
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Detailed error message
        message: String,
    },

    /// The uploaded file has an extension no extractor is registered for
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The offending extension (empty when the name has none)
        extension: String,
    },

    /// A format-specific extractor failed on otherwise readable input
    #[error("Extraction error: {message}")]
    Extraction {
        /// Detailed error message
        message: String,
    },

    /// Embedding generation errors
    #[error("Embedding error: {message}")]
    Embedding {
        /// Detailed error message
        message: String,
    },

    /// Vector index build/load/save errors
    #[error("Vector store error: {message}")]
    VectorStore {
        /// Detailed error message
        message: String,
    },

    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
    },

    /// Input validation errors
    #[error("Validation error: {message}")]
    Validation {
        /// Detailed error message
        message: String,
    },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Detailed error message
        message: String,
    },

    /// Generic errors from external dependencies
    #[error("External error: {source}")]
    External {
        /// The underlying error
        #[source]
        source: anyhow::Error,
    },
}

impl LachatError {
    /// Create a new deserialization error with a message.
    pub fn deserialization<S: Into<String>>(message: S) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }

    /// Create a new unsupported format error for an extension.
    pub fn unsupported_format<S: Into<String>>(extension: S) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create a new extraction error with a message.
    pub fn extraction<S: Into<String>>(message: S) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    /// Create a new embedding error with a message.
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a new vector store error with a message.
    pub fn vector_store<S: Into<String>>(message: S) -> Self {
        Self::VectorStore {
            message: message.into(),
        }
    }

    /// Create a new configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new validation error with a message.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new internal error with a message.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a new external error from any error that implements `Into<anyhow::Error>`.
    pub fn external<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::External {
            source: error.into(),
        }
    }

    /// Check whether this error means a cached artifact on disk is unreadable.
    ///
    /// Callers treat these as a cache miss (blob entries) or as a signal to
    /// delete and rebuild (index bundles). Permission problems are excluded:
    /// an unreadable cache directory is an environment fault, not corruption.
    #[must_use]
    pub fn is_corrupt_artifact(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() != std::io::ErrorKind::PermissionDenied,
            Self::Serialization(_)
            | Self::Deserialization { .. }
            | Self::VectorStore { .. }
            | Self::Validation { .. } => true,
            _ => false,
        }
    }
}

impl From<bincode::Error> for LachatError {
    fn from(error: bincode::Error) -> Self {
        Self::Deserialization {
            message: error.to_string(),
        }
    }
}

impl From<::config::ConfigError> for LachatError {
    fn from(error: ::config::ConfigError) -> Self {
        Self::Configuration {
            message: error.to_string(),
        }
    }
}

/// Convert from `anyhow::Error` to `LachatError`.
impl From<anyhow::Error> for LachatError {
    fn from(error: anyhow::Error) -> Self {
        Self::External { source: error }
    }
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, LachatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LachatError::unsupported_format("xyz");
        assert!(matches!(err, LachatError::UnsupportedFormat { .. }));
        assert_eq!(err.to_string(), "Unsupported file format: xyz");
    }

    #[test]
    fn test_corrupt_artifact_classification() {
        assert!(LachatError::deserialization("truncated").is_corrupt_artifact());
        assert!(LachatError::vector_store("manifest missing").is_corrupt_artifact());
        assert!(
            LachatError::Io(std::io::Error::from(std::io::ErrorKind::UnexpectedEof))
                .is_corrupt_artifact()
        );

        assert!(
            !LachatError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
                .is_corrupt_artifact()
        );
        assert!(!LachatError::embedding("model missing").is_corrupt_artifact());
        assert!(!LachatError::unsupported_format("xyz").is_corrupt_artifact());
    }

    #[test]
    fn test_bincode_error_maps_to_deserialization() {
        let err: LachatError = bincode::deserialize::<Vec<String>>(&[0xff, 0xff])
            .map_err(LachatError::from)
            .unwrap_err();
        assert!(matches!(err, LachatError::Deserialization { .. }));
    }
}
