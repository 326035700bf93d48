//! Error types for the FastEmbed embedder.

use thiserror::Error;

/// Errors raised while loading or running a FastEmbed model.
#[derive(Error, Debug)]
pub enum FastEmbedError {
    /// Model initialization failed
    #[error("Failed to initialize model '{model}': {reason}")]
    ModelInit {
        /// The model name that failed to initialize
        model: String,
        /// The reason for the failure
        reason: String,
    },

    /// Embedding generation failed
    #[error("Failed to generate embeddings: {reason}")]
    Embedding {
        /// The reason for the failure
        reason: String,
    },

    /// Configuration error
    #[error("Invalid configuration: {reason}")]
    Config {
        /// The reason for the configuration error
        reason: String,
    },
}

impl From<FastEmbedError> for lachat_core::LachatError {
    fn from(err: FastEmbedError) -> Self {
        match err {
            FastEmbedError::Config { reason } => Self::Configuration { message: reason },
            other => Self::Embedding {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for FastEmbed operations.
pub type Result<T> = std::result::Result<T, FastEmbedError>;
