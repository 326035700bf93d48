//! Configuration for token-aware chunking.

use serde::{Deserialize, Serialize};

use crate::{LachatError, Result};

/// Chunk size and overlap, measured in model tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum tokens per chunk.
    pub chunk_size: usize,

    /// Tokens shared between neighbouring chunks.
    pub chunk_overlap: usize,

    /// Tokenizer encoding used to measure length.
    pub encoding: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 900,
            chunk_overlap: 100,
            encoding: "cl100k_base".to_string(),
        }
    }
}

impl ChunkingConfig {
    /// Create a configuration with the given size and overlap.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Default::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(LachatError::configuration("Chunk size must be greater than 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(LachatError::configuration(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.encoding.is_empty() {
            return Err(LachatError::configuration("Encoding cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 900);
        assert_eq!(config.chunk_overlap, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller() {
        assert!(ChunkingConfig::new(100, 100).validate().is_err());
        assert!(ChunkingConfig::new(0, 0).validate().is_err());
    }
}
