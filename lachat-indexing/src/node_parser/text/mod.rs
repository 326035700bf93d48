//! Token-measured text splitters and the tokenizers they count with.

pub mod token;

pub use token::TokenTextSplitter;

use std::fmt::{self, Debug};
use tiktoken_rs::CoreBPE;

use crate::error::{IndexingError, Result};

/// Measures text length in tokens.
pub trait Tokenizer: Send + Sync + Debug {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;
}

/// Byte-pair-encoding tokenizer backed by `tiktoken-rs`.
pub struct TiktokenTokenizer {
    encoding: String,
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load the named encoding (`cl100k_base`, `o200k_base`, `p50k_base`,
    /// or `r50k_base`).
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown encodings.
    pub fn new(encoding: &str) -> Result<Self> {
        let bpe = match encoding {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            other => {
                return Err(IndexingError::configuration(format!(
                    "Unknown tokenizer encoding: {other}"
                )));
            }
        }
        .map_err(|e| IndexingError::configuration(format!("Failed to load {encoding}: {e}")))?;

        Ok(Self {
            encoding: encoding.to_string(),
            bpe,
        })
    }

    /// The encoding name.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

impl Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Counts each character as one token.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterTokenizer;

impl Tokenizer for CharacterTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiktoken_counts_tokens_not_chars() {
        let tokenizer = TiktokenTokenizer::new("cl100k_base").unwrap();
        let text = "The quick brown fox jumps over the lazy dog.";
        let tokens = tokenizer.count_tokens(text);
        assert!(tokens > 0);
        assert!(tokens < text.chars().count());
        assert_eq!(tokenizer.count_tokens(""), 0);
    }

    #[test]
    fn test_unknown_encoding() {
        let err = TiktokenTokenizer::new("gpt-9000").unwrap_err();
        assert!(matches!(err, IndexingError::Configuration { .. }));
    }

    #[test]
    fn test_character_tokenizer() {
        assert_eq!(CharacterTokenizer.count_tokens("héllo"), 5);
    }
}
