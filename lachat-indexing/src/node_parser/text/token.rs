//! Recursive token-measured text splitter.
//!
//! Text is cut on the first separator from `["\n\n", "\n", " ", ""]` that
//! occurs in it. Pieces that fit are greedily merged back into chunks of at
//! most `chunk_size` tokens, carrying up to `chunk_overlap` tokens of the
//! previous chunk into the next one. Pieces that are still too long are
//! split again with the remaining, finer separators.

use lachat_core::config::ChunkingConfig;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

use super::{TiktokenTokenizer, Tokenizer};
use crate::error::{IndexingError, Result};
use crate::node_parser::TextSplitter;

/// Separators tried in order, coarsest first. The empty separator splits
/// between characters.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive text splitter that measures length with a [`Tokenizer`].
///
/// # Examples
///
/// ```rust
/// use lachat_indexing::node_parser::{text::TokenTextSplitter, TextSplitter};
///
/// let splitter = TokenTextSplitter::from_defaults(900, 100).unwrap();
/// let chunks = splitter.split_text("Short enough to stay whole.");
/// assert_eq!(chunks, vec!["Short enough to stay whole."]);
/// ```
#[derive(Debug, Clone)]
pub struct TokenTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl TokenTextSplitter {
    /// Create a splitter with an explicit tokenizer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless `0 <= chunk_overlap < chunk_size`.
    pub fn new(
        chunk_size: usize,
        chunk_overlap: usize,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(IndexingError::configuration(format!(
                "Invalid chunking: size {chunk_size}, overlap {chunk_overlap}"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(ToString::to_string).collect(),
            tokenizer,
        })
    }

    /// Create a splitter counting `cl100k_base` tokens.
    pub fn from_defaults(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::new(
            chunk_size,
            chunk_overlap,
            Arc::new(TiktokenTokenizer::new("cl100k_base")?),
        )
    }

    /// Create a splitter from the chunking configuration.
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.chunk_size,
            config.chunk_overlap,
            Arc::new(TiktokenTokenizer::new(&config.encoding)?),
        )
    }

    /// Replace the separator list.
    #[must_use]
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum chunk length in tokens.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Tokens shared between neighbouring chunks.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let (separator, finer) = match separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s.as_str()))
        {
            Some(i) => (separators[i].as_str(), &separators[i + 1..]),
            None => ("", &[][..]),
        };

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();
        for piece in pieces {
            if self.tokenizer.count_tokens(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge_pieces(&fitting, separator));
                fitting.clear();
            }
            if finer.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge_pieces(&fitting, separator));
        }

        chunks
    }

    /// Greedily join pieces into chunks, keeping an overlapping tail.
    fn merge_pieces(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let separator_len = self.tokenizer.count_tokens(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            let len = self.tokenizer.count_tokens(piece);
            let joined_len = |total: usize, current: &VecDeque<(&str, usize)>| {
                total + len + if current.is_empty() { 0 } else { separator_len }
            };

            if joined_len(total, &current) > self.chunk_size {
                if total > self.chunk_size {
                    debug!(
                        "Created a chunk of {} tokens, longer than {}",
                        total, self.chunk_size
                    );
                }
                if !current.is_empty() {
                    if let Some(chunk) = join(&current, separator) {
                        chunks.push(chunk);
                    }
                    while total > self.chunk_overlap
                        || (total > 0 && joined_len(total, &current) > self.chunk_size)
                    {
                        let Some((_, front_len)) = current.pop_front() else {
                            break;
                        };
                        total -= front_len + if current.is_empty() { 0 } else { separator_len };
                    }
                }
            }

            total += len + if current.is_empty() { 0 } else { separator_len };
            current.push_back((piece, len));
        }

        if let Some(chunk) = join(&current, separator) {
            chunks.push(chunk);
        }
        chunks
    }
}

/// Join pieces and trim; whitespace-only chunks are dropped.
fn join(pieces: &VecDeque<(&str, usize)>, separator: &str) -> Option<String> {
    let text = pieces
        .iter()
        .map(|(piece, _)| *piece)
        .collect::<Vec<_>>()
        .join(separator);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TextSplitter for TokenTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        let chunks = self.split_recursive(text, &self.separators);
        debug!("Split {} bytes into {} chunks", text.len(), chunks.len());
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_parser::text::CharacterTokenizer;
    use lachat_core::Document;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn char_splitter(size: usize, overlap: usize) -> TokenTextSplitter {
        TokenTextSplitter::new(size, overlap, Arc::new(CharacterTokenizer)).unwrap()
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let splitter = char_splitter(100, 10);
        assert_eq!(splitter.split_text("Small text."), vec!["Small text."]);
    }

    #[test]
    fn test_empty_and_blank_text_yield_nothing() {
        let splitter = char_splitter(100, 10);
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\n \n").is_empty());
    }

    #[test]
    fn test_words_with_overlap() {
        let splitter = char_splitter(10, 4);
        let chunks = splitter.split_text("aaa bbb ccc ddd eee");
        assert_eq!(chunks, vec!["aaa bbb", "bbb ccc", "ccc ddd", "ddd eee"]);
    }

    #[test]
    fn test_paragraphs_preferred_over_lines() {
        let splitter = char_splitter(12, 0);
        let chunks = splitter.split_text("first para\n\nsecond one\nmore");
        assert_eq!(chunks, vec!["first para", "second one", "more"]);
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let splitter = char_splitter(4, 1);
        let chunks = splitter.split_text("abcdefghij");
        assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
    }

    #[test_case(50, 5 ; "small")]
    #[test_case(200, 20 ; "medium")]
    #[test_case(900, 100 ; "default")]
    fn test_chunks_respect_token_limit(size: usize, overlap: usize) {
        let splitter = TokenTextSplitter::from_defaults(size, overlap).unwrap();
        let text = "Retrieval augmented generation grounds answers in documents. "
            .repeat(120);

        let chunks = splitter.split_text(&text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            let tokens = splitter.tokenizer.count_tokens(chunk);
            assert!(tokens <= size, "chunk of {tokens} tokens exceeds {size}");
        }
    }

    #[test]
    fn test_split_documents_copies_metadata() {
        let splitter = char_splitter(10, 0);
        let documents = vec![
            Document::new("aaa bbb ccc ddd")
                .with_metadata("source", "a.pdf")
                .with_metadata("page", 0_i64),
            Document::new("zzz").with_metadata("source", "b.docx"),
        ];

        let chunks = splitter.split_documents(&documents);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["aaa bbb", "ccc ddd", "zzz"]);
        assert_eq!(chunks[1].metadata, documents[0].metadata);
        assert_eq!(chunks[2].get_metadata_string("source").as_deref(), Some("b.docx"));
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(TokenTextSplitter::new(10, 10, Arc::new(CharacterTokenizer)).is_err());
        assert!(TokenTextSplitter::new(0, 0, Arc::new(CharacterTokenizer)).is_err());
        assert!(TokenTextSplitter::from_config(&ChunkingConfig::new(5, 9)).is_err());
    }
}
