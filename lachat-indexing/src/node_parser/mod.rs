//! Text splitting for extracted documents.
//!
//! Extracted pages and slides vary wildly in length; the splitters here cut
//! them into chunks sized in model tokens before they are embedded.
//!
//! ```text
//! TextSplitter (trait)
//! └── TokenTextSplitter (recursive, token-measured)
//!     └── Tokenizer (trait)
//!         ├── TiktokenTokenizer
//!         └── CharacterTokenizer
//! ```

pub mod text;

use lachat_core::Document;
use std::fmt::Debug;

/// Splits text into chunks.
///
/// Implementors only provide [`split_text`](Self::split_text);
/// [`split_documents`](Self::split_documents) carries each document's
/// metadata over to its chunks.
pub trait TextSplitter: Send + Sync + Debug {
    /// Split `text` into chunks, in order.
    fn split_text(&self, text: &str) -> Vec<String>;

    /// Split every document, copying its metadata onto each chunk.
    fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|document| {
                self.split_text(&document.text)
                    .into_iter()
                    .map(|text| Document {
                        text,
                        metadata: document.metadata.clone(),
                    })
            })
            .collect()
    }
}
