//! Content hashing for cache keys.
//!
//! Two kinds of identity are derived here:
//!
//! - a per-file key over the uploaded bytes plus `name`, `size` and
//!   `mime_type`, used by the document extraction cache;
//! - a per-corpus key over a chunk collection, independent of chunk order,
//!   used by the vector index cache.
//!
//! Both are SHA-256 digests rendered as lowercase hex.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::{CacheKey, Document, FileBlob, MetadataValue};

/// Derives stable cache keys from files and chunk collections.
///
/// # Examples
///
/// ```rust
/// use lachat_core::hashing::ContentHasher;
/// use lachat_core::types::{Document, FileBlob};
///
/// let blob = FileBlob::new("a.pdf", "application/pdf", b"%PDF-1.7".to_vec());
/// assert_eq!(ContentHasher::hash_file(&blob), ContentHasher::hash_file(&blob.clone()));
///
/// let a = Document::new("first");
/// let b = Document::new("second");
/// assert_eq!(
///     ContentHasher::hash_corpus(&[a.clone(), b.clone()]),
///     ContentHasher::hash_corpus(&[b, a]),
/// );
/// ```
pub struct ContentHasher;

/// Canonical per-chunk record fed to the corpus digest.
#[derive(Serialize)]
struct ChunkRecord<'a> {
    text: &'a str,
    metadata: Vec<(&'a str, &'a MetadataValue)>,
}

impl ContentHasher {
    /// Hash an uploaded file's content together with its metadata.
    ///
    /// Every field is length-prefixed before it is fed to the digest, so
    /// moving bytes between the content and the name (or between name and
    /// MIME type) always yields a different key.
    pub fn hash_file(blob: &FileBlob) -> CacheKey {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, &blob.content);
        update_field(&mut hasher, blob.name.as_bytes());
        update_field(&mut hasher, blob.size.to_string().as_bytes());
        update_field(&mut hasher, blob.mime_type.as_bytes());
        CacheKey::from_digest(&hasher.finalize())
    }

    /// Hash a chunk collection independently of its order.
    ///
    /// Records are sorted by text, then by their canonical metadata
    /// rendering, so any permutation of the same multiset hashes equally.
    /// An empty collection hashes the canonical rendering `[]`.
    pub fn hash_corpus(chunks: &[Document]) -> CacheKey {
        let mut records: Vec<(ChunkRecord<'_>, String)> = chunks
            .iter()
            .map(|chunk| {
                // BTreeMap iteration is already sorted by key.
                let metadata: Vec<(&str, &MetadataValue)> = chunk
                    .metadata
                    .iter()
                    .map(|(k, v)| (k.as_str(), v))
                    .collect();
                let rendered = serde_json::to_string(&metadata).unwrap_or_default();
                (
                    ChunkRecord {
                        text: &chunk.text,
                        metadata,
                    },
                    rendered,
                )
            })
            .collect();

        records.sort_by(|(a, a_meta), (b, b_meta)| {
            a.text.cmp(b.text).then_with(|| a_meta.cmp(b_meta))
        });

        let ordered: Vec<&ChunkRecord<'_>> = records.iter().map(|(r, _)| r).collect();
        let canonical = serde_json::to_string(&ordered).unwrap_or_default();

        Self::content_hash(canonical.as_bytes())
    }

    /// Hash raw bytes.
    pub fn content_hash(content: &[u8]) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(content);
        CacheKey::from_digest(&hasher.finalize())
    }
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn blob() -> FileBlob {
        FileBlob {
            name: "report.pdf".to_string(),
            size: 4,
            mime_type: "application/pdf".to_string(),
            content: b"%PDF".to_vec(),
        }
    }

    #[test]
    fn test_hash_file_is_deterministic() {
        assert_eq!(ContentHasher::hash_file(&blob()), ContentHasher::hash_file(&blob()));
        assert_eq!(ContentHasher::hash_file(&blob()).as_str().len(), CacheKey::HEX_LEN);
    }

    #[test_case(|b: &mut FileBlob| b.content[0] ^= 1 ; "content byte")]
    #[test_case(|b: &mut FileBlob| b.name = "report2.pdf".into() ; "name")]
    #[test_case(|b: &mut FileBlob| b.size = 5 ; "size")]
    #[test_case(|b: &mut FileBlob| b.mime_type = "application/x-pdf".into() ; "mime type")]
    fn test_hash_file_is_sensitive(mutate: fn(&mut FileBlob)) {
        let mut changed = blob();
        mutate(&mut changed);
        assert_ne!(ContentHasher::hash_file(&blob()), ContentHasher::hash_file(&changed));
    }

    #[test]
    fn test_hash_file_field_boundaries() {
        let a = FileBlob {
            name: "ab".to_string(),
            size: 1,
            mime_type: "c".to_string(),
            content: vec![],
        };
        let b = FileBlob {
            name: "a".to_string(),
            size: 1,
            mime_type: "bc".to_string(),
            content: vec![],
        };
        assert_ne!(ContentHasher::hash_file(&a), ContentHasher::hash_file(&b));
    }

    #[test]
    fn test_hash_corpus_order_independent() {
        let chunks = vec![
            Document::new("alpha").with_metadata("page", 0_i64),
            Document::new("beta").with_metadata("page", 1_i64),
            Document::new("alpha").with_metadata("page", 2_i64),
        ];
        let expected = ContentHasher::hash_corpus(&chunks);

        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in permutations {
            let shuffled: Vec<Document> = order.iter().map(|&i| chunks[i].clone()).collect();
            assert_eq!(ContentHasher::hash_corpus(&shuffled), expected, "order {order:?}");
        }
    }

    #[test]
    fn test_hash_corpus_metadata_sensitive() {
        let a = vec![Document::new("same").with_metadata("source", "a.pdf")];
        let b = vec![Document::new("same").with_metadata("source", "b.pdf")];
        assert_ne!(ContentHasher::hash_corpus(&a), ContentHasher::hash_corpus(&b));
    }

    #[test]
    fn test_hash_corpus_is_multiset_sensitive() {
        let once = vec![Document::new("x")];
        let twice = vec![Document::new("x"), Document::new("x")];
        assert_ne!(ContentHasher::hash_corpus(&once), ContentHasher::hash_corpus(&twice));
    }

    #[test]
    fn test_empty_corpus_has_fixed_key() {
        assert_eq!(ContentHasher::hash_corpus(&[]), ContentHasher::content_hash(b"[]"));
    }
}
