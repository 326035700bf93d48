//! Content-derived cache key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercase hex digest naming one cache entry.
///
/// Keys are only produced by [`crate::hashing::ContentHasher`] or parsed
/// from a string with [`CacheKey::parse`], which rejects anything that is
/// not plain hex. A key is therefore always safe to embed in a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Length of a key in hex characters (SHA-256).
    pub const HEX_LEN: usize = 64;

    pub(crate) fn from_digest(digest: &[u8]) -> Self {
        use fmt::Write;
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// Parse a key from its hex representation.
    pub fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == Self::HEX_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        valid.then(|| Self(value.to_string()))
    }

    /// The hex digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_digest_is_lowercase_hex() {
        let key = CacheKey::from_digest(&[0xAB; 32]);
        assert_eq!(key.as_str().len(), CacheKey::HEX_LEN);
        assert!(key.as_str().starts_with("abab"));
    }

    #[test]
    fn test_parse_rejects_path_like_input() {
        assert!(CacheKey::parse("../etc/passwd").is_none());
        assert!(CacheKey::parse(&"A".repeat(64)).is_none());
        assert!(CacheKey::parse(&"a".repeat(63)).is_none());
        assert!(CacheKey::parse(&"0f".repeat(32)).is_some());
    }
}
