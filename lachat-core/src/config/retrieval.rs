//! Configuration for retrieval queries against a built index.

use serde::{Deserialize, Serialize};

use crate::{LachatError, Result};

/// How candidates are selected from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Plain nearest-neighbour search.
    Similarity,
    /// Maximal marginal relevance over the nearest `fetch_k` candidates.
    Mmr,
}

/// Retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Selection strategy.
    pub search_type: SearchType,

    /// Number of chunks returned.
    pub top_k: usize,

    /// Number of nearest candidates considered by MMR.
    pub fetch_k: usize,

    /// Relevance/diversity trade-off for MMR (1.0 = relevance only).
    pub lambda_mult: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            search_type: SearchType::Mmr,
            top_k: 4,
            fetch_k: 20,
            lambda_mult: 0.5,
        }
    }
}

impl RetrievalConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(LachatError::configuration("top_k must be greater than 0"));
        }

        if self.fetch_k < self.top_k {
            return Err(LachatError::configuration(format!(
                "fetch_k ({}) must be at least top_k ({})",
                self.fetch_k, self.top_k
            )));
        }

        if !(0.0..=1.0).contains(&self.lambda_mult) {
            return Err(LachatError::configuration(format!(
                "lambda_mult must lie in [0, 1], got {}",
                self.lambda_mult
            )));
        }

        Ok(())
    }
}
