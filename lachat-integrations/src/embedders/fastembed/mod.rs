//! FastEmbed-based local embedding.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lachat_core::traits::Embedder;
//! use lachat_integrations::embedders::fastembed::FastEmbedder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = FastEmbedder::new().await?;
//! let embedding = embedder.embed("Hello, world!").await?;
//! assert_eq!(embedding.len(), embedder.dimension());
//! # Ok(())
//! # }
//! ```

mod config;
mod embedder;
mod error;

pub use config::FastEmbedConfig;
pub use embedder::FastEmbedder;
pub use error::FastEmbedError;
