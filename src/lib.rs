//! docsift - semantic search over scraped documentation pages.
//!
//! docsift turns noisy Markdown scraped from documentation sites into
//! clean, retrievable text blocks, embeds them, and serves filtered
//! similarity queries against a vector store. The segmenter applies a
//! fixed, ordered cleanup pipeline with a boundary heuristic that
//! separates page furniture from body content; the query engine wraps
//! the store behind a small trait so the whole pipeline is testable
//! without a running service.
//!
//! # Quick start
//!
//! ```no_run
//! use docsift::config::Settings;
//! use docsift::embedder::LocalEmbedder;
//! use docsift::search::QueryEngine;
//! use docsift::store::QdrantStore;
//!
//! # fn main() -> docsift::Result<()> {
//! let settings = Settings::from_env()?;
//! let store = QdrantStore::new(&settings.store_url)?;
//! let embedder = LocalEmbedder::new(&settings.embed_url)?;
//!
//! let engine = QueryEngine::new(&store, &embedder, settings.collection);
//! for hit in engine.search("attach a static mesh", 5, None)? {
//!     println!("{} ({:.3})", hit.locator, hit.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod block;
pub mod cli;
pub mod config;
pub mod embedder;
pub mod error;
pub mod ingestion;
pub mod search;
pub mod segmenter;
pub mod store;
pub mod url_title;

pub use block::{BlockType, TextBlock};
pub use config::Settings;
pub use embedder::{Embedder, EmbedderKind};
pub use error::{Error, Result};
pub use search::{QueryEngine, SearchResult};
pub use store::{QdrantStore, VectorStore};
