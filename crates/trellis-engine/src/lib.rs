//! Infrastructure for the trellis phrase pipeline
//!
//! This crate provides the pieces shared by the pipeline stages:
//!
//! - **Error handling**: unified [`EngineError`] for ingestion and resources
//! - **Caching**: bounded, thread-safe [`EngineCache`] with metrics
//! - **Ingestion**: [`ConlluReader`] decoding CoNLL-U v2 into core words

pub mod cache;
pub mod conllu;
pub mod error;

pub use cache::{CacheStats, EngineCache};
pub use conllu::{ConlluReader, ConlluReaderConfig};
pub use error::{EngineError, EngineResult};
