//! # Trellis
//!
//! Multi-word phrase extraction from dependency-parsed text: CoNLL-U
//! ingestion, noun/verb phrase enumeration with a multi-word-expression
//! pre-pass, and Russian/English surface inflection.
//!
//! This crate re-exports the workspace members:
//!
//! - [`core`](trellis_core): word, sentence and phrase data model
//! - [`engine`](trellis_engine): errors, caching, CoNLL-U reader
//! - [`phrases`](trellis_phrases): builders, profiles and inflectors
//!
//! # Quick start
//!
//! ```rust
//! use trellis::{PhrasePipeline, PipelineKind, PosTag, Sentence, SyntLink, Word};
//!
//! let mut sent = Sentence::new(vec![
//!     Word::tagged("spam", PosTag::Noun, 1, SyntLink::Compound),
//!     Word::tagged("filter", PosTag::Noun, 0, SyntLink::Root),
//! ]);
//! let pipeline = PhrasePipeline::new(PipelineKind::NounPhrases, 4).unwrap();
//! let phrases = pipeline.extract(&mut sent).unwrap();
//! assert_eq!(phrases[0].get_str_repr(), "spam filter");
//! ```

pub use trellis_core::{
    Document, Lang, Phrase, PhraseId, PhraseType, PosTag, Sentence, SyntLink, Word,
};
pub use trellis_engine::{ConlluReader, ConlluReaderConfig, EngineError, EngineResult};
pub use trellis_phrases::{
    InflectEngine, PhraseBuilder, PhraseError, PhrasePipeline, PipelineConfig, PipelineKind,
    Profile,
};

pub use trellis_core as core;
pub use trellis_engine as engine;
pub use trellis_phrases as phrases;
