// trellis-phrases: phrase building, merging and inflection

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

//! # Trellis Phrases
//!
//! The phrase-construction pipeline: enumerate the valid sub-trees of a
//! sentence's dependency tree up to a size bound, pre-extract tight compounds
//! (multi-word expressions), share modifiers across coordinated conjuncts,
//! and render each phrase as a correctly inflected surface string.
//!
//! # Pipeline
//!
//! ```text
//! parsed sentence -> MWE pre-pass -> seeded DP builder -> inflection -> phrases
//! ```
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{PosTag, Sentence, SyntLink, Word};
//! use trellis_phrases::{PhrasePipeline, PipelineKind};
//!
//! let mut sent = Sentence::new(vec![
//!     Word::tagged("spam", PosTag::Noun, 1, SyntLink::Compound),
//!     Word::tagged("filter", PosTag::Noun, 0, SyntLink::Root),
//! ]);
//! let pipeline = PhrasePipeline::new(PipelineKind::NounPhrases, 4).unwrap();
//! let phrases = pipeline.extract(&mut sent).unwrap();
//! assert_eq!(phrases[0].get_str_repr(), "spam filter");
//! ```

pub mod builder;
pub mod conjuncts;
pub mod error;
pub mod extract;
pub mod extras;
pub mod inflect;
pub mod merge;
pub mod mwe;
pub mod profile;
pub mod util;

pub use builder::{BuilderConfig, PhraseBuilder, DEFAULT_MAX_VARIANTS, MAX_SENT_LEN};
pub use error::{PhraseError, PhraseResult};
pub use extract::{PhrasePipeline, PipelineConfig, PipelineKind};
pub use inflect::{
    DictMorph, EnInflector, InflectEngine, Inflector, MorphAnalyzer, RuInflector, VerbExcpForms,
};
pub use mwe::keep_non_overlapping_phrases;
pub use profile::Profile;
