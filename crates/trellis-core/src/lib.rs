// trellis-core: Core linguistic types and utilities for trellis

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

//! # Trellis Core
//!
//! Foundational types for the trellis phrase-extraction pipeline: tagged
//! tokens with Universal Dependencies annotations, sentence and document
//! containers with link-repairing filtering, and the phrase value objects the
//! builders produce.
//!
//! ## Key components
//!
//! - [`Word`]: parsed token with PoS, syntactic link and morph features
//! - [`Sentence`] / [`Document`]: ordered containers with filtering
//! - [`Phrase`]: immutable snapshot of a dependency sub-tree
//! - [`PhraseId`]: order-independent 64-bit phrase fingerprint
//!
//! ## Example
//!
//! ```rust
//! use trellis_core::{Phrase, PosTag, Sentence, SyntLink, Word};
//!
//! let sent = Sentence::new(vec![
//!     Word::tagged("spam", PosTag::Noun, 1, SyntLink::Compound),
//!     Word::tagged("filter", PosTag::Noun, 0, SyntLink::Root),
//! ]);
//! let head = Phrase::from_word(1, &sent[1]).unwrap();
//! assert_eq!(head.get_str_repr(), "filter");
//! ```

pub mod features;
pub mod phrase;
pub mod sentence;
pub mod tags;
pub mod word;
pub mod word_id;

use thiserror::Error;

pub use features::{Animacy, Aspect, Case, Degree, Gender, Mood, NumType, Number, Person, Tense, Voice};
pub use phrase::{HeadModifier, Phrase, PhraseId, PhraseType, ReprEnhType, ReprEnhancer};
pub use sentence::{Document, Sentence};
pub use tags::{Lang, PosTag, SyntLink};
pub use word::{PrepAnnotation, Word, WordExtra};

/// Errors of the core data model.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A word with no lemma cannot enter a phrase.
    #[error("word at position {pos} has no lemma")]
    UnidentifiedWord { pos: usize },

    /// Phrase ids restored from serialized form cannot merge further.
    #[error("phrase id was restored from serialized form and cannot be merged")]
    FrozenPhraseId,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
