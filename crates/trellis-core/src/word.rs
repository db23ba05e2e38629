//! Tagged token model
//!
//! A [`Word`] carries everything the upstream parser knew about a token:
//! lemma, surface form, text offsets, part of speech, syntactic link to its
//! head (as a signed relative offset) and optional morphological features.
//! The `extra` block holds annotations computed by the pre-build passes
//! (preposition reconstruction, possessive suffixes).

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::features::{Animacy, Aspect, Case, Degree, Gender, Mood, NumType, Number, Person, Tense, Voice};
use crate::phrase::Phrase;
use crate::tags::{Lang, PosTag, SyntLink};
use crate::word_id;

/// A preposition attached to a word: its sentence position, reconstructed
/// surface string (possibly multi-token, e.g. `в качестве`) and word id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepAnnotation {
    pub pos: usize,
    pub surface: String,
    pub word_id: u64,
}

/// Post-processing annotations attached to a word before phrase building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordExtra {
    /// Whitelisted preposition governing this word, if any.
    pub prep_white_list: Option<PrepAnnotation>,
    /// Non-whitelisted prepositions governing this word.
    pub prep_mods: Vec<PrepAnnotation>,
    /// Display suffix for the host word (English possessive `'s`).
    pub repr_mod_suffix: Option<String>,
}

impl WordExtra {
    pub fn is_empty(&self) -> bool {
        self.prep_white_list.is_none() && self.prep_mods.is_empty() && self.repr_mod_suffix.is_none()
    }
}

/// A single token of a parsed sentence.
#[derive(Debug, Clone, Default)]
pub struct Word {
    pub lemma: String,
    pub form: Option<String>,
    /// Byte offset of the form in the original text.
    pub offset: usize,
    /// Byte length of the form in the original text.
    pub len: usize,

    pub pos_tag: PosTag,
    /// Relation to the syntactic head.
    pub synt_link: Option<SyntLink>,
    /// Signed offset from this word's index to its head; 0 for root/no head.
    pub parent_offs: i32,

    pub lang: Option<Lang>,

    pub number: Option<Number>,
    pub gender: Option<Gender>,
    pub case: Option<Case>,
    pub tense: Option<Tense>,
    pub person: Option<Person>,
    pub degree: Option<Degree>,
    pub aspect: Option<Aspect>,
    pub voice: Option<Voice>,
    pub mood: Option<Mood>,
    pub num_type: Option<NumType>,
    pub animacy: Option<Animacy>,

    pub extra: WordExtra,

    /// Multi-word expressions this word is the head of.
    pub mwes: Vec<Phrase>,

    word_id: OnceLock<u64>,
}

impl Word {
    pub fn new(lemma: impl Into<String>) -> Self {
        Word {
            lemma: lemma.into(),
            ..Default::default()
        }
    }

    /// Test/ingestion convenience: lemma, PoS and link in one call.
    pub fn tagged(
        lemma: impl Into<String>,
        pos_tag: PosTag,
        parent_offs: i32,
        synt_link: SyntLink,
    ) -> Self {
        Word {
            lemma: lemma.into(),
            pos_tag,
            parent_offs,
            synt_link: Some(synt_link),
            ..Default::default()
        }
    }

    pub fn with_lang(mut self, lang: Lang) -> Self {
        self.lang = Some(lang);
        self
    }

    pub fn with_number(mut self, number: Number) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_case(mut self, case: Case) -> Self {
        self.case = Some(case);
        self
    }

    pub fn with_tense(mut self, tense: Tense) -> Self {
        self.tense = Some(tense);
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Lazily computed 64-bit fingerprint over (lemma, lang).
    ///
    /// None when the lemma is empty; such words never enter phrases.
    pub fn word_id(&self) -> Option<u64> {
        if self.lemma.is_empty() {
            return None;
        }
        Some(
            *self
                .word_id
                .get_or_init(|| word_id::calc(&self.lemma, self.lang).unwrap_or(0)),
        )
    }

    /// True when this word heads at least one multi-word expression.
    pub fn has_mwes(&self) -> bool {
        !self.mwes.is_empty()
    }
}
