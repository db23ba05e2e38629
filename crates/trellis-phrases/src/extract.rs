//! Extraction pipelines
//!
//! Wires the passes together: preposition/suffix annotation, the greedy MWE
//! pre-pass, the seeded main build and (for the verb profile) a second build
//! taking the finished noun phrases as arguments. Inflection, when an engine
//! is attached, rewrites the phrase words in place; failures degrade to the
//! lemma form.

use tracing::debug;

use trellis_core::phrase::Phrase;
use trellis_core::{Document, Sentence};

use crate::builder::{BuilderConfig, PhraseBuilder, DEFAULT_MAX_VARIANTS, MAX_SENT_LEN};
use crate::error::{PhraseError, PhraseResult};
use crate::inflect::InflectEngine;
use crate::mwe;
use crate::profile::Profile;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Which phrase sets a pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Noun phrases with the MWE pre-pass ("noun_phrases").
    NounPhrases,
    /// Noun phrases plus verb phrases over them ("verb+noun_phrases").
    VerbNounPhrases,
}

impl PipelineKind {
    pub fn name(self) -> &'static str {
        match self {
            PipelineKind::NounPhrases => "noun_phrases",
            PipelineKind::VerbNounPhrases => "verb+noun_phrases",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "noun_phrases" => Some(PipelineKind::NounPhrases),
            "verb+noun_phrases" => Some(PipelineKind::VerbNounPhrases),
            _ => None,
        }
    }
}

/// Pipeline-wide knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_n: usize,
    pub max_variants_bound: usize,
    pub time_budget: Option<std::time::Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            max_n: 4,
            max_variants_bound: DEFAULT_MAX_VARIANTS,
            time_budget: None,
        }
    }
}

/// A configured extraction pipeline.
pub struct PhrasePipeline {
    kind: PipelineKind,
    config: PipelineConfig,
    noun_profile: Profile,
    mwe_profile: Profile,
    verb_profile: Profile,
    inflector: Option<InflectEngine>,
}

impl PhrasePipeline {
    pub fn new(kind: PipelineKind, max_n: usize) -> PhraseResult<Self> {
        Self::with_config(
            kind,
            PipelineConfig {
                max_n,
                ..Default::default()
            },
        )
    }

    pub fn with_config(kind: PipelineKind, config: PipelineConfig) -> PhraseResult<Self> {
        if config.max_n == 0 {
            return Err(PhraseError::InvalidMaxN { max_n: 0 });
        }
        Ok(PhrasePipeline {
            kind,
            config,
            noun_profile: Profile::noun_phrases(),
            mwe_profile: Profile::mwe(),
            verb_profile: Profile::verb_noun(),
            inflector: None,
        })
    }

    /// Replace the noun-phrase profile (e.g. to admit NUM modifiers).
    pub fn with_noun_profile(mut self, profile: Profile) -> Self {
        self.noun_profile = profile;
        self
    }

    /// Attach an inflection engine; extracted phrases are rendered into
    /// surface forms during annotation.
    pub fn with_inflector(mut self, inflector: InflectEngine) -> Self {
        self.inflector = Some(inflector);
        self
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    /// Extract all phrases of one sentence. MWEs are attached to their head
    /// words as a side effect.
    pub fn extract(&self, sent: &mut Sentence) -> PhraseResult<Vec<Phrase>> {
        if sent.len() > MAX_SENT_LEN {
            return Err(PhraseError::SentenceTooLarge {
                len: sent.len(),
                cap: MAX_SENT_LEN,
            });
        }

        let mwes = mwe::extract_mwes(sent, &self.mwe_profile, self.config.max_n, self.config.time_budget)?;
        mwe::attach_mwes(sent, &mwes);

        let noun_builder = PhraseBuilder::with_config(
            self.noun_profile.clone(),
            BuilderConfig {
                max_n: self.config.max_n,
                max_variants_bound: self.config.max_variants_bound,
                time_budget: self.config.time_budget,
                return_top_level: false,
            },
        )?;
        let mut phrases = noun_builder.build_seeded(sent, &mwes)?;

        if self.kind == PipelineKind::VerbNounPhrases {
            let verb_builder = PhraseBuilder::with_config(
                self.verb_profile.clone(),
                BuilderConfig {
                    max_n: self.config.max_n,
                    max_variants_bound: self.config.max_variants_bound,
                    time_budget: self.config.time_budget,
                    return_top_level: false,
                },
            )?;
            let verb_phrases = verb_builder.build_seeded(sent, &phrases)?;
            phrases.extend(verb_phrases);
        }
        Ok(phrases)
    }

    /// Extract, inflect and attach the phrase set to the sentence.
    pub fn annotate_sentence(&self, sent: &mut Sentence, doc_lang: Option<trellis_core::Lang>) -> PhraseResult<()> {
        let mut phrases = self.extract(sent)?;
        if let Some(inflector) = &self.inflector {
            for phrase in &mut phrases {
                if let Err(err) = inflector.inflect_phrase(phrase, sent, doc_lang) {
                    debug!(%err, "phrase left uninflected");
                }
            }
        }
        sent.set_phrases(phrases);
        Ok(())
    }

    /// Annotate every sentence of a document. With the `parallel` feature the
    /// sentences are processed on the rayon pool; phrases are value types and
    /// the inflection caches are lock-protected, so this is safe.
    pub fn annotate_document(&self, doc: &mut Document) -> PhraseResult<()> {
        let lang = doc.lang();

        #[cfg(feature = "parallel")]
        {
            doc.sents_mut()
                .par_iter_mut()
                .try_for_each(|sent| self.annotate_sentence(sent, lang))
        }
        #[cfg(not(feature = "parallel"))]
        {
            for sent in doc.sents_mut() {
                self.annotate_sentence(sent, lang)?;
            }
            Ok(())
        }
    }
}
