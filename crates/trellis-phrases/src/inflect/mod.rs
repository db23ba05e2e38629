//! Inflection engine
//!
//! Rewrites a phrase's lemma vector into surface forms agreeing with the
//! head's grammatical features. Dispatch is by language: a phrase containing
//! a Russian word goes to the Russian inflector, else an English word to the
//! English one, else the phrase is left alone and an error is reported.
//!
//! Results are cached per phrase under a key of the participating words'
//! (id, PoS, case, number, gender, voice, tense) tuples; inflection always
//! restarts from the sentence lemmas, so applying it twice is a no-op.

pub mod en;
pub mod ru;

use tracing::debug;

use trellis_core::features::{Case, Gender, Number, Tense, Voice};
use trellis_core::phrase::Phrase;
use trellis_core::tags::{Lang, PosTag};
use trellis_core::Sentence;
use trellis_engine::{EngineCache, EngineResult};

use crate::error::{PhraseError, PhraseResult};

pub use en::{EnInflector, VerbExcpForms};
pub use ru::{DictMorph, Lexeme, MorphAnalyzer, MorphForm, MorphPos, MorphTag, RuInflector};

/// Default capacity of the phrase-level inflection cache.
pub const INFLECT_CACHE_CAPACITY: usize = 10_000;

/// A language-specific phrase inflector.
pub trait Inflector {
    /// Rewrite the phrase words in place. Words the inflector cannot handle
    /// stay in lemma form.
    fn inflect_phrase(&self, phrase: &mut Phrase, sent: &Sentence);
}

/// Traversal order over a phrase tree: the head first, then every
/// (head, modifier) pair depth-first. Each slot is visited at most once, so
/// malformed dependency vectors cannot loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VisitEvent {
    Head(usize),
    Pair { head: usize, modifier: usize },
}

pub(crate) fn visit_order(deps: &[i32], head_pos: usize) -> Vec<VisitEvent> {
    let n = deps.len();
    let mut events = Vec::with_capacity(2 * n);
    let mut seen = vec![false; n];
    if head_pos >= n {
        return events;
    }
    seen[head_pos] = true;
    events.push(VisitEvent::Head(head_pos));
    visit_mods(deps, head_pos, &mut seen, &mut events);
    events
}

fn visit_mods(deps: &[i32], head: usize, seen: &mut [bool], events: &mut Vec<VisitEvent>) {
    for modifier in 0..deps.len() {
        if seen[modifier] || deps[modifier] == 0 {
            continue;
        }
        let target = modifier as i64 + deps[modifier] as i64;
        if target == head as i64 {
            seen[modifier] = true;
            events.push(VisitEvent::Pair { head, modifier });
            visit_mods(deps, modifier, seen, events);
        }
    }
}

/// Capitalize a surface form the way titles are: fully-uppercase words stay,
/// anything else gets an uppercase initial.
pub(crate) fn capitalize(word: &str) -> String {
    let has_alpha = word.chars().any(char::is_alphabetic);
    if !has_alpha
        || word
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
    {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

type InflectKey = Vec<(
    u64,
    PosTag,
    Option<Case>,
    Option<Number>,
    Option<Gender>,
    Option<Voice>,
    Option<Tense>,
)>;

/// Language dispatch plus a bounded cache of finished inflections.
pub struct InflectEngine {
    ru: RuInflector,
    en: EnInflector,
    cache: EngineCache<InflectKey, Vec<String>>,
}

impl InflectEngine {
    pub fn new(ru: RuInflector, en: EnInflector) -> Self {
        Self::with_cache_capacity(ru, en, INFLECT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(ru: RuInflector, en: EnInflector, capacity: usize) -> Self {
        InflectEngine {
            ru,
            en,
            cache: EngineCache::new(capacity),
        }
    }

    /// Both inflectors backed by the bundled resources.
    pub fn with_bundled_resources() -> EngineResult<Self> {
        Ok(Self::new(RuInflector::bundled()?, EnInflector::bundled()?))
    }

    pub fn cache_stats(&self) -> trellis_engine::CacheStats {
        self.cache.stats()
    }

    /// Inflect one phrase. `doc_lang` is the fallback for words without a
    /// language tag.
    pub fn inflect_phrase(
        &self,
        phrase: &mut Phrase,
        sent: &Sentence,
        doc_lang: Option<Lang>,
    ) -> PhraseResult<()> {
        let positions: Vec<usize> = phrase.sent_pos_list().to_vec();
        if positions.iter().any(|&p| p >= sent.len()) {
            debug!("phrase positions outside the sentence; leaving it alone");
            return Ok(());
        }

        // restart from canonical lemmas; keeps repeated inflection idempotent
        {
            let words = phrase.words_mut();
            for (slot, &pos) in positions.iter().enumerate() {
                if let Some(word) = sent.get(pos) {
                    words[slot] = word.lemma.clone();
                }
            }
        }

        let key: InflectKey = positions
            .iter()
            .map(|&pos| {
                let w = &sent[pos];
                (
                    w.word_id().unwrap_or(0),
                    w.pos_tag,
                    w.case,
                    w.number,
                    w.gender,
                    w.voice,
                    w.tense,
                )
            })
            .collect();

        if let Some(cached) = self.cache.get(&key) {
            debug!("inflection cache hit");
            *phrase.words_mut() = cached;
            return Ok(());
        }

        let langs: Vec<Option<Lang>> = positions.iter().map(|&p| sent[p].lang.or(doc_lang)).collect();
        if langs.iter().any(|l| *l == Some(Lang::Ru)) {
            self.ru.inflect_phrase(phrase, sent);
        } else if langs.iter().any(|l| *l == Some(Lang::En)) {
            self.en.inflect_phrase(phrase, sent);
        } else {
            return Err(PhraseError::UnsupportedLanguage);
        }

        self.cache.insert(key, phrase.words().to_vec());
        Ok(())
    }

    /// Inflect a batch of phrases over one sentence.
    pub fn inflect_phrases(
        &self,
        phrases: &mut [Phrase],
        sent: &Sentence,
        doc_lang: Option<Lang>,
    ) {
        for phrase in phrases {
            if let Err(err) = self.inflect_phrase(phrase, sent, doc_lang) {
                debug!(%err, "phrase left in lemma form");
            }
        }
    }
}
