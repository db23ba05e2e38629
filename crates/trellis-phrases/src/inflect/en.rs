//! English inflector
//!
//! Pluralization and participle formation by exception table plus rules.
//! The exception table ships as a gzipped JSON resource:
//! `{"noun": {lemma: plural}, "verb": {lemma: {"prp": .., "pap": ..}}}`.

use std::collections::HashMap;
use std::io::Read;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use trellis_core::features::{Number, Tense};
use trellis_core::phrase::Phrase;
use trellis_core::tags::PosTag;
use trellis_core::Sentence;
use trellis_engine::{EngineError, EngineResult};

use super::{capitalize, visit_order, Inflector, VisitEvent};

const EN_EXCEPTIONS_GZ: &[u8] = include_bytes!("../../resources/en_lemma_exc.json.gz");

/// Nouns that already denote a plural.
const ALREADY_PLURAL: &[&str] = &[
    "people", "fish", "sheep", "deer", "moose", "aircraft", "rights", "statistics", "belongings",
    "binoculars", "boxers", "briefs", "clothes", "congratulations", "dislikes", "earnings",
    "glasses", "goggles", "goods", "headphones", "jeans", "knickers", "likes", "outskirts",
    "panties", "pants", "pliers", "premises", "pyjamas", "savings", "scissors", "shorts",
    "stairs", "sunglasses", "surroundings", "thanks", "tights", "tongs", "trousers", "tweezers",
];

/// Irregular participle forms of a verb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbExcpForms {
    #[serde(rename = "prp", skip_serializing_if = "Option::is_none", default)]
    pub pres_part: Option<String>,
    #[serde(rename = "pap", skip_serializing_if = "Option::is_none", default)]
    pub past_part: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExceptionFile {
    noun: HashMap<String, String>,
    verb: HashMap<String, VerbExcpForms>,
}

/// Rule-plus-exception English inflector.
pub struct EnInflector {
    noun_exceptions: HashMap<String, String>,
    verb_exceptions: HashMap<String, VerbExcpForms>,
}

impl EnInflector {
    /// Load the bundled exception table.
    pub fn bundled() -> EngineResult<Self> {
        Self::from_gzip_reader(EN_EXCEPTIONS_GZ)
    }

    /// Load an exception table from gzipped JSON.
    pub fn from_gzip_reader<R: Read>(reader: R) -> EngineResult<Self> {
        let mut decoder = GzDecoder::new(reader);
        let mut json = String::new();
        decoder
            .read_to_string(&mut json)
            .map_err(|e| EngineError::resource("en_lemma_exc.json.gz", e.to_string()))?;
        let file: ExceptionFile = serde_json::from_str(&json)?;
        Ok(EnInflector {
            noun_exceptions: file.noun,
            verb_exceptions: file.verb,
        })
    }

    /// Table for tests and embedders with their own exception data.
    pub fn from_tables(
        noun_exceptions: HashMap<String, String>,
        verb_exceptions: HashMap<String, VerbExcpForms>,
    ) -> Self {
        EnInflector {
            noun_exceptions,
            verb_exceptions,
        }
    }

    fn inflect_plural(&self, lemma: &str) -> Option<String> {
        if lemma.is_empty() {
            return None;
        }
        if ALREADY_PLURAL.contains(&lemma) {
            return Some(lemma.to_string());
        }
        if let Some(form) = self.noun_exceptions.get(lemma) {
            return Some(form.clone());
        }

        let last = lemma.chars().last()?;
        if matches!(last, 's' | 'x' | 'z') {
            return Some(format!("{lemma}es"));
        }
        if lemma.len() > 1 {
            if lemma.ends_with("sh") || lemma.ends_with("ch") {
                return Some(format!("{lemma}es"));
            }
            if last == 'y' {
                let before = lemma.chars().rev().nth(1)?;
                if !"aeiou".contains(before) {
                    return Some(format!("{}ies", &lemma[..lemma.len() - 1]));
                }
            }
        }
        Some(format!("{lemma}s"))
    }

    fn present_participle(&self, lemma: &str) -> Option<String> {
        if let Some(excp) = self.verb_exceptions.get(lemma) {
            if let Some(form) = &excp.pres_part {
                return Some(form.clone());
            }
        }
        if let Some(stem) = lemma.strip_suffix("ie") {
            return Some(format!("{stem}ying"));
        }
        if let Some(stem) = lemma.strip_suffix('e') {
            return Some(format!("{stem}ing"));
        }
        if !lemma.ends_with("ing") {
            return Some(format!("{lemma}ing"));
        }
        None
    }

    fn past_participle(&self, lemma: &str) -> Option<String> {
        if let Some(excp) = self.verb_exceptions.get(lemma) {
            if let Some(form) = &excp.past_part {
                return Some(form.clone());
            }
        }
        if lemma.ends_with('e') {
            return Some(format!("{lemma}d"));
        }
        if !lemma.ends_with("ed") {
            return Some(format!("{lemma}ed"));
        }
        None
    }
}

impl Inflector for EnInflector {
    fn inflect_phrase(&self, phrase: &mut Phrase, sent: &Sentence) {
        let positions: Vec<usize> = phrase.sent_pos_list().to_vec();
        for event in visit_order(phrase.deps(), phrase.head_pos()) {
            match event {
                VisitEvent::Head(slot) => {
                    let word = &sent[positions[slot]];
                    if word.number == Some(Number::Plur) {
                        if let Some(form) = self.inflect_plural(&phrase.words()[slot]) {
                            phrase.words_mut()[slot] = form;
                        }
                    }
                    if word.pos_tag == PosTag::Propn {
                        phrase.words_mut()[slot] = capitalize(&phrase.words()[slot]);
                    }
                }
                VisitEvent::Pair { head, modifier } => {
                    let head_word = &sent[positions[head]];
                    let mod_word = &sent[positions[modifier]];
                    if !head_word.pos_tag.is_nominal() {
                        continue;
                    }
                    let current = phrase.words()[modifier].clone();
                    let mut form = None;

                    if mod_word.pos_tag.is_nominal() {
                        if mod_word.number == Some(Number::Plur) {
                            form = self.inflect_plural(&current);
                        }
                        if mod_word.pos_tag == PosTag::Propn {
                            form = Some(capitalize(form.as_deref().unwrap_or(&current)));
                        }
                    } else if (mod_word.pos_tag == PosTag::Participle
                        && matches!(mod_word.tense, None | Some(Tense::Pres)))
                        || mod_word.pos_tag == PosTag::Gerund
                    {
                        form = self.present_participle(&current);
                    } else if mod_word.pos_tag == PosTag::Participle
                        && mod_word.tense == Some(Tense::Past)
                    {
                        form = self.past_participle(&current);
                    }

                    if let Some(form) = form {
                        phrase.words_mut()[modifier] = form;
                    }
                }
            }
        }
    }
}
