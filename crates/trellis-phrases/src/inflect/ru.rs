//! Russian inflector
//!
//! Agreement-driven rewriting backed by a morphological analyzer. The
//! analyzer is a seam: [`MorphAnalyzer`] yields parse variants (lexemes with
//! tagged forms) for a surface word; [`DictMorph`] is the dictionary-backed
//! implementation loaded from a gzipped JSON lexicon, and tests plug small
//! in-memory lexicons through the same trait. Parses are cached in a bounded
//! LRU.
//!
//! Nominal modifiers linked by NMOD or a tight-compound relation are put into
//! their own (number, case, gender); adjectives and participles agree with
//! the head in number, gender (singular only) and the case recorded for the
//! head slot. Participle lookups additionally filter by voice and tense.
//! Anything the dictionary cannot resolve keeps its lemma form.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::debug;

use trellis_core::features::{Case, Gender, Number, Tense, Voice};
use trellis_core::phrase::Phrase;
use trellis_core::tags::{PosTag, SyntLink};
use trellis_core::word::Word;
use trellis_core::Sentence;
use trellis_engine::{EngineCache, EngineError, EngineResult};

use super::{capitalize, visit_order, Inflector, VisitEvent};

const RU_LEXICON_GZ: &[u8] = include_bytes!("../../resources/ru_lexicon.json.gz");

/// Capacity of the parse cache.
pub const MORPH_CACHE_CAPACITY: usize = 20_000;

/// Morphological word class, pymorphy-style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphPos {
    /// Noun.
    Noun,
    /// Full adjective.
    Adjf,
    /// Full participle.
    Prtf,
    /// Infinitive.
    Infn,
}

/// Grammemes of one dictionary form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphTag {
    pub pos: MorphPos,
    pub gender: Option<Gender>,
    pub number: Option<Number>,
    pub case: Option<Case>,
    pub voice: Option<Voice>,
    pub tense: Option<Tense>,
}

impl MorphTag {
    /// Parse a compact tag string (`"ADJF,femn,sing,nomn"`). The case tokens
    /// follow the pymorphy naming: nomn, gent, accs, datv, ablt, loct, voct.
    pub fn parse(tag: &str) -> Option<Self> {
        let mut out = MorphTag {
            pos: MorphPos::Noun,
            gender: None,
            number: None,
            case: None,
            voice: None,
            tense: None,
        };
        let mut has_pos = false;
        for token in tag.split(',').map(str::trim) {
            match token {
                "NOUN" => {
                    out.pos = MorphPos::Noun;
                    has_pos = true;
                }
                "ADJF" => {
                    out.pos = MorphPos::Adjf;
                    has_pos = true;
                }
                "PRTF" => {
                    out.pos = MorphPos::Prtf;
                    has_pos = true;
                }
                "INFN" => {
                    out.pos = MorphPos::Infn;
                    has_pos = true;
                }
                "masc" => out.gender = Some(Gender::Masc),
                "femn" => out.gender = Some(Gender::Fem),
                "neut" => out.gender = Some(Gender::Neut),
                "sing" => out.number = Some(Number::Sing),
                "plur" => out.number = Some(Number::Plur),
                "nomn" => out.case = Some(Case::Nom),
                "gent" => out.case = Some(Case::Gen),
                "accs" => out.case = Some(Case::Acc),
                "datv" => out.case = Some(Case::Dat),
                "ablt" => out.case = Some(Case::Ins),
                "loct" => out.case = Some(Case::Loc),
                "voct" => out.case = Some(Case::Voc),
                "actv" => out.voice = Some(Voice::Act),
                "pssv" => out.voice = Some(Voice::Pass),
                "pres" => out.tense = Some(Tense::Pres),
                "past" => out.tense = Some(Tense::Past),
                "" => {}
                other => {
                    debug!(token = other, "unknown grammeme token");
                    return None;
                }
            }
        }
        has_pos.then_some(out)
    }
}

/// A tagged surface form of a lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphForm {
    pub form: String,
    pub tag: MorphTag,
}

/// One dictionary lexeme: all forms of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub forms: Vec<MorphForm>,
}

/// Source of morphological parses.
pub trait MorphAnalyzer: Send + Sync {
    /// All lexemes containing the given surface form.
    fn parse(&self, word: &str) -> Vec<Arc<Lexeme>>;
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    lexemes: Vec<Vec<(String, String)>>,
}

/// Dictionary-backed analyzer with a form index.
pub struct DictMorph {
    lexemes: Vec<Arc<Lexeme>>,
    index: HashMap<String, Vec<usize>>,
}

impl DictMorph {
    /// Load the bundled demo lexicon.
    pub fn bundled() -> EngineResult<Self> {
        Self::from_gzip_reader(RU_LEXICON_GZ)
    }

    /// Load a lexicon from gzipped JSON: `{"lexemes": [[[form, tag], ..], ..]}`.
    pub fn from_gzip_reader<R: Read>(reader: R) -> EngineResult<Self> {
        let mut decoder = GzDecoder::new(reader);
        let mut json = String::new();
        decoder
            .read_to_string(&mut json)
            .map_err(|e| EngineError::resource("ru_lexicon.json.gz", e.to_string()))?;
        let file: LexiconFile = serde_json::from_str(&json)?;

        let mut lexemes = Vec::with_capacity(file.lexemes.len());
        for entry in file.lexemes {
            let mut forms = Vec::with_capacity(entry.len());
            for (form, tag) in entry {
                let Some(tag) = MorphTag::parse(&tag) else {
                    return Err(EngineError::resource(
                        "ru_lexicon.json.gz",
                        format!("unparseable tag for form {form}"),
                    ));
                };
                forms.push(MorphForm { form, tag });
            }
            lexemes.push(Lexeme { forms });
        }
        Ok(Self::from_lexemes(lexemes))
    }

    pub fn from_lexemes(lexemes: Vec<Lexeme>) -> Self {
        let lexemes: Vec<Arc<Lexeme>> = lexemes.into_iter().map(Arc::new).collect();
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, lexeme) in lexemes.iter().enumerate() {
            for form in &lexeme.forms {
                let entry = index.entry(form.form.clone()).or_default();
                if !entry.contains(&i) {
                    entry.push(i);
                }
            }
        }
        DictMorph { lexemes, index }
    }
}

impl MorphAnalyzer for DictMorph {
    fn parse(&self, word: &str) -> Vec<Arc<Lexeme>> {
        self.index
            .get(word)
            .map(|ids| ids.iter().map(|&i| Arc::clone(&self.lexemes[i])).collect())
            .unwrap_or_default()
    }
}

/// Target grammemes for one rewrite.
#[derive(Debug, Clone, Default)]
struct InflectTarget {
    number: Option<Number>,
    gender: Option<Gender>,
    case: Option<Case>,
    voice: Option<Voice>,
    tense: Option<Tense>,
}

/// Morphology-driven Russian inflector.
pub struct RuInflector {
    analyzer: Box<dyn MorphAnalyzer>,
    parse_cache: EngineCache<String, Vec<Arc<Lexeme>>>,
}

impl RuInflector {
    pub fn new(analyzer: Box<dyn MorphAnalyzer>) -> Self {
        RuInflector {
            analyzer,
            parse_cache: EngineCache::new(MORPH_CACHE_CAPACITY),
        }
    }

    /// Inflector over the bundled demo lexicon.
    pub fn bundled() -> EngineResult<Self> {
        Ok(Self::new(Box::new(DictMorph::bundled()?)))
    }

    fn parses(&self, word: &str) -> Vec<Arc<Lexeme>> {
        self.parse_cache
            .get_or_insert_with(word.to_string(), || self.analyzer.parse(word))
    }

    /// Rewrite `word` as the given class into the target grammemes.
    /// `participle_of` supplies voice/tense when the surface form is an
    /// infinitive whose participle is wanted.
    fn inflect_word(
        &self,
        word: &str,
        pos: MorphPos,
        target: &InflectTarget,
        participle_of: Option<&Word>,
    ) -> Option<String> {
        let lexemes = self.parses(word);

        let mut reading: Option<(Arc<Lexeme>, MorphTag)> = None;
        'search: for lexeme in &lexemes {
            for form in &lexeme.forms {
                if form.form == word
                    && form.tag.pos == pos
                    && matches!(form.tag.case, Some(Case::Nom) | None)
                {
                    reading = Some((Arc::clone(lexeme), form.tag.clone()));
                    break 'search;
                }
            }
        }

        // a participle may only be reachable through its infinitive
        if reading.is_none() && pos == MorphPos::Prtf {
            let source = participle_of?;
            let voice = source.voice.unwrap_or(Voice::Act);
            let tense = source.tense.unwrap_or(Tense::Pres);
            if voice == Voice::Mid || !matches!(tense, Tense::Pres | Tense::Past) {
                return None;
            }
            'infn: for lexeme in &lexemes {
                if !lexeme
                    .forms
                    .iter()
                    .any(|f| f.form == word && f.tag.pos == MorphPos::Infn)
                {
                    continue;
                }
                for form in &lexeme.forms {
                    if form.tag.pos == MorphPos::Prtf
                        && form.tag.voice == Some(voice)
                        && form.tag.tense == Some(tense)
                        && form.tag.case == Some(Case::Nom)
                    {
                        reading = Some((Arc::clone(lexeme), form.tag.clone()));
                        break 'infn;
                    }
                }
            }
        }

        let (lexeme, reading_tag) = reading?;

        let mut target = target.clone();
        // the dictionary knows no gender for this reading, do not require one
        if reading_tag.gender.is_none() {
            target.gender = None;
        }
        if pos == MorphPos::Prtf {
            target.voice = reading_tag.voice.or(target.voice);
            target.tense = reading_tag.tense.or(target.tense);
        }
        let want_case = target.case.unwrap_or(Case::Nom);

        lexeme
            .forms
            .iter()
            .find(|f| {
                f.tag.pos == pos
                    && f.tag.case == Some(want_case)
                    && target.number.map_or(true, |n| f.tag.number == Some(n))
                    && target.gender.map_or(true, |g| f.tag.gender == Some(g))
                    && target.voice.map_or(true, |v| f.tag.voice == Some(v))
                    && target.tense.map_or(true, |t| f.tag.tense == Some(t))
            })
            .map(|f| f.form.clone())
    }

    /// Inflect a nominal modifier into its own number, case and gender.
    fn inflect_to_case(&self, word: &str, mod_word: &Word) -> Option<(String, Case)> {
        let case = mod_word.case?;
        if case == Case::Par {
            debug!(case = ?case, "case not supported by the dictionary; leaving word unchanged");
            return None;
        }
        let target = InflectTarget {
            number: Some(mod_word.number.unwrap_or(Number::Sing)),
            gender: mod_word.gender,
            case: Some(case),
            ..Default::default()
        };
        let form = self.inflect_word(word, MorphPos::Noun, &target, None)?;
        Some((form, case))
    }

    /// Follow a CONJ chain in the sentence to the effective relation.
    fn resolve_conj_link(&self, sent: &Sentence, mut pos: usize) -> Option<SyntLink> {
        let mut steps = 0;
        while sent[pos].synt_link == Some(SyntLink::Conj) {
            pos = sent.head_of(pos)?;
            steps += 1;
            if steps > sent.len() {
                return None;
            }
        }
        sent[pos].synt_link
    }

    fn inflect_head(&self, phrase: &mut Phrase, sent: &Sentence, slot: usize) {
        let word = &sent[phrase.sent_pos_list()[slot]];
        if word.pos_tag.is_nominal() && word.number == Some(Number::Plur) {
            let target = InflectTarget {
                number: Some(Number::Plur),
                ..Default::default()
            };
            if let Some(form) = self.inflect_word(&phrase.words()[slot], MorphPos::Noun, &target, None)
            {
                phrase.words_mut()[slot] = form;
            }
        }
        if word.pos_tag == PosTag::Propn {
            phrase.words_mut()[slot] = capitalize(&phrase.words()[slot]);
        }
    }

    fn inflect_pair(
        &self,
        phrase: &mut Phrase,
        sent: &Sentence,
        cases: &mut [Case],
        head_slot: usize,
        mod_slot: usize,
    ) {
        let head_word = &sent[phrase.sent_pos_list()[head_slot]];
        let mod_sent_pos = phrase.sent_pos_list()[mod_slot];
        let mod_word = &sent[mod_sent_pos];
        if !head_word.pos_tag.is_nominal() {
            return;
        }

        if mod_word.pos_tag.is_nominal() {
            let mut link = mod_word.synt_link;
            if link == Some(SyntLink::Conj) {
                link = self.resolve_conj_link(sent, mod_sent_pos);
            }

            let mut form = None;
            if matches!(link, Some(SyntLink::Nmod)) || link.is_some_and(SyntLink::is_mwe) {
                if let Some((inflected, case)) = self.inflect_to_case(&phrase.words()[mod_slot], mod_word)
                {
                    cases[mod_slot] = case;
                    form = Some(inflected);
                }
            }
            if mod_word.pos_tag == PosTag::Propn {
                form = Some(capitalize(
                    form.as_deref().unwrap_or(&phrase.words()[mod_slot]),
                ));
            }
            if let Some(form) = form {
                phrase.words_mut()[mod_slot] = form;
            }
        } else if matches!(mod_word.pos_tag, PosTag::Adj | PosTag::Participle) {
            let number = if head_word.number == Some(Number::Plur) {
                Number::Plur
            } else {
                Number::Sing
            };
            let target = InflectTarget {
                number: Some(number),
                gender: (number == Number::Sing)
                    .then_some(head_word.gender)
                    .flatten(),
                case: Some(cases[head_slot]),
                ..Default::default()
            };
            let (pos, participle_of) = if mod_word.pos_tag == PosTag::Adj {
                (MorphPos::Adjf, None)
            } else {
                (MorphPos::Prtf, Some(mod_word))
            };
            if let Some(form) = self.inflect_word(&phrase.words()[mod_slot], pos, &target, participle_of)
            {
                phrase.words_mut()[mod_slot] = form;
            }
        }
    }
}

impl Inflector for RuInflector {
    fn inflect_phrase(&self, phrase: &mut Phrase, sent: &Sentence) {
        let mut cases = vec![Case::Nom; phrase.size()];
        for event in visit_order(phrase.deps(), phrase.head_pos()) {
            match event {
                VisitEvent::Head(slot) => self.inflect_head(phrase, sent, slot),
                VisitEvent::Pair { head, modifier } => {
                    self.inflect_pair(phrase, sent, &mut cases, head, modifier)
                }
            }
        }
    }
}
