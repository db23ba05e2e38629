//! Phrase value objects
//!
//! A [`Phrase`] is an immutable snapshot of a sub-tree of a sentence's
//! dependency tree: the participating token positions, their lemmas, the
//! dependency structure *within* the phrase, a stable order-independent
//! fingerprint and the cosmetic modifiers needed to render a display string.
//!
//! Phrases never alias sentence data; merging two phrases produces a fresh
//! value. Invariants:
//!
//! - `sent_pos_list` is strictly increasing;
//! - `deps` holds exactly one zero, at `head_pos`;
//! - following `deps` from any slot reaches `head_pos` within `size` steps;
//! - `words`, `deps` and `sent_pos_list` have equal length.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::word::{PrepAnnotation, Word};
use crate::word_id;
use crate::CoreError;

/// Order-independent 64-bit fingerprint of a phrase.
///
/// Component word ids are kept canonically ordered around the root id, so two
/// phrases over the same multiset of (word id, prep contribution) collide
/// regardless of modifier order. The preposition id participates only when
/// the phrase merges into another phrase *as a modifier*.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseId {
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    prep_id: Option<u64>,
    #[serde(skip)]
    root: Option<u64>,
    #[serde(skip)]
    id_parts: Vec<u64>,
}

impl PhraseId {
    /// Fingerprint of a single word, with its whitelisted preposition id if
    /// one was annotated.
    pub fn from_word(pos: usize, word: &Word) -> Result<Self, CoreError> {
        let id = word.word_id().ok_or(CoreError::UnidentifiedWord { pos })?;
        let prep_id = word.extra.prep_white_list.as_ref().map(|p| p.word_id);
        Ok(PhraseId {
            id,
            prep_id,
            root: Some(id),
            id_parts: vec![id],
        })
    }

    /// The free-standing phrase id.
    pub fn get_id(&self) -> u64 {
        self.id
    }

    /// The id this phrase contributes when merged as a modifier: the
    /// whitelisted preposition, if any, is folded in.
    pub fn get_id_with_prep(&self) -> u64 {
        match self.prep_id {
            Some(prep) => word_id::combine(prep, self.id),
            None => self.id,
        }
    }

    pub fn prep_id(&self) -> Option<u64> {
        self.prep_id
    }

    /// Fold a modifier's (with-prep) id into this phrase id, keeping the
    /// parts canonically ordered around the root so the result is
    /// order-independent.
    ///
    /// Fails on a fingerprint restored from serialized form: the part list is
    /// not persisted, so such ids are frozen.
    pub fn merge_mod(&mut self, modifier: &PhraseId, on_left: bool) -> Result<(), CoreError> {
        let root = self.root.ok_or(CoreError::FrozenPhraseId)?;
        let mod_id = modifier.get_id_with_prep();

        let mut i;
        if on_left {
            i = 0;
            while self.id_parts[i] != root && mod_id > self.id_parts[i] {
                i += 1;
            }
        } else {
            i = self.id_parts.len();
            while self.id_parts[i - 1] != root && mod_id < self.id_parts[i - 1] {
                i -= 1;
            }
        }
        self.id_parts.insert(i, mod_id);
        self.id = word_id::combine_all(&self.id_parts);
        Ok(())
    }
}

/// Cosmetic decorations of a phrase head, consulted when the phrase is
/// merged as a modifier: its whitelisted preposition and display suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadModifier {
    #[serde(rename = "prep_mod", skip_serializing_if = "Option::is_none", default)]
    pub prep_modifier: Option<PrepAnnotation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repr_mod_suffix: Option<String>,
}

impl HeadModifier {
    pub fn from_word(word: &Word) -> Self {
        HeadModifier {
            prep_modifier: word.extra.prep_white_list.clone(),
            repr_mod_suffix: word.extra.repr_mod_suffix.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prep_modifier.is_none() && self.repr_mod_suffix.is_none()
    }
}

/// How a display enhancer rewrites the rendered phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReprEnhType {
    #[serde(rename = "add_word")]
    AddWord,
    #[serde(rename = "add_suffix")]
    AddSuffix,
}

/// A display-only rewrite attached to a phrase slot. `rel_pos` is relative to
/// the slot the enhancer is attached to, so enhancers survive merges that
/// shift absolute slot indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReprEnhancer {
    #[serde(rename = "rel_pos", alias = "p")]
    pub rel_pos: i32,
    #[serde(rename = "enh_type", alias = "e")]
    pub enh_type: ReprEnhType,
    #[serde(rename = "value", alias = "v")]
    pub value: String,
}

/// Phrase provenance: default enumeration or the tight-compound pre-pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhraseType {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "mwe")]
    Mwe,
}

fn no_repr_modifiers(mods: &[Option<Vec<ReprEnhancer>>]) -> bool {
    mods.iter().all(Option::is_none)
}

fn is_default_type(t: &PhraseType) -> bool {
    *t == PhraseType::Default
}

/// An extracted phrase. See the module docs for the invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phrase {
    #[serde(rename = "head_pos", alias = "h")]
    head_pos: usize,
    #[serde(rename = "sent_pos_list", alias = "p")]
    sent_pos_list: Vec<usize>,
    #[serde(rename = "words", alias = "w")]
    words: Vec<String>,
    #[serde(rename = "deps", alias = "d")]
    deps: Vec<i32>,
    #[serde(rename = "id_holder", alias = "i")]
    id_holder: PhraseId,
    #[serde(
        rename = "head_mod",
        alias = "hm",
        skip_serializing_if = "HeadModifier::is_empty",
        default
    )]
    head_modifier: HeadModifier,
    #[serde(
        rename = "repr_modifiers",
        alias = "r",
        skip_serializing_if = "no_repr_modifiers",
        default
    )]
    repr_modifiers: Vec<Option<Vec<ReprEnhancer>>>,
    #[serde(
        rename = "type",
        alias = "t",
        skip_serializing_if = "is_default_type",
        default
    )]
    phrase_type: PhraseType,
}

impl Phrase {
    /// Singleton phrase over one sentence word.
    pub fn from_word(pos: usize, word: &Word) -> Result<Self, CoreError> {
        if word.lemma.is_empty() {
            return Err(CoreError::UnidentifiedWord { pos });
        }
        Ok(Phrase {
            head_pos: 0,
            sent_pos_list: vec![pos],
            words: vec![word.lemma.clone()],
            deps: vec![0],
            id_holder: PhraseId::from_word(pos, word)?,
            head_modifier: HeadModifier::from_word(word),
            repr_modifiers: vec![None],
            phrase_type: PhraseType::Default,
        })
    }

    /// Assemble a phrase from already-merged parts. Used by the merge
    /// operation; the caller is responsible for the invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        head_pos: usize,
        sent_pos_list: Vec<usize>,
        words: Vec<String>,
        deps: Vec<i32>,
        id_holder: PhraseId,
        head_modifier: HeadModifier,
        repr_modifiers: Vec<Option<Vec<ReprEnhancer>>>,
        phrase_type: PhraseType,
    ) -> Self {
        Phrase {
            head_pos,
            sent_pos_list,
            words,
            deps,
            id_holder,
            head_modifier,
            repr_modifiers,
            phrase_type,
        }
    }

    pub fn size(&self) -> usize {
        self.sent_pos_list.len()
    }

    /// Index of the head within the phrase.
    pub fn head_pos(&self) -> usize {
        self.head_pos
    }

    /// Position of the head in the sentence.
    pub fn sent_hp(&self) -> usize {
        self.sent_pos_list[self.head_pos]
    }

    /// Positions of the phrase parts in the sentence, strictly increasing.
    pub fn sent_pos_list(&self) -> &[usize] {
        &self.sent_pos_list
    }

    pub fn set_sent_pos_list(&mut self, sent_pos_list: Vec<usize>) {
        self.sent_pos_list = sent_pos_list;
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Mutable lemma slots; the inflection engine rewrites these in place.
    pub fn words_mut(&mut self) -> &mut Vec<String> {
        &mut self.words
    }

    /// Signed offsets from each slot to its in-phrase head; 0 marks the root.
    pub fn deps(&self) -> &[i32] {
        &self.deps
    }

    pub fn id_holder(&self) -> &PhraseId {
        &self.id_holder
    }

    pub fn get_id(&self) -> u64 {
        self.id_holder.get_id()
    }

    pub fn head_modifier(&self) -> &HeadModifier {
        &self.head_modifier
    }

    pub fn phrase_type(&self) -> PhraseType {
        self.phrase_type
    }

    pub fn set_phrase_type(&mut self, phrase_type: PhraseType) {
        self.phrase_type = phrase_type;
    }

    /// Display enhancers attached at `slot`, tolerant of phrases restored
    /// from serialized form where the enhancer vector was elided.
    pub fn repr_modifiers_at(&self, slot: usize) -> Option<&[ReprEnhancer]> {
        self.repr_modifiers
            .get(slot)
            .and_then(|m| m.as_deref())
            .filter(|m| !m.is_empty())
    }

    /// The inflected (or lemma) sequence rendered with display enhancers.
    pub fn get_str_repr(&self) -> String {
        if (0..self.size()).all(|i| self.repr_modifiers_at(i).is_none()) {
            return self.words.join(" ");
        }

        let mut words = self.words.clone();
        for slot in 0..self.size() {
            let Some(enhancers) = self.repr_modifiers_at(slot) else {
                continue;
            };
            for enh in enhancers {
                let target = slot as i64 + enh.rel_pos as i64;
                if target < 0 || target >= words.len() as i64 {
                    warn!(slot, rel_pos = enh.rel_pos, "repr enhancer points outside phrase");
                    continue;
                }
                let target = target as usize;
                match enh.enh_type {
                    ReprEnhType::AddWord => {
                        words[target] = format!("{} {}", enh.value, words[target]);
                    }
                    ReprEnhType::AddSuffix => {
                        words[target].push_str(&enh.value);
                    }
                }
            }
        }
        words.join(" ")
    }

    /// True if the position spans of the two phrases touch.
    pub fn intersects(&self, other: &Phrase) -> bool {
        !(self.sent_pos_list[self.size() - 1] < other.sent_pos_list[0]
            || self.sent_pos_list[0] > other.sent_pos_list[other.size() - 1])
    }

    /// True if this phrase's span covers the other's span.
    pub fn overlaps(&self, other: &Phrase) -> bool {
        self.sent_pos_list[0] <= other.sent_pos_list[0]
            && self.sent_pos_list[self.size() - 1] >= other.sent_pos_list[other.size() - 1]
    }

    /// True if every position of `other` is a position of this phrase.
    pub fn contains(&self, other: &Phrase) -> bool {
        if !self.overlaps(other) {
            return false;
        }
        let mut j = 0;
        for &other_pos in &other.sent_pos_list {
            loop {
                match self.sent_pos_list.get(j) {
                    Some(&own_pos) if own_pos < other_pos => j += 1,
                    Some(&own_pos) if own_pos == other_pos => {
                        j += 1;
                        break;
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    /// Structural self-check of the phrase invariants.
    pub fn is_well_formed(&self) -> bool {
        let n = self.size();
        if n == 0 || self.words.len() != n || self.deps.len() != n || self.head_pos >= n {
            return false;
        }
        if !self.sent_pos_list.windows(2).all(|w| w[0] < w[1]) {
            return false;
        }
        if self.deps.iter().filter(|&&d| d == 0).count() != 1 || self.deps[self.head_pos] != 0 {
            return false;
        }
        // every slot must reach the head within n steps
        for start in 0..n {
            let mut cur = start as i64;
            let mut steps = 0;
            while cur as usize != self.head_pos {
                cur += self.deps[cur as usize] as i64;
                steps += 1;
                if cur < 0 || cur >= n as i64 || steps > n {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{PosTag, SyntLink};

    fn word(lemma: &str) -> Word {
        Word::tagged(lemma, PosTag::Noun, 0, SyntLink::Root)
    }

    fn phrase_at(positions: &[usize]) -> Phrase {
        let head = positions.len() - 1;
        let mut deps: Vec<i32> = positions.iter().map(|_| 0).collect();
        for (i, d) in deps.iter_mut().enumerate().take(head) {
            *d = (head - i) as i32;
        }
        Phrase::from_parts(
            head,
            positions.to_vec(),
            positions.iter().map(|p| format!("w{p}")).collect(),
            deps,
            PhraseId::from_word(positions[0], &word("stub")).unwrap(),
            HeadModifier::default(),
            vec![None; positions.len()],
            PhraseType::Default,
        )
    }

    #[test]
    fn test_from_word_singleton() {
        let p = Phrase::from_word(3, &word("filter")).unwrap();
        assert_eq!(p.size(), 1);
        assert_eq!(p.sent_hp(), 3);
        assert_eq!(p.words(), ["filter"]);
        assert_eq!(p.deps(), [0]);
        assert!(p.is_well_formed());
    }

    #[test]
    fn test_from_word_rejects_empty_lemma() {
        assert!(matches!(
            Phrase::from_word(0, &Word::new("")),
            Err(CoreError::UnidentifiedWord { pos: 0 })
        ));
    }

    #[test]
    fn test_contains() {
        let big = phrase_at(&[1, 3, 5, 6]);
        let sub = phrase_at(&[3, 6]);
        let other = phrase_at(&[3, 4]);
        assert!(big.contains(&sub));
        assert!(!big.contains(&other));
        assert!(!sub.contains(&big));
        assert!(big.intersects(&other));
    }

    #[test]
    fn test_str_repr_enhancers() {
        let mut p = phrase_at(&[0, 2, 3]);
        *p.words_mut() = vec!["spam".into(), "web".into(), "server".into()];
        p.repr_modifiers = vec![
            None,
            None,
            Some(vec![ReprEnhancer {
                rel_pos: -1,
                enh_type: ReprEnhType::AddWord,
                value: "of".into(),
            }]),
        ];
        assert_eq!(p.get_str_repr(), "spam of web server");

        p.repr_modifiers[0] = Some(vec![ReprEnhancer {
            rel_pos: 0,
            enh_type: ReprEnhType::AddSuffix,
            value: "'s".into(),
        }]);
        assert_eq!(p.get_str_repr(), "spam's of web server");
    }

    #[test]
    fn test_phrase_id_order_independence() {
        let root = word("root");
        let m1 = word("alpha");
        let m2 = word("beta");

        let mut id_a = PhraseId::from_word(2, &root).unwrap();
        id_a.merge_mod(&PhraseId::from_word(0, &m1).unwrap(), true).unwrap();
        id_a.merge_mod(&PhraseId::from_word(1, &m2).unwrap(), true).unwrap();

        let mut id_b = PhraseId::from_word(2, &root).unwrap();
        id_b.merge_mod(&PhraseId::from_word(0, &m2).unwrap(), true).unwrap();
        id_b.merge_mod(&PhraseId::from_word(1, &m1).unwrap(), true).unwrap();

        assert_eq!(id_a.get_id(), id_b.get_id());
    }

    #[test]
    fn test_phrase_id_prep_changes_mod_contribution() {
        let mut with_prep = word("server");
        with_prep.extra.prep_white_list = Some(PrepAnnotation {
            pos: 1,
            surface: "of".into(),
            word_id: 42,
        });
        let plain = word("server");

        let id_plain = PhraseId::from_word(2, &plain).unwrap();
        let id_prep = PhraseId::from_word(2, &with_prep).unwrap();

        // free-standing ids are equal, modifier contributions differ
        assert_eq!(id_plain.get_id(), id_prep.get_id());
        assert_ne!(id_plain.get_id_with_prep(), id_prep.get_id_with_prep());
    }

    #[test]
    fn test_deserialized_id_is_frozen() {
        let id = PhraseId::from_word(0, &word("solo")).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let mut restored: PhraseId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.get_id(), id.get_id());
        assert!(restored
            .merge_mod(&PhraseId::from_word(1, &word("x")).unwrap(), true)
            .is_err());
    }

    #[test]
    fn test_well_formedness_checks() {
        let good = phrase_at(&[0, 1, 4]);
        assert!(good.is_well_formed());

        let mut bad = phrase_at(&[0, 1, 4]);
        bad.deps = vec![0, 0, 0];
        assert!(!bad.is_well_formed());

        let mut cycle = phrase_at(&[0, 1, 4]);
        cycle.deps = vec![1, -1, 0];
        cycle.head_pos = 2;
        assert!(!cycle.is_well_formed());
    }
}
