//! Sentence and document containers
//!
//! A [`Sentence`] owns an ordered sequence of words and, after extraction,
//! the phrases computed over them. Filtering words repairs the dependency
//! links of the survivors: a parent that survives is re-addressed by a new
//! relative offset, a removed parent turns its dependents into ORPHAN roots.
//! Phrases that cross a removed word are dropped; the rest are repositioned.

use tracing::warn;

use crate::phrase::Phrase;
use crate::tags::{Lang, SyntLink};
use crate::word::Word;

/// An ordered sequence of parsed words plus computed phrases.
#[derive(Debug, Clone, Default)]
pub struct Sentence {
    words: Vec<Word>,
    phrases: Vec<Phrase>,
}

impl Sentence {
    pub fn new(words: Vec<Word>) -> Self {
        Sentence {
            words,
            phrases: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn add_word(&mut self, word: Word) {
        self.words.push(word);
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    pub fn word(&self, pos: usize) -> &Word {
        &self.words[pos]
    }

    pub fn get(&self, pos: usize) -> Option<&Word> {
        self.words.get(pos)
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn set_phrases(&mut self, phrases: Vec<Phrase>) {
        self.phrases = phrases;
    }

    pub fn take_phrases(&mut self) -> Vec<Phrase> {
        std::mem::take(&mut self.phrases)
    }

    /// Sentence position of a word's head, if the word has one and the link
    /// stays inside the sentence.
    pub fn head_of(&self, pos: usize) -> Option<usize> {
        let offs = self.words.get(pos)?.parent_offs;
        if offs == 0 {
            return None;
        }
        let head = pos as i64 + offs as i64;
        if head < 0 || head >= self.len() as i64 {
            warn!(pos, offs, len = self.len(), "dependency link points outside the sentence");
            return None;
        }
        Some(head as usize)
    }

    /// Remove every word for which `filtered` returns true, repairing the
    /// dependency links of the survivors and repositioning attached phrases.
    pub fn filter_words<F>(&mut self, mut filtered: F)
    where
        F: FnMut(&Word, usize, &Sentence) -> bool,
    {
        let removed: Vec<bool> = (0..self.len())
            .map(|pos| filtered(&self.words[pos], pos, self))
            .collect();
        if removed.iter().all(|r| !r) {
            return;
        }

        let mut new_positions = vec![-1i64; self.len()];
        let mut cur = 0i64;
        for (pos, is_removed) in removed.iter().enumerate() {
            if !is_removed {
                new_positions[pos] = cur;
                cur += 1;
            }
        }

        let mut new_words = Vec::with_capacity(cur as usize);
        for (pos, word) in self.words.drain(..).enumerate() {
            if new_positions[pos] != -1 {
                new_words.push(word);
            }
        }

        adjust_syntax_links(&mut new_words, &new_positions);
        self.words = new_words;
        self.adjust_phrases(&new_positions);
    }

    fn adjust_phrases(&mut self, new_positions: &[i64]) {
        if self.phrases.is_empty() {
            return;
        }
        let phrases = std::mem::take(&mut self.phrases);
        self.phrases = phrases
            .into_iter()
            .filter_map(|mut phrase| {
                let remapped: Option<Vec<usize>> = phrase
                    .sent_pos_list()
                    .iter()
                    .map(|&p| match new_positions.get(p) {
                        Some(&np) if np >= 0 => Some(np as usize),
                        _ => None,
                    })
                    .collect();
                match remapped {
                    Some(positions) => {
                        phrase.set_sent_pos_list(positions);
                        Some(phrase)
                    }
                    None => None,
                }
            })
            .collect();
    }
}

impl std::ops::Index<usize> for Sentence {
    type Output = Word;

    fn index(&self, pos: usize) -> &Word {
        &self.words[pos]
    }
}

impl<'a> IntoIterator for &'a Sentence {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

/// Repair `parent_offs`/`synt_link` after words were removed.
///
/// `new_positions[old_pos]` is the surviving index or -1.
fn adjust_syntax_links(new_words: &mut [Word], new_positions: &[i64]) {
    for (old_pos, &new_pos) in new_positions.iter().enumerate() {
        if new_pos == -1 {
            continue;
        }
        let word = &mut new_words[new_pos as usize];
        let offs = word.parent_offs;
        if offs == 0 {
            continue;
        }

        let old_parent = old_pos as i64 + offs as i64;
        if old_parent < 0 || old_parent >= new_positions.len() as i64 {
            warn!(old_pos, offs, "dangling dependency link while filtering; orphaning word");
            word.parent_offs = 0;
            word.synt_link = Some(SyntLink::Orphan);
            continue;
        }

        let new_parent = new_positions[old_parent as usize];
        if new_parent == -1 {
            word.parent_offs = 0;
            word.synt_link = Some(SyntLink::Orphan);
        } else {
            word.parent_offs = (new_parent - new_pos) as i32;
        }
    }
}

/// An ordered collection of sentences sharing a document language.
#[derive(Debug, Clone, Default)]
pub struct Document {
    lang: Option<Lang>,
    sents: Vec<Sentence>,
}

impl Document {
    pub fn new(lang: Option<Lang>) -> Self {
        Document {
            lang,
            sents: Vec::new(),
        }
    }

    pub fn with_sents(lang: Option<Lang>, sents: Vec<Sentence>) -> Self {
        Document { lang, sents }
    }

    pub fn lang(&self) -> Option<Lang> {
        self.lang
    }

    pub fn set_lang(&mut self, lang: Lang) {
        self.lang = Some(lang);
    }

    pub fn add_sent(&mut self, sent: Sentence) {
        self.sents.push(sent);
    }

    pub fn len(&self) -> usize {
        self.sents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sents.is_empty()
    }

    pub fn sents(&self) -> &[Sentence] {
        &self.sents
    }

    pub fn sents_mut(&mut self) -> &mut [Sentence] {
        &mut self.sents
    }
}

impl std::ops::Index<usize> for Document {
    type Output = Sentence;

    fn index(&self, pos: usize) -> &Sentence {
        &self.sents[pos]
    }
}
