//! Pre-build word annotations
//!
//! Before enumeration, each word's left-side ADP children linked with CASE
//! are reconstructed into a preposition surface string (FIXED continuations
//! glued on, e.g. `в качестве`) and routed into the word's extra block:
//! whitelisted prepositions to `prep_white_list`, the rest to `prep_mods`.
//! When several whitelisted prepositions attach to one word, the one closest
//! to it wins. PART children linked with CASE and an `'s`/`'` lemma set the
//! display suffix of the host.
//!
//! Only the sentence's words are mutated; the pass is idempotent.

use tracing::{debug, warn};

use trellis_core::tags::{PosTag, SyntLink};
use trellis_core::word::{PrepAnnotation, WordExtra};
use trellis_core::{word_id, Sentence};

use crate::profile::Profile;

/// Sentence-position children of every word.
pub fn children_index(sent: &Sentence) -> Vec<Vec<usize>> {
    let mut index = vec![Vec::new(); sent.len()];
    for pos in 0..sent.len() {
        if let Some(head) = sent.head_of(pos) {
            index[head].push(pos);
        }
    }
    index
}

/// Recompute the extra annotations of every word.
pub fn annotate(sent: &mut Sentence, profile: &Profile) {
    let children = children_index(sent);
    let extras: Vec<WordExtra> = (0..sent.len())
        .map(|pos| compute_extra(sent, pos, &children, profile))
        .collect();
    for (word, extra) in sent.words_mut().iter_mut().zip(extras) {
        word.extra = extra;
    }
}

fn compute_extra(
    sent: &Sentence,
    pos: usize,
    children: &[Vec<usize>],
    profile: &Profile,
) -> WordExtra {
    let mut extra = WordExtra::default();

    let mut whitelisted: Vec<PrepAnnotation> = Vec::new();
    for &child in &children[pos] {
        if child > pos {
            continue;
        }
        let child_word = &sent[child];
        match (child_word.pos_tag, child_word.synt_link) {
            (PosTag::Adp, Some(SyntLink::Case)) => {
                let surface = reconstruct_prep(sent, child, children);
                let Some(id) = word_id::calc(&surface, child_word.lang) else {
                    debug!(child, "preposition without a lemma; skipping");
                    continue;
                };
                let ann = PrepAnnotation {
                    pos: child,
                    surface,
                    word_id: id,
                };
                if profile.whitelisted_preps.contains(&ann.surface) {
                    whitelisted.push(ann);
                } else {
                    extra.prep_mods.push(ann);
                }
            }
            (PosTag::Part, Some(SyntLink::Case))
                if child_word.lemma == "'s" || child_word.lemma == "'" =>
            {
                extra.repr_mod_suffix = Some(child_word.lemma.clone());
            }
            _ => {}
        }
    }
    // suffix particles may follow the host as well
    for &child in &children[pos] {
        if child <= pos {
            continue;
        }
        let child_word = &sent[child];
        if child_word.pos_tag == PosTag::Part
            && child_word.synt_link == Some(SyntLink::Case)
            && (child_word.lemma == "'s" || child_word.lemma == "'")
        {
            extra.repr_mod_suffix = Some(child_word.lemma.clone());
        }
    }

    if !whitelisted.is_empty() {
        if whitelisted.len() > 1 {
            warn!(
                pos,
                count = whitelisted.len(),
                "several whitelisted prepositions attach to one word; keeping the closest"
            );
        }
        // closest to the head among the left-side children
        extra.prep_white_list = whitelisted.into_iter().max_by_key(|p| p.pos);
    }
    extra
}

/// Glue an ADP with its FIXED continuations into one surface string.
fn reconstruct_prep(sent: &Sentence, adp_pos: usize, children: &[Vec<usize>]) -> String {
    let mut parts = vec![(adp_pos, sent[adp_pos].lemma.clone())];
    for &child in &children[adp_pos] {
        if sent[child].synt_link == Some(SyntLink::Fixed) {
            parts.push((child, sent[child].lemma.clone()));
        }
    }
    parts.sort_by_key(|(p, _)| *p);
    parts
        .into_iter()
        .map(|(_, lemma)| lemma)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Word;

    fn noun_profile() -> Profile {
        Profile::noun_phrases()
    }

    #[test]
    fn test_whitelisted_prep_annotation() {
        // h1 of h2 — "of" is a CASE child of h2
        let mut sent = Sentence::new(vec![
            Word::tagged("h1", PosTag::Noun, 0, SyntLink::Root),
            Word::tagged("of", PosTag::Adp, 1, SyntLink::Case),
            Word::tagged("h2", PosTag::Noun, -2, SyntLink::Nmod),
        ]);
        annotate(&mut sent, &noun_profile());

        let prep = sent[2].extra.prep_white_list.as_ref().unwrap();
        assert_eq!(prep.surface, "of");
        assert_eq!(prep.pos, 1);
        assert!(sent[2].extra.prep_mods.is_empty());
    }

    #[test]
    fn test_non_whitelisted_prep_goes_to_mods() {
        let mut sent = Sentence::new(vec![
            Word::tagged("h1", PosTag::Noun, 0, SyntLink::Root),
            Word::tagged("against", PosTag::Adp, 1, SyntLink::Case),
            Word::tagged("h2", PosTag::Noun, -2, SyntLink::Nmod),
        ]);
        annotate(&mut sent, &noun_profile());

        assert!(sent[2].extra.prep_white_list.is_none());
        assert_eq!(sent[2].extra.prep_mods.len(), 1);
        assert_eq!(sent[2].extra.prep_mods[0].surface, "against");
    }

    #[test]
    fn test_closest_whitelisted_prep_wins() {
        let mut profile = noun_profile();
        profile.whitelisted_preps.insert("near".to_string());
        // two whitelisted CASE children on the left of h2
        let mut sent = Sentence::new(vec![
            Word::tagged("of", PosTag::Adp, 3, SyntLink::Case),
            Word::tagged("x", PosTag::Noun, 2, SyntLink::Nmod),
            Word::tagged("near", PosTag::Adp, 1, SyntLink::Case),
            Word::tagged("h2", PosTag::Noun, 0, SyntLink::Root),
        ]);
        annotate(&mut sent, &profile);

        let prep = sent[3].extra.prep_white_list.as_ref().unwrap();
        assert_eq!(prep.surface, "near");
        assert_eq!(prep.pos, 2);
    }

    #[test]
    fn test_fixed_continuation_reconstruction() {
        let mut profile = noun_profile();
        profile.whitelisted_preps.insert("в качестве".to_string());
        let mut sent = Sentence::new(vec![
            Word::tagged("в", PosTag::Adp, 2, SyntLink::Case),
            Word::tagged("качество", PosTag::Noun, -1, SyntLink::Fixed),
            Word::tagged("пример", PosTag::Noun, 0, SyntLink::Root),
        ]);
        // the FIXED child carries the frozen surface lemma
        sent.words_mut()[1].lemma = "качестве".to_string();
        annotate(&mut sent, &profile);

        let prep = sent[2].extra.prep_white_list.as_ref().unwrap();
        assert_eq!(prep.surface, "в качестве");
    }

    #[test]
    fn test_possessive_suffix() {
        let mut sent = Sentence::new(vec![
            Word::tagged("john", PosTag::Propn, 2, SyntLink::Nmod),
            Word::tagged("'s", PosTag::Part, -1, SyntLink::Case),
            Word::tagged("book", PosTag::Noun, 0, SyntLink::Root),
        ]);
        annotate(&mut sent, &noun_profile());
        assert_eq!(sent[0].extra.repr_mod_suffix.as_deref(), Some("'s"));
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let mut sent = Sentence::new(vec![
            Word::tagged("h1", PosTag::Noun, 0, SyntLink::Root),
            Word::tagged("of", PosTag::Adp, 1, SyntLink::Case),
            Word::tagged("h2", PosTag::Noun, -2, SyntLink::Nmod),
        ]);
        annotate(&mut sent, &noun_profile());
        let first = sent[2].extra.clone();
        annotate(&mut sent, &noun_profile());
        assert_eq!(sent[2].extra, first);
    }
}
