//! Phrase merging algebra
//!
//! Combines a head-rooted phrase with a modifier-rooted phrase into a fresh
//! phrase: positions are merged disjointly, in-phrase dependency offsets are
//! re-based around the insertion point, lemmas are re-read from the sentence
//! (so the inflector always starts from canonical forms), and the modifier's
//! preposition/suffix decorations become display enhancers. A merge that
//! would interleave or duplicate positions is refused; the candidate is
//! simply dropped.

use std::collections::HashSet;

use tracing::{debug, warn};

use trellis_core::phrase::{HeadModifier, Phrase, PhraseType, ReprEnhType, ReprEnhancer};
use trellis_core::Sentence;

/// Merge `other` (modifier-rooted) into `head`. Returns None when the pair
/// cannot merge or an identical position set was already produced.
pub fn merge_phrases(
    head: &Phrase,
    other: &Phrase,
    sent: &Sentence,
    dedup: &mut HashSet<Vec<usize>>,
) -> Option<Phrase> {
    // a preposition inside the modifier's own span cannot be rendered in
    // front of it
    if let Some(prep) = &other.head_modifier().prep_modifier {
        let first = other.sent_pos_list()[0];
        let last = *other.sent_pos_list().last().expect("non-empty phrase");
        if prep.pos > first && prep.pos < last {
            debug!(prep_pos = prep.pos, "preposition inside modifier span; refusing merge");
            return None;
        }
    }

    let insert_pos = find_insert_pos(head, other)?;

    let head_positions = head.sent_pos_list();
    let mut positions = Vec::with_capacity(head.size() + other.size());
    positions.extend_from_slice(&head_positions[..insert_pos]);
    positions.extend_from_slice(other.sent_pos_list());
    positions.extend_from_slice(&head_positions[insert_pos..]);
    if positions.windows(2).any(|w| w[0] >= w[1]) {
        debug!("overlapping phrases; dropping merge candidate");
        return None;
    }

    if !dedup.insert(positions.clone()) {
        return None;
    }

    let mod_size = other.size();
    let old_head_pos = head.head_pos();
    let new_head_pos = if insert_pos <= old_head_pos {
        old_head_pos + mod_size
    } else {
        old_head_pos
    };

    // splice dependency offsets and re-point entries that used to reach the
    // head across the inserted block
    let head_deps = head.deps();
    let mut deps = Vec::with_capacity(positions.len());
    deps.extend_from_slice(&head_deps[..insert_pos]);
    deps.extend_from_slice(other.deps());
    deps.extend_from_slice(&head_deps[insert_pos..]);

    if insert_pos <= old_head_pos {
        for i in 0..insert_pos {
            if i as i64 + head_deps[i] as i64 == old_head_pos as i64 {
                deps[i] += mod_size as i32;
            }
        }
    } else {
        for i in insert_pos..head.size() {
            if i as i64 + head_deps[i] as i64 == old_head_pos as i64 {
                deps[i + mod_size] -= mod_size as i32;
            }
        }
    }

    // the modifier's root now points at the merged head
    let mod_root = insert_pos + other.head_pos();
    deps[mod_root] = new_head_pos as i32 - mod_root as i32;

    let words: Vec<String> = positions.iter().map(|&p| sent[p].lemma.clone()).collect();

    let other_on_left = other.sent_hp() < head.sent_hp();
    let mut id_holder = head.id_holder().clone();
    if let Err(err) = id_holder.merge_mod(other.id_holder(), other_on_left) {
        warn!(%err, "cannot fold modifier id; dropping merge candidate");
        dedup.remove(positions.as_slice());
        return None;
    }

    // splice display enhancers, then decorate the modifier root with its
    // preposition and suffix
    let mut repr_modifiers: Vec<Option<Vec<ReprEnhancer>>> = Vec::with_capacity(positions.len());
    for i in 0..insert_pos {
        repr_modifiers.push(head.repr_modifiers_at(i).map(|m| m.to_vec()));
    }
    for i in 0..other.size() {
        repr_modifiers.push(other.repr_modifiers_at(i).map(|m| m.to_vec()));
    }
    for i in insert_pos..head.size() {
        repr_modifiers.push(head.repr_modifiers_at(i).map(|m| m.to_vec()));
    }

    if let Some(prep) = &other.head_modifier().prep_modifier {
        repr_modifiers[mod_root]
            .get_or_insert_with(Vec::new)
            .push(ReprEnhancer {
                rel_pos: -(other.head_pos() as i32),
                enh_type: ReprEnhType::AddWord,
                value: prep.surface.clone(),
            });
    }
    if let Some(suffix) = &other.head_modifier().repr_mod_suffix {
        repr_modifiers[mod_root]
            .get_or_insert_with(Vec::new)
            .push(ReprEnhancer {
                rel_pos: 0,
                enh_type: ReprEnhType::AddSuffix,
                value: suffix.clone(),
            });
    }

    let merged = Phrase::from_parts(
        new_head_pos,
        positions.clone(),
        words,
        deps,
        id_holder,
        HeadModifier::clone(head.head_modifier()),
        repr_modifiers,
        PhraseType::Default,
    );

    if !merged.is_well_formed() {
        warn!("merge produced a malformed phrase (non-projective attachment); dropping");
        dedup.remove(positions.as_slice());
        return None;
    }
    Some(merged)
}

/// Slot in the head phrase's position list where the modifier block lands.
/// None when the block would interleave with the head phrase.
fn find_insert_pos(head: &Phrase, other: &Phrase) -> Option<usize> {
    let head_positions = head.sent_pos_list();
    let other_positions = other.sent_pos_list();

    let mut insert_pos;
    if head.sent_hp() < other.sent_hp() {
        // modifier on the right
        insert_pos = head_positions.len();
        while insert_pos > 0 && other.sent_hp() < head_positions[insert_pos - 1] {
            insert_pos -= 1;
        }
    } else {
        // modifier on the left
        insert_pos = 0;
        while insert_pos < head_positions.len() && other.sent_hp() > head_positions[insert_pos] {
            insert_pos += 1;
        }
    }

    if insert_pos > 0 && head_positions[insert_pos - 1] > other_positions[0] {
        debug!("modifier interleaves with the head phrase on the left");
        return None;
    }
    if insert_pos < head_positions.len()
        && head_positions[insert_pos] < *other_positions.last().expect("non-empty phrase")
    {
        debug!("modifier interleaves with the head phrase on the right");
        return None;
    }
    Some(insert_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::tags::{PosTag, SyntLink};
    use trellis_core::word::PrepAnnotation;
    use trellis_core::Word;

    fn sent_with(lemmas: &[&str]) -> Sentence {
        Sentence::new(
            lemmas
                .iter()
                .map(|l| Word::tagged(*l, PosTag::Noun, 0, SyntLink::Root))
                .collect(),
        )
    }

    fn singleton(sent: &Sentence, pos: usize) -> Phrase {
        Phrase::from_word(pos, &sent[pos]).unwrap()
    }

    #[test]
    fn test_two_word_merge_left_mod() {
        let sent = sent_with(&["m1", "r"]);
        let mut dedup = HashSet::new();
        let merged =
            merge_phrases(&singleton(&sent, 1), &singleton(&sent, 0), &sent, &mut dedup).unwrap();

        assert_eq!(merged.sent_pos_list(), &[0, 1]);
        assert_eq!(merged.head_pos(), 1);
        assert_eq!(merged.deps(), &[1, 0]);
        assert_eq!(merged.words(), ["m1", "r"]);
        assert!(merged.is_well_formed());
    }

    #[test]
    fn test_two_word_merge_right_mod() {
        let sent = sent_with(&["r", "h1"]);
        let mut dedup = HashSet::new();
        let merged =
            merge_phrases(&singleton(&sent, 0), &singleton(&sent, 1), &sent, &mut dedup).unwrap();

        assert_eq!(merged.sent_pos_list(), &[0, 1]);
        assert_eq!(merged.head_pos(), 0);
        assert_eq!(merged.deps(), &[0, -1]);
    }

    #[test]
    fn test_nested_merge_adjusts_offsets() {
        // words: m1 r m2 h1; phrase [m1 r] absorbs [m2 h1] rooted at h1
        let sent = sent_with(&["m1", "r", "m2", "h1"]);
        let mut dedup = HashSet::new();

        let m1_r =
            merge_phrases(&singleton(&sent, 1), &singleton(&sent, 0), &sent, &mut dedup).unwrap();
        let m2_h1 =
            merge_phrases(&singleton(&sent, 3), &singleton(&sent, 2), &sent, &mut dedup).unwrap();
        let full = merge_phrases(&m1_r, &m2_h1, &sent, &mut dedup).unwrap();

        assert_eq!(full.sent_pos_list(), &[0, 1, 2, 3]);
        assert_eq!(full.words(), ["m1", "r", "m2", "h1"]);
        assert_eq!(full.head_pos(), 1);
        assert_eq!(full.deps(), &[1, 0, 1, -2]);
        assert!(full.is_well_formed());
    }

    #[test]
    fn test_right_chain_merge() {
        // words: r m1 h1 h2; r heads h1-chain and h2
        let sent = sent_with(&["r", "m1", "h1", "h2"]);
        let mut dedup = HashSet::new();

        let m1_h1 =
            merge_phrases(&singleton(&sent, 2), &singleton(&sent, 1), &sent, &mut dedup).unwrap();
        let r_h2 =
            merge_phrases(&singleton(&sent, 0), &singleton(&sent, 3), &sent, &mut dedup).unwrap();
        let full = merge_phrases(&r_h2, &m1_h1, &sent, &mut dedup).unwrap();

        assert_eq!(full.sent_pos_list(), &[0, 1, 2, 3]);
        assert_eq!(full.head_pos(), 0);
        assert_eq!(full.deps(), &[0, 1, -2, -3]);
    }

    #[test]
    fn test_overlap_refused() {
        let sent = sent_with(&["a", "b", "c"]);
        let mut dedup = HashSet::new();
        let a_b = merge_phrases(&singleton(&sent, 0), &singleton(&sent, 1), &sent, &mut dedup).unwrap();
        let b_c = merge_phrases(&singleton(&sent, 2), &singleton(&sent, 1), &sent, &mut dedup).unwrap();

        assert!(merge_phrases(&a_b, &b_c, &sent, &mut dedup).is_none());
    }

    #[test]
    fn test_duplicate_position_set_refused() {
        let sent = sent_with(&["m", "r"]);
        let mut dedup = HashSet::new();
        assert!(merge_phrases(&singleton(&sent, 1), &singleton(&sent, 0), &sent, &mut dedup).is_some());
        assert!(merge_phrases(&singleton(&sent, 1), &singleton(&sent, 0), &sent, &mut dedup).is_none());
    }

    #[test]
    fn test_prep_enhancer_lands_before_mod_block() {
        // spam filter + [web server] with whitelisted "of" before the block
        let mut sent = sent_with(&["spam", "filter", "of", "web", "server"]);
        sent.words_mut()[4].extra.prep_white_list = Some(PrepAnnotation {
            pos: 2,
            surface: "of".into(),
            word_id: 11,
        });

        let mut dedup = HashSet::new();
        let spam_filter =
            merge_phrases(&singleton(&sent, 1), &singleton(&sent, 0), &sent, &mut dedup).unwrap();
        let web_server =
            merge_phrases(&singleton(&sent, 4), &singleton(&sent, 3), &sent, &mut dedup).unwrap();
        let full = merge_phrases(&spam_filter, &web_server, &sent, &mut dedup).unwrap();

        assert_eq!(full.get_str_repr(), "spam filter of web server");
    }

    #[test]
    fn test_prep_inside_mod_span_refused() {
        let mut sent = sent_with(&["r", "a", "x", "b"]);
        // modifier phrase [a .. b] carries a prep lying between them
        sent.words_mut()[3].extra.prep_white_list = Some(PrepAnnotation {
            pos: 2,
            surface: "of".into(),
            word_id: 3,
        });
        let mut dedup = HashSet::new();
        let a_b = merge_phrases(&singleton(&sent, 3), &singleton(&sent, 1), &sent, &mut dedup);
        // the merge producing [a b] itself is fine (prep belongs to b's head
        // modifier and b is the root)
        let a_b = a_b.unwrap();
        assert!(merge_phrases(&singleton(&sent, 0), &a_b, &sent, &mut dedup).is_none());
    }

    #[test]
    fn test_suffix_enhancer() {
        let mut sent = sent_with(&["john", "book"]);
        sent.words_mut()[0].extra.repr_mod_suffix = Some("'s".into());

        let mut dedup = HashSet::new();
        let full =
            merge_phrases(&singleton(&sent, 1), &singleton(&sent, 0), &sent, &mut dedup).unwrap();
        assert_eq!(full.get_str_repr(), "john's book");
    }
}
