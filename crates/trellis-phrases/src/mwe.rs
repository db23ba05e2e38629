//! Multi-word-expression pre-pass
//!
//! A greedy run of the general builder restricted to tight-bond relations
//! (COMPOUND/FIXED/FLAT). Only the largest filled level per head is taken,
//! sub-expressions fully contained in a larger one are dropped, and the
//! survivors are marked [`PhraseType::Mwe`] and handed to the main builder
//! as atomic seeds.

use tracing::debug;

use trellis_core::phrase::{Phrase, PhraseType};
use trellis_core::Sentence;

use crate::builder::{BuilderConfig, PhraseBuilder};
use crate::error::PhraseResult;
use crate::profile::Profile;

/// Variant cap of the greedy pass.
pub const MWE_MAX_VARIANTS: usize = 3;

/// Extract the top-level tight compounds of a sentence.
pub fn extract_mwes(
    sent: &mut Sentence,
    profile: &Profile,
    max_n: usize,
    time_budget: Option<std::time::Duration>,
) -> PhraseResult<Vec<Phrase>> {
    let builder = PhraseBuilder::with_config(
        profile.clone(),
        BuilderConfig {
            max_n,
            max_variants_bound: MWE_MAX_VARIANTS,
            time_budget,
            return_top_level: true,
        },
    )?;
    let top_level = builder.build(sent)?;

    let mut mwes = keep_non_overlapping_phrases(top_level);
    mwes.retain(|p| p.size() >= 2);
    for mwe in &mut mwes {
        mwe.set_phrase_type(PhraseType::Mwe);
    }
    debug!(count = mwes.len(), "extracted multi-word expressions");
    Ok(mwes)
}

/// Keep, in size-descending order, the phrases not fully contained in an
/// already-kept phrase.
pub fn keep_non_overlapping_phrases(mut phrases: Vec<Phrase>) -> Vec<Phrase> {
    phrases.sort_by(|a, b| b.size().cmp(&a.size()));
    let mut kept: Vec<Phrase> = Vec::new();
    for phrase in phrases {
        if kept.iter().any(|k| k.contains(&phrase)) {
            continue;
        }
        kept.push(phrase);
    }
    kept
}

/// Attach each MWE to its head word, replacing earlier attachments.
pub fn attach_mwes(sent: &mut Sentence, mwes: &[Phrase]) {
    for word in sent.words_mut() {
        word.mwes.clear();
    }
    for mwe in mwes {
        let head = mwe.sent_hp();
        sent.words_mut()[head].mwes.push(mwe.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::tags::{PosTag, SyntLink};
    use trellis_core::Word;

    fn mkw(lemma: &str, offs: i32, pos: PosTag, link: SyntLink) -> Word {
        Word::tagged(lemma, pos, offs, link)
    }

    fn reprs(phrases: &[Phrase]) -> Vec<String> {
        let mut r: Vec<String> = phrases.iter().map(|p| p.get_str_repr()).collect();
        r.sort();
        r
    }

    #[test]
    fn test_flat_name_extraction() {
        let mut sent = Sentence::new(vec![
            mkw("r", 0, PosTag::Noun, SyntLink::Root),
            mkw("ivanov", -1, PosTag::Propn, SyntLink::Nmod),
            mkw("i.", -1, PosTag::Propn, SyntLink::Flat),
            mkw("v.", -2, PosTag::Propn, SyntLink::Flat),
        ]);
        let mwes = extract_mwes(&mut sent, &Profile::mwe(), 4, None).unwrap();

        assert_eq!(reprs(&mwes), ["ivanov i. v."]);
        assert_eq!(mwes[0].phrase_type(), PhraseType::Mwe);
        assert_eq!(mwes[0].sent_hp(), 1);
    }

    #[test]
    fn test_sub_compound_dropped() {
        // "long standing" (adj-headed) and "spam filter" both survive, but
        // "spam"-only sub-pieces do not
        let mut sent = Sentence::new(vec![
            mkw("long", 1, PosTag::Adj, SyntLink::Compound),
            mkw("standing", 2, PosTag::Adj, SyntLink::Amod),
            mkw("spam", 1, PosTag::Noun, SyntLink::Compound),
            mkw("filter", 0, PosTag::Noun, SyntLink::Root),
        ]);
        let mwes = extract_mwes(&mut sent, &Profile::mwe(), 4, None).unwrap();
        assert_eq!(reprs(&mwes), ["long standing", "spam filter"]);
    }

    #[test]
    fn test_conj_inside_mwe() {
        let mut sent = Sentence::new(vec![
            mkw("red", 3, PosTag::Propn, SyntLink::Compound),
            mkw("and", 1, PosTag::Cconj, SyntLink::Cc),
            mkw("blue", -2, PosTag::Propn, SyntLink::Conj),
            mkw("square", 0, PosTag::Noun, SyntLink::Root),
        ]);
        let mwes = extract_mwes(&mut sent, &Profile::mwe(), 4, None).unwrap();
        assert_eq!(reprs(&mwes), ["blue square", "red square"]);
    }

    #[test]
    fn test_keep_non_overlapping_orders_by_size() {
        let sent = Sentence::new(vec![
            mkw("a", 1, PosTag::Noun, SyntLink::Compound),
            mkw("b", 1, PosTag::Noun, SyntLink::Compound),
            mkw("c", 0, PosTag::Noun, SyntLink::Root),
        ]);
        let small = {
            let mut p = Phrase::from_word(1, &sent[1]).unwrap();
            p.set_sent_pos_list(vec![1, 2]);
            *p.words_mut() = vec!["b".into(), "c".into()];
            p
        };
        let big = {
            let mut p = Phrase::from_word(0, &sent[0]).unwrap();
            p.set_sent_pos_list(vec![0, 1, 2]);
            *p.words_mut() = vec!["a".into(), "b".into(), "c".into()];
            p
        };
        let kept = keep_non_overlapping_phrases(vec![small, big]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].size(), 3);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;
        use trellis_core::phrase::{HeadModifier, PhraseId, PhraseType};

        fn stub_phrase(positions: &BTreeSet<usize>) -> Phrase {
            let positions: Vec<usize> = positions.iter().copied().collect();
            let head = positions.len() - 1;
            let mut deps = vec![0i32; positions.len()];
            for (i, d) in deps.iter_mut().enumerate().take(head) {
                *d = (head - i) as i32;
            }
            let anchor = Word::tagged("stub", PosTag::Noun, 0, SyntLink::Root);
            Phrase::from_parts(
                head,
                positions.clone(),
                positions.iter().map(|p| format!("w{p}")).collect(),
                deps,
                PhraseId::from_word(positions[0], &anchor).unwrap(),
                HeadModifier::default(),
                vec![None; positions.len()],
                PhraseType::Default,
            )
        }

        proptest! {
            #[test]
            fn kept_phrases_never_contain_each_other(
                sets in proptest::collection::vec(
                    proptest::collection::btree_set(0usize..12, 1..5),
                    1..8,
                )
            ) {
                let phrases: Vec<Phrase> = sets.iter().map(stub_phrase).collect();
                let kept = keep_non_overlapping_phrases(phrases.clone());

                for (i, a) in kept.iter().enumerate() {
                    for (j, b) in kept.iter().enumerate() {
                        if i != j {
                            prop_assert!(!a.contains(b), "kept phrase contains another kept phrase");
                        }
                    }
                }
                // every input is kept or covered by something kept
                for p in &phrases {
                    prop_assert!(kept.iter().any(|k| k.contains(p)));
                }
            }
        }
    }

    #[test]
    fn test_attach_mwes() {
        let mut sent = Sentence::new(vec![
            mkw("spam", 1, PosTag::Noun, SyntLink::Compound),
            mkw("filter", 0, PosTag::Noun, SyntLink::Root),
        ]);
        let mwes = extract_mwes(&mut sent, &Profile::mwe(), 4, None).unwrap();
        attach_mwes(&mut sent, &mwes);

        assert!(!sent[0].has_mwes());
        assert!(sent[1].has_mwes());
        assert_eq!(sent[1].mwes[0].get_str_repr(), "spam filter");
    }
}
