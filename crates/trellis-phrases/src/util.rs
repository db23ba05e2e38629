//! Post-extraction helpers

use std::collections::HashMap;

use trellis_core::phrase::Phrase;

/// A sentence token stream where phrase members collapsed into their phrase.
#[derive(Debug, Clone)]
pub enum SentenceUnit {
    /// An untouched word, by sentence position.
    Word(usize),
    /// A phrase covering several positions.
    Phrase(Phrase),
}

/// Drop phrases whose id occurs fewer than `min_cnt` times across the
/// document's sentences.
pub fn remove_rare_phrases(sent_phrases: Vec<Vec<Phrase>>, min_cnt: usize) -> Vec<Vec<Phrase>> {
    if min_cnt <= 1 {
        return sent_phrases;
    }
    let mut counter: HashMap<u64, usize> = HashMap::new();
    for phrases in &sent_phrases {
        for p in phrases {
            *counter.entry(p.get_id()).or_insert(0) += 1;
        }
    }
    sent_phrases
        .into_iter()
        .map(|phrases| {
            phrases
                .into_iter()
                .filter(|p| counter.get(&p.get_id()).copied().unwrap_or(0) >= min_cnt)
                .collect()
        })
        .collect()
}

/// Rewrite a sentence of `sent_len` words into a unit stream where the given
/// phrases (largest first) replace the words they cover. With
/// `allow_overlapping` a phrase may claim positions no other phrase holds
/// yet; otherwise any clash drops the smaller phrase.
pub fn replace_words_with_phrases(
    sent_len: usize,
    phrases: &[Phrase],
    allow_overlapping: bool,
) -> Vec<SentenceUnit> {
    #[derive(Clone)]
    enum Slot {
        Free,
        Start(usize),
        Consumed,
    }

    let mut order: Vec<&Phrase> = phrases.iter().collect();
    order.sort_by(|a, b| b.size().cmp(&a.size()));

    let mut slots = vec![Slot::Free; sent_len];
    let mut placed: Vec<&Phrase> = Vec::new();
    for phrase in order {
        if phrase.sent_pos_list().iter().any(|&p| p >= sent_len) {
            continue;
        }
        let clash = phrase
            .sent_pos_list()
            .iter()
            .any(|&p| !matches!(slots[p], Slot::Free));
        let fully_taken = phrase
            .sent_pos_list()
            .iter()
            .all(|&p| !matches!(slots[p], Slot::Free));
        if (allow_overlapping && fully_taken) || (!allow_overlapping && clash) {
            continue;
        }
        let mut claimed_first = false;
        for &p in phrase.sent_pos_list() {
            if matches!(slots[p], Slot::Free) {
                slots[p] = if claimed_first {
                    Slot::Consumed
                } else {
                    claimed_first = true;
                    Slot::Start(placed.len())
                };
            }
        }
        placed.push(phrase);
    }

    let mut units = Vec::with_capacity(sent_len);
    for (pos, slot) in slots.iter().enumerate() {
        match slot {
            Slot::Free => units.push(SentenceUnit::Word(pos)),
            Slot::Start(idx) => units.push(SentenceUnit::Phrase(placed[*idx].clone())),
            Slot::Consumed => {}
        }
    }
    units
}
