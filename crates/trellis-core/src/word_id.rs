//! Word fingerprints
//!
//! A word id is a 64-bit hash over (lemma, language). Ids of several words are
//! folded into a phrase id with [`combine`]; callers that need
//! order-insensitivity arrange the parts canonically before folding (see
//! `PhraseId`).

use std::hash::{BuildHasher, Hash, Hasher};

use ahash::RandomState;

use crate::tags::Lang;

// Fixed keys keep ids stable across runs of the same build.
const SEEDS: [u64; 4] = [
    0x74726c_6c697331,
    0x9e3779b97f4a7c15,
    0x517cc1b727220a95,
    0x2545f4914f6cdd1d,
];

fn hasher() -> impl Hasher {
    RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]).build_hasher()
}

/// Compute the id of a lemma in a given language.
///
/// Returns None for an empty lemma; such words cannot participate in phrases.
pub fn calc(lemma: &str, lang: Option<Lang>) -> Option<u64> {
    if lemma.is_empty() {
        return None;
    }
    let mut h = hasher();
    lemma.hash(&mut h);
    lang.map(|l| l as u8).unwrap_or(u8::MAX).hash(&mut h);
    Some(h.finish())
}

/// Fold two 64-bit ids into one. Deterministic but order-sensitive; the
/// caller is responsible for canonical ordering of the parts.
pub fn combine(a: u64, b: u64) -> u64 {
    a ^ b
        .wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(a.wrapping_shl(6))
        .wrapping_add(a.wrapping_shr(2))
}

/// Fold a non-empty slice of ids left to right.
pub fn combine_all(parts: &[u64]) -> u64 {
    debug_assert!(!parts.is_empty());
    parts.iter().copied().reduce(combine).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_is_stable_and_lang_sensitive() {
        let a = calc("filter", Some(Lang::En)).unwrap();
        let b = calc("filter", Some(Lang::En)).unwrap();
        assert_eq!(a, b);

        let c = calc("filter", Some(Lang::Ru)).unwrap();
        assert_ne!(a, c);
        let d = calc("filter", None).unwrap();
        assert_ne!(a, d);
    }

    #[test]
    fn test_calc_rejects_empty_lemma() {
        assert_eq!(calc("", None), None);
    }

    #[test]
    fn test_combine_is_order_sensitive() {
        let a = calc("spam", None).unwrap();
        let b = calc("filter", None).unwrap();
        assert_ne!(combine(a, b), combine(b, a));
        assert_eq!(combine_all(&[a, b]), combine(a, b));
    }
}
