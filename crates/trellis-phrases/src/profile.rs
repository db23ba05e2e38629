//! Eligibility profiles
//!
//! A [`Profile`] parameterises which words may head a phrase, which may
//! modify one, and over which relations. The stock profiles mirror the three
//! extraction modes: plain noun phrases, the tight-compound (MWE) pre-pass
//! and verb phrases over noun arguments.

use std::collections::HashSet;

use trellis_core::tags::{Lang, PosTag, SyntLink};
use trellis_core::word::Word;

/// Prepositions kept in phrases by default.
pub const DEFAULT_PREP_WHITELIST: &[&str] = &["of"];

/// Default reach of a modifier link, in tokens.
pub const DEFAULT_MAX_SYNTAX_DIST: u32 = 7;

/// Eligibility rules for one extraction mode.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Display name of the profile ("noun_phrases", ...).
    pub name: &'static str,
    pub good_head_pos: HashSet<PosTag>,
    pub good_mod_pos: HashSet<PosTag>,
    pub good_synt_rels: HashSet<SyntLink>,
    /// A word whose link to its own parent is in this set cannot head a phrase.
    pub bad_head_rels: HashSet<SyntLink>,
    pub whitelisted_preps: HashSet<String>,
    /// (lemma, PoS, whitelisted prep surface) triples never used as modifiers.
    pub banned_modifiers: HashSet<(String, PosTag, Option<String>)>,
    /// Maximum |parent_offs| for a modifier.
    pub max_syntax_dist: u32,
}

impl Profile {
    /// Noun phrases: NOUN/PROPN heads with adjectival/nominal modifiers over
    /// AMOD/NMOD. NUM is deliberately not a good modifier here; callers that
    /// want numerals override the profile.
    pub fn noun_phrases() -> Self {
        Profile {
            name: "noun_phrases",
            good_head_pos: [PosTag::Noun, PosTag::Propn].into(),
            good_mod_pos: [
                PosTag::Noun,
                PosTag::Propn,
                PosTag::Adj,
                PosTag::Participle,
                PosTag::ParticipleShort,
                PosTag::Gerund,
                PosTag::AdjShort,
            ]
            .into(),
            good_synt_rels: [SyntLink::Amod, SyntLink::Nmod].into(),
            bad_head_rels: [SyntLink::Compound, SyntLink::Fixed, SyntLink::Flat].into(),
            whitelisted_preps: DEFAULT_PREP_WHITELIST.iter().map(|s| s.to_string()).collect(),
            banned_modifiers: HashSet::new(),
            max_syntax_dist: DEFAULT_MAX_SYNTAX_DIST,
        }
    }

    /// Tight compounds: COMPOUND/FIXED/FLAT only. Flat names can span far, so
    /// the distance bound is lifted.
    pub fn mwe() -> Self {
        Profile {
            name: "mwe",
            good_head_pos: [PosTag::Noun, PosTag::Propn, PosTag::Adj, PosTag::Participle].into(),
            good_mod_pos: [PosTag::Noun, PosTag::Propn, PosTag::Adj, PosTag::Participle].into(),
            good_synt_rels: [SyntLink::Compound, SyntLink::Fixed, SyntLink::Flat].into(),
            bad_head_rels: HashSet::new(),
            whitelisted_preps: DEFAULT_PREP_WHITELIST.iter().map(|s| s.to_string()).collect(),
            banned_modifiers: HashSet::new(),
            max_syntax_dist: u32::MAX,
        }
    }

    /// Verb phrases taking nominal arguments over OBJ/OBL/IOBJ; composed with
    /// already-built noun phrases by the dispatcher.
    pub fn verb_noun() -> Self {
        Profile {
            name: "verb+noun_phrases",
            good_head_pos: [PosTag::Verb].into(),
            good_mod_pos: [PosTag::Noun, PosTag::Propn].into(),
            good_synt_rels: [SyntLink::Obj, SyntLink::Obl, SyntLink::Iobj].into(),
            bad_head_rels: HashSet::new(),
            whitelisted_preps: DEFAULT_PREP_WHITELIST.iter().map(|s| s.to_string()).collect(),
            banned_modifiers: HashSet::new(),
            max_syntax_dist: DEFAULT_MAX_SYNTAX_DIST,
        }
    }

    /// Can this word head a phrase?
    pub fn test_head(&self, word: &Word) -> bool {
        self.good_head_pos.contains(&word.pos_tag)
            && word.lang != Some(Lang::Undef)
            && word
                .synt_link
                .map_or(true, |link| !self.bad_head_rels.contains(&link))
    }

    /// NMOD modifiers are admitted only without a preposition or with a
    /// whitelisted one.
    pub fn test_nmod(&self, word: &Word) -> bool {
        word.pos_tag.is_nominal()
            && (word.extra.prep_mods.is_empty() || word.extra.prep_white_list.is_some())
    }

    pub fn is_banned_modifier(&self, word: &Word) -> bool {
        if self.banned_modifiers.is_empty() {
            return false;
        }
        let prep = word
            .extra
            .prep_white_list
            .as_ref()
            .map(|p| p.surface.clone());
        self.banned_modifiers
            .contains(&(word.lemma.clone(), word.pos_tag, prep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::word::PrepAnnotation;

    #[test]
    fn test_noun_profile_heads() {
        let profile = Profile::noun_phrases();
        let noun = Word::tagged("filter", PosTag::Noun, 0, SyntLink::Root);
        assert!(profile.test_head(&noun));

        let compound = Word::tagged("spam", PosTag::Noun, 1, SyntLink::Compound);
        assert!(!profile.test_head(&compound));

        let verb = Word::tagged("run", PosTag::Verb, 0, SyntLink::Root);
        assert!(!profile.test_head(&verb));

        let undef_lang = Word::tagged("x", PosTag::Noun, 0, SyntLink::Root).with_lang(Lang::Undef);
        assert!(!profile.test_head(&undef_lang));
    }

    #[test]
    fn test_num_is_not_a_default_modifier() {
        let profile = Profile::noun_phrases();
        assert!(!profile.good_mod_pos.contains(&PosTag::Num));
    }

    #[test]
    fn test_nmod_prep_rules() {
        let profile = Profile::noun_phrases();
        let mut word = Word::tagged("server", PosTag::Noun, -3, SyntLink::Nmod);
        assert!(profile.test_nmod(&word));

        // a non-whitelisted preposition blocks the modifier
        word.extra.prep_mods.push(PrepAnnotation {
            pos: 1,
            surface: "against".into(),
            word_id: 1,
        });
        assert!(!profile.test_nmod(&word));

        // a whitelisted one readmits it
        word.extra.prep_white_list = Some(PrepAnnotation {
            pos: 2,
            surface: "of".into(),
            word_id: 2,
        });
        assert!(profile.test_nmod(&word));
    }

    #[test]
    fn test_banned_modifiers() {
        let mut profile = Profile::noun_phrases();
        profile
            .banned_modifiers
            .insert(("own".into(), PosTag::Adj, None));
        let word = Word::tagged("own", PosTag::Adj, 1, SyntLink::Amod);
        assert!(profile.is_banned_modifier(&word));

        let other = Word::tagged("blue", PosTag::Adj, 1, SyntLink::Amod);
        assert!(!profile.is_banned_modifier(&other));
    }
}
