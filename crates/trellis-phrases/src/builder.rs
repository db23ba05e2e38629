//! Phrase enumeration
//!
//! Dynamic-programming enumeration of dependency sub-trees. For every word a
//! level table is kept: slot `k` holds phrases of size `k + 1` headed there.
//! Level `l` combines a head phrase of size `a + 1` with a modifier phrase of
//! size `l - a + 1` into a phrase of size `l + 2`, deduplicated by position
//! set and capped per head per level.
//!
//! Seeds (multi-word expressions, or noun phrases feeding the verb profile)
//! enter the table at the slot of their actual size; a word heading an MWE
//! contributes no singleton of its own.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use trellis_core::phrase::Phrase;
use trellis_core::tags::SyntLink;
use trellis_core::Sentence;

use crate::conjuncts::{self, AuxInfo};
use crate::error::{PhraseError, PhraseResult};
use crate::extras;
use crate::merge::merge_phrases;
use crate::profile::Profile;

/// Hard cap on sentence length.
pub const MAX_SENT_LEN: usize = 4096;

/// Default cap on phrases per head per level.
pub const DEFAULT_MAX_VARIANTS: usize = 100;

/// Knobs of one builder run.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Maximum phrase size in words.
    pub max_n: usize,
    /// Cap on phrases per head per level.
    pub max_variants_bound: usize,
    /// Per-sentence time budget, checked between levels.
    pub time_budget: Option<Duration>,
    /// Report only the largest filled level per head (greedy MWE mode).
    pub return_top_level: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            max_n: 4,
            max_variants_bound: DEFAULT_MAX_VARIANTS,
            time_budget: None,
            return_top_level: false,
        }
    }
}

/// Enumerates phrases of one sentence under a [`Profile`].
#[derive(Debug, Clone)]
pub struct PhraseBuilder {
    profile: Profile,
    config: BuilderConfig,
}

/// Per-word phrase table: slot `k` holds phrases of size `k + 1`.
type WordSlots = Vec<Vec<Phrase>>;

impl PhraseBuilder {
    pub fn new(profile: Profile, max_n: usize) -> PhraseResult<Self> {
        Self::with_config(
            profile,
            BuilderConfig {
                max_n,
                ..Default::default()
            },
        )
    }

    pub fn with_config(profile: Profile, config: BuilderConfig) -> PhraseResult<Self> {
        if config.max_n == 0 {
            return Err(PhraseError::InvalidMaxN { max_n: config.max_n });
        }
        Ok(PhraseBuilder { profile, config })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build all phrases of size 2.. for one sentence.
    pub fn build(&self, sent: &mut Sentence) -> PhraseResult<Vec<Phrase>> {
        self.build_seeded(sent, &[])
    }

    /// Build phrases with pre-built seeds injected at their size slots.
    pub fn build_seeded(&self, sent: &mut Sentence, seeds: &[Phrase]) -> PhraseResult<Vec<Phrase>> {
        let n = sent.len();
        if n > MAX_SENT_LEN {
            return Err(PhraseError::SentenceTooLarge {
                len: n,
                cap: MAX_SENT_LEN,
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }
        let started = Instant::now();

        extras::annotate(sent, &self.profile);
        let aux = conjuncts::analyze(sent);
        conjuncts::inherit_preps(sent, &aux);

        let (mut words_index, good_mods) = self.create_indices(sent, &aux);
        let mut dedup: HashSet<Vec<usize>> = HashSet::new();
        self.place_seeds(&mut words_index, &mut dedup, seeds);

        self.generate(sent, &aux, &mut words_index, &good_mods, &mut dedup, started)?;

        Ok(self.collect(sent, words_index))
    }

    /// Build the per-word slot table and the good-modifier index.
    fn create_indices(&self, sent: &Sentence, aux: &AuxInfo) -> (Vec<Option<WordSlots>>, Vec<Vec<usize>>) {
        let n = sent.len();
        let mut words_index: Vec<Option<WordSlots>> = vec![None; n];
        let mut good_mods: Vec<Vec<usize>> = vec![Vec::new(); n];

        for pos in 0..n {
            let word = &sent[pos];
            if word.lemma.is_empty() {
                warn!(pos, "word without lemma; skipping");
                continue;
            }

            let attach = self.good_modifier_attachment(sent, pos, aux);
            let is_good_head = self.profile.test_head(word);
            if is_good_head || attach.is_some() {
                let mut slots: WordSlots = vec![Vec::new(); self.config.max_n];
                // MWE heads enter through their seeded compound, never alone
                if !word.has_mwes() {
                    match Phrase::from_word(pos, word) {
                        Ok(p) => slots[0].push(p),
                        Err(err) => {
                            warn!(pos, %err, "cannot start phrase at word; skipping");
                            continue;
                        }
                    }
                }
                words_index[pos] = Some(slots);
            }
            if let Some(attach) = attach {
                good_mods[attach].push(pos);
            }
        }

        // childless conjuncts inherit the real head's modifiers that lie
        // outside the [real head, conjunct] stretch
        for pos in 0..n {
            let Some(info) = aux.info(pos) else { continue };
            if info.real_head == pos || !good_mods[pos].is_empty() {
                continue;
            }
            let (lo, hi) = if info.real_head < pos {
                (info.real_head, pos)
            } else {
                (pos, info.real_head)
            };
            let inherited: Vec<usize> = good_mods[info.real_head]
                .iter()
                .copied()
                .filter(|&m| m < lo || m > hi)
                .collect();
            good_mods[pos] = inherited;
        }

        (words_index, good_mods)
    }

    /// Is the word at `pos` a good modifier, and of which head position?
    /// CONJ words borrow relation and attachment from their real head.
    fn good_modifier_attachment(&self, sent: &Sentence, pos: usize, aux: &AuxInfo) -> Option<usize> {
        let word = &sent[pos];
        if word.parent_offs == 0 || word.parent_offs.unsigned_abs() > self.profile.max_syntax_dist {
            return None;
        }
        if !self.profile.good_mod_pos.contains(&word.pos_tag) {
            return None;
        }
        let link = word.synt_link?;

        let (eff_link, attach) = if link == SyntLink::Conj {
            let info = aux.info(pos)?;
            if info.real_head == pos {
                return None;
            }
            let real_head = &sent[info.real_head];
            let real_link = real_head.synt_link?;
            if real_link == SyntLink::Conj {
                return None;
            }
            (real_link, sent.head_of(info.real_head)?)
        } else {
            (link, sent.head_of(pos)?)
        };

        if attach == pos {
            warn!(pos, "modifier attaches to itself; skipping");
            return None;
        }
        if !self.profile.good_synt_rels.contains(&eff_link) {
            return None;
        }
        if self.profile.is_banned_modifier(word) {
            return None;
        }
        if eff_link == SyntLink::Nmod && !self.profile.test_nmod(word) {
            return None;
        }
        if !self.profile.test_head(&sent[attach]) {
            return None;
        }
        Some(attach)
    }

    fn place_seeds(
        &self,
        words_index: &mut [Option<WordSlots>],
        dedup: &mut HashSet<Vec<usize>>,
        seeds: &[Phrase],
    ) {
        for seed in seeds {
            let size = seed.size();
            if size == 0 || size > self.config.max_n {
                debug!(size, max_n = self.config.max_n, "seed does not fit the size bound");
                continue;
            }
            match &mut words_index[seed.sent_hp()] {
                Some(slots) => {
                    dedup.insert(seed.sent_pos_list().to_vec());
                    slots[size - 1].push(seed.clone());
                }
                None => debug!(head = seed.sent_hp(), "seed head not eligible under this profile"),
            }
        }
    }

    /// The DP loop: level `l` emits phrases of size `l + 2`.
    fn generate(
        &self,
        sent: &Sentence,
        aux: &AuxInfo,
        words_index: &mut [Option<WordSlots>],
        good_mods: &[Vec<usize>],
        dedup: &mut HashSet<Vec<usize>>,
        started: Instant,
    ) -> PhraseResult<()> {
        let max_n = self.config.max_n;
        let max_variants = self.config.max_variants_bound;

        for level in 0..max_n.saturating_sub(1) {
            if let Some(budget) = self.config.time_budget {
                if started.elapsed() > budget {
                    return Err(PhraseError::AbortedByBudget { budget });
                }
            }

            for head_pos in 0..sent.len() {
                if words_index[head_pos].is_none() || good_mods[head_pos].is_empty() {
                    continue;
                }
                let occupied = words_index[head_pos].as_ref().expect("checked above")[level + 1].len();
                let mut fresh: Vec<Phrase> = Vec::new();

                'head_levels: for head_level in 0..=level {
                    let mod_level = level - head_level;
                    let head_count =
                        words_index[head_pos].as_ref().expect("checked above")[head_level].len();

                    for head_idx in 0..head_count {
                        for &mod_pos in &good_mods[head_pos] {
                            let head_phrase = &words_index[head_pos].as_ref().expect("checked above")
                                [head_level][head_idx];
                            if head_phrase.sent_pos_list().contains(&mod_pos) {
                                continue;
                            }
                            // coordinated words never co-enter one phrase
                            if let Some(info) = aux.info(mod_pos) {
                                if head_phrase
                                    .sent_pos_list()
                                    .iter()
                                    .any(|p| info.members.contains(p))
                                {
                                    continue;
                                }
                            }
                            let Some(mod_slots) = words_index[mod_pos].as_ref() else {
                                continue;
                            };
                            for mod_idx in 0..mod_slots[mod_level].len() {
                                if occupied + fresh.len() >= max_variants {
                                    break 'head_levels;
                                }
                                let head_phrase = &words_index[head_pos]
                                    .as_ref()
                                    .expect("checked above")[head_level][head_idx];
                                let mod_phrase = &words_index[mod_pos]
                                    .as_ref()
                                    .expect("checked above")[mod_level][mod_idx];
                                if let Some(p) = merge_phrases(head_phrase, mod_phrase, sent, dedup)
                                {
                                    fresh.push(p);
                                }
                            }
                        }
                    }
                }

                if !fresh.is_empty() {
                    words_index[head_pos].as_mut().expect("checked above")[level + 1].extend(fresh);
                }
            }
        }
        Ok(())
    }

    /// Gather results: all levels in normal mode, only the top filled level
    /// per head in greedy mode. Heads are re-tested so a seed whose head is
    /// inadmissible under this profile is discarded.
    fn collect(&self, sent: &Sentence, words_index: Vec<Option<WordSlots>>) -> Vec<Phrase> {
        let mut result = Vec::new();
        for (pos, slots) in words_index.into_iter().enumerate() {
            let Some(mut slots) = slots else { continue };
            if !self.profile.test_head(&sent[pos]) {
                continue;
            }
            if self.config.return_top_level {
                if let Some(top) = (1..slots.len()).rev().find(|&l| !slots[l].is_empty()) {
                    result.append(&mut slots[top]);
                }
            } else {
                for level in 1..slots.len() {
                    result.append(&mut slots[level]);
                }
            }
        }
        result
    }
}
