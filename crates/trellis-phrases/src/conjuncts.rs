//! Conjunct resolution
//!
//! A word linked by CONJ inherits its syntactic role from the first non-CONJ
//! ancestor of its CONJ chain (the "real head"). All members of one chain
//! share a conjunct set; the builder uses it to keep coordinated words out of
//! each other's phrases. Childless conjuncts additionally inherit the real
//! head's whitelisted preposition and (in the builder) its modifiers.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::warn;

use trellis_core::tags::SyntLink;
use trellis_core::Sentence;

/// Conjunct-chain facts about one word.
#[derive(Debug, Clone)]
pub struct ConjInfo {
    /// First non-CONJ ancestor of the chain (the word itself for the head).
    pub real_head: usize,
    /// All chain members, shared by every member.
    pub members: Rc<HashSet<usize>>,
}

/// Per-word conjunct information for a sentence.
#[derive(Debug, Default)]
pub struct AuxInfo {
    infos: Vec<Option<ConjInfo>>,
}

impl AuxInfo {
    pub fn info(&self, pos: usize) -> Option<&ConjInfo> {
        self.infos.get(pos).and_then(|i| i.as_ref())
    }

    /// Real head of the CONJ chain through `pos`, when one was resolved.
    pub fn real_head(&self, pos: usize) -> Option<usize> {
        self.info(pos).map(|i| i.real_head)
    }
}

/// Walk every CONJ chain of the sentence. The walk is capped at the sentence
/// length; a longer walk means a cycle in the input and the chain is dropped.
pub fn analyze(sent: &Sentence) -> AuxInfo {
    let n = sent.len();
    let mut groups: HashMap<usize, HashSet<usize>> = HashMap::new();

    for pos in 0..n {
        if sent[pos].synt_link != Some(SyntLink::Conj) {
            continue;
        }

        let mut visited = vec![pos];
        let mut cur = pos;
        let mut resolved = None;
        for _ in 0..n {
            match sent.head_of(cur) {
                Some(head) if sent[head].synt_link == Some(SyntLink::Conj) => {
                    visited.push(head);
                    cur = head;
                }
                Some(head) => {
                    resolved = Some(head);
                    break;
                }
                None => break,
            }
        }

        let Some(real_head) = resolved else {
            warn!(pos, "CONJ chain has no real head (cycle or dangling link); ignoring");
            continue;
        };
        let group = groups.entry(real_head).or_default();
        group.insert(real_head);
        group.extend(visited);
    }

    let mut infos = vec![None; n];
    for (real_head, members) in groups {
        let members = Rc::new(members);
        for &pos in members.iter() {
            infos[pos] = Some(ConjInfo {
                real_head,
                members: Rc::clone(&members),
            });
        }
    }
    AuxInfo { infos }
}

/// Give conjuncts without their own whitelisted preposition the one of the
/// chain's real head. Runs before phrases are snapshotted from words.
pub fn inherit_preps(sent: &mut Sentence, aux: &AuxInfo) {
    let n = sent.len();
    for pos in 0..n {
        let Some(info) = aux.info(pos) else { continue };
        if info.real_head == pos {
            continue;
        }
        if sent[pos].extra.prep_white_list.is_some() {
            continue;
        }
        let inherited = sent[info.real_head].extra.prep_white_list.clone();
        if inherited.is_some() {
            sent.words_mut()[pos].extra.prep_white_list = inherited;
        }
    }
}
