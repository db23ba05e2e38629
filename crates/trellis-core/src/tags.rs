//! Part-of-speech and syntactic-link tag sets
//!
//! Closed enums for the Universal Dependencies v2 tag inventory used by the
//! phrase pipeline, plus the decode helpers that map UD surface strings onto
//! them.

use serde::{Deserialize, Serialize};

/// Language of a word or a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lang {
    #[serde(rename = "ru")]
    Ru,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "undef")]
    Undef,
}

impl Lang {
    /// Decode a language code ("ru", "EN", ...). Unknown codes map to Undef.
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "ru" => Lang::Ru,
            "en" => Lang::En,
            _ => Lang::Undef,
        }
    }
}

/// Universal part-of-speech tags, extended with the participle and short-form
/// distinctions the inflection engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    #[serde(rename = "verb")]
    Verb,
    #[serde(rename = "noun")]
    Noun,
    #[serde(rename = "propn")]
    Propn,
    #[serde(rename = "adj")]
    Adj,
    #[serde(rename = "participle")]
    Participle,
    #[serde(rename = "participle_short")]
    ParticipleShort,
    #[serde(rename = "participle_adverb")]
    ParticipleAdverb,
    #[serde(rename = "gerund")]
    Gerund,
    #[serde(rename = "adj_short")]
    AdjShort,
    #[serde(rename = "adv")]
    Adv,
    #[serde(rename = "adp")]
    Adp,
    #[serde(rename = "det")]
    Det,
    #[serde(rename = "aux")]
    Aux,
    #[serde(rename = "part")]
    Part,
    #[serde(rename = "num")]
    Num,
    #[serde(rename = "sconj")]
    Sconj,
    #[serde(rename = "cconj")]
    Cconj,
    #[serde(rename = "sym")]
    Sym,
    #[serde(rename = "pron")]
    Pron,
    #[serde(rename = "punct")]
    Punct,
    #[serde(rename = "intj")]
    Intj,
    #[serde(rename = "x")]
    X,
    #[serde(rename = "undef")]
    Undef,
}

impl Default for PosTag {
    fn default() -> Self {
        PosTag::Undef
    }
}

impl PosTag {
    /// Decode a bare UPOS column value. The participle/gerund/short-form
    /// refinements depend on morphological features and are applied by the
    /// CoNLL-U reader, not here.
    pub fn from_upos(upos: &str) -> Self {
        match upos {
            "VERB" => PosTag::Verb,
            "NOUN" => PosTag::Noun,
            "PROPN" => PosTag::Propn,
            "ADJ" => PosTag::Adj,
            "ADV" => PosTag::Adv,
            "ADP" => PosTag::Adp,
            "DET" => PosTag::Det,
            "AUX" => PosTag::Aux,
            "PART" => PosTag::Part,
            "NUM" => PosTag::Num,
            "SCONJ" => PosTag::Sconj,
            "CCONJ" => PosTag::Cconj,
            "SYM" => PosTag::Sym,
            "PRON" => PosTag::Pron,
            "PUNCT" | "''" | "." | "``" => PosTag::Punct,
            "INTJ" => PosTag::Intj,
            "X" => PosTag::X,
            _ => PosTag::Undef,
        }
    }

    /// True for the nominal tags the inflectors treat as nouns.
    pub fn is_nominal(self) -> bool {
        matches!(self, PosTag::Noun | PosTag::Propn)
    }
}

/// Universal Dependencies v2 syntactic relations.
///
/// ORPHAN is produced by sentence filtering when a word's head is removed; it
/// is never eligible for phrase building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntLink {
    #[serde(rename = "root")]
    Root,
    #[serde(rename = "nsubj")]
    Nsubj,
    #[serde(rename = "obj")]
    Obj,
    #[serde(rename = "iobj")]
    Iobj,
    #[serde(rename = "obl")]
    Obl,
    #[serde(rename = "advmod")]
    Advmod,
    #[serde(rename = "amod")]
    Amod,
    #[serde(rename = "nmod")]
    Nmod,
    #[serde(rename = "case")]
    Case,
    #[serde(rename = "acl")]
    Acl,
    #[serde(rename = "cc")]
    Cc,
    #[serde(rename = "appos")]
    Appos,
    #[serde(rename = "compound")]
    Compound,
    #[serde(rename = "conj")]
    Conj,
    #[serde(rename = "dep")]
    Dep,
    #[serde(rename = "mark")]
    Mark,
    #[serde(rename = "nummod")]
    Nummod,
    #[serde(rename = "aux")]
    Aux,
    #[serde(rename = "flat")]
    Flat,
    #[serde(rename = "ccomp")]
    Ccomp,
    #[serde(rename = "clf")]
    Clf,
    #[serde(rename = "cop")]
    Cop,
    #[serde(rename = "csubj")]
    Csubj,
    #[serde(rename = "advcl")]
    Advcl,
    #[serde(rename = "det")]
    Det,
    #[serde(rename = "discourse")]
    Discourse,
    #[serde(rename = "dislocated")]
    Dislocated,
    #[serde(rename = "expl")]
    Expl,
    #[serde(rename = "fixed")]
    Fixed,
    #[serde(rename = "goeswith")]
    Goeswith,
    #[serde(rename = "list")]
    List,
    #[serde(rename = "orphan")]
    Orphan,
    #[serde(rename = "parataxis")]
    Parataxis,
    #[serde(rename = "punct")]
    Punct,
    #[serde(rename = "reparandum")]
    Reparandum,
    #[serde(rename = "vocative")]
    Vocative,
    #[serde(rename = "xcomp")]
    Xcomp,
}

impl SyntLink {
    /// Decode a DEPREL column value, ignoring subtype suffixes
    /// (`flat:name`, `acl:relcl`, ...).
    pub fn from_deprel(deprel: &str) -> Option<Self> {
        let base = deprel.split(':').next().unwrap_or(deprel);
        let link = match base.to_ascii_lowercase().as_str() {
            "root" => SyntLink::Root,
            "nsubj" => SyntLink::Nsubj,
            "obj" => SyntLink::Obj,
            "iobj" => SyntLink::Iobj,
            "obl" => SyntLink::Obl,
            "advmod" => SyntLink::Advmod,
            "amod" => SyntLink::Amod,
            "nmod" => SyntLink::Nmod,
            "case" => SyntLink::Case,
            "acl" => SyntLink::Acl,
            "cc" => SyntLink::Cc,
            "appos" => SyntLink::Appos,
            "compound" => SyntLink::Compound,
            "conj" => SyntLink::Conj,
            "dep" => SyntLink::Dep,
            "mark" => SyntLink::Mark,
            "nummod" => SyntLink::Nummod,
            "aux" => SyntLink::Aux,
            "flat" => SyntLink::Flat,
            "ccomp" => SyntLink::Ccomp,
            "clf" => SyntLink::Clf,
            "cop" => SyntLink::Cop,
            "csubj" => SyntLink::Csubj,
            "advcl" => SyntLink::Advcl,
            "det" => SyntLink::Det,
            "discourse" => SyntLink::Discourse,
            "dislocated" => SyntLink::Dislocated,
            "expl" => SyntLink::Expl,
            "fixed" => SyntLink::Fixed,
            "goeswith" => SyntLink::Goeswith,
            "list" => SyntLink::List,
            "orphan" => SyntLink::Orphan,
            "parataxis" => SyntLink::Parataxis,
            "punct" => SyntLink::Punct,
            "reparandum" => SyntLink::Reparandum,
            "vocative" => SyntLink::Vocative,
            "xcomp" => SyntLink::Xcomp,
            _ => return None,
        };
        Some(link)
    }

    /// Relations binding a multi-word expression together.
    pub fn is_mwe(self) -> bool {
        matches!(self, SyntLink::Compound | SyntLink::Fixed | SyntLink::Flat)
    }
}
