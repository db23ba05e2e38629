//! Morphological feature enums
//!
//! Each feature is stored as `Option<..>` on a word. An absent feature must
//! never be coerced to a default during eligibility decisions; the inflectors
//! apply their own fallbacks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    Sing,
    Plur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Masc,
    Fem,
    Neut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Case {
    Nom,
    Gen,
    Acc,
    Dat,
    Ins,
    Loc,
    Par,
    Voc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tense {
    Pres,
    Past,
    Fut,
    Imp,
    Pqp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Person {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Degree {
    Pos,
    Equ,
    Cmp,
    Sup,
    Abs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    Imp,
    Perf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    Act,
    Pass,
    Mid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Ind,
    Imp,
    Cnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumType {
    Card,
    Ord,
    Mult,
    Frac,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Animacy {
    Anim,
    Inan,
}

macro_rules! feature_from_ud {
    ($ty:ident, $($s:literal => $v:ident),+ $(,)?) => {
        impl $ty {
            /// Decode a UD FEATS value for this feature.
            pub fn from_ud(value: &str) -> Option<Self> {
                match value {
                    $($s => Some($ty::$v),)+
                    _ => None,
                }
            }
        }
    };
}

feature_from_ud!(Number, "Sing" => Sing, "Plur" => Plur);
feature_from_ud!(Gender, "Masc" => Masc, "Fem" => Fem, "Neut" => Neut);
feature_from_ud!(
    Case,
    "Nom" => Nom, "Gen" => Gen, "Acc" => Acc, "Dat" => Dat,
    "Ins" => Ins, "Loc" => Loc, "Par" => Par, "Voc" => Voc,
);
feature_from_ud!(
    Tense,
    "Pres" => Pres, "Past" => Past, "Fut" => Fut, "Imp" => Imp, "Pqp" => Pqp,
);
feature_from_ud!(Person, "1" => First, "2" => Second, "3" => Third);
feature_from_ud!(
    Degree,
    "Pos" => Pos, "Equ" => Equ, "Cmp" => Cmp, "Sup" => Sup, "Abs" => Abs,
);
feature_from_ud!(Aspect, "Imp" => Imp, "Perf" => Perf);
feature_from_ud!(Voice, "Act" => Act, "Pass" => Pass, "Mid" => Mid);
feature_from_ud!(Mood, "Ind" => Ind, "Imp" => Imp, "Cnd" => Cnd);
feature_from_ud!(
    NumType,
    "Card" => Card, "Ord" => Ord, "Mult" => Mult, "Frac" => Frac, "Range" => Range,
);
feature_from_ud!(Animacy, "Anim" => Anim, "Inan" => Inan);
