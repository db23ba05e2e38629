//! Pipeline error kinds
//!
//! Only sentence-fatal conditions surface as errors. Per-word anomalies
//! (missing lemmas, overlapping merge candidates, unsupported cases) degrade
//! in place with a log line and a smaller result set.

use std::time::Duration;

use thiserror::Error;

/// Result type for phrase-pipeline operations.
pub type PhraseResult<T> = Result<T, PhraseError>;

/// Fatal errors of the phrase pipeline.
#[derive(Error, Debug)]
pub enum PhraseError {
    #[error("invalid maximum phrase size: {max_n}")]
    InvalidMaxN { max_n: usize },

    #[error("sentence of {len} tokens exceeds the {cap}-token cap")]
    SentenceTooLarge { len: usize, cap: usize },

    #[error("phrase building aborted after exceeding the {budget:?} budget")]
    AbortedByBudget { budget: Duration },

    #[error("no supported language among the phrase words")]
    UnsupportedLanguage,
}
