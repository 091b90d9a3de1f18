// Typed failures for the analysis core.
//
// Each variant names the precondition that was violated so the caller can
// decide whether to drop offending rows and rerun, or abort. Nothing in the
// core retries: every stage is deterministic, so the same input always fails
// the same way.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// The importance fit cannot be performed reliably on this input.
    #[error("degenerate input for term ranking: {reason}")]
    DegenerateInput { reason: String },

    /// A similarity query referenced a token the embedding space never saw.
    #[error("token '{0}' is not in the embedding vocabulary")]
    UnknownToken(String),

    /// There were no tokens to train an embedding space on.
    #[error("embedding corpus contains no tokens")]
    EmptyCorpus,

    /// A training knob was out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Not enough usable rows for an aggregate (e.g. no publish timestamps).
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

impl AnalysisError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
