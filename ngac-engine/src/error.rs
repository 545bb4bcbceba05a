//! Evaluation error types.

use thiserror::Error;

/// Result type alias for evaluation operations
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Fatal evaluation failures.
///
/// Denials are not errors — they come back as regular
/// [`Decision`](crate::Decision)s. An `EvalError` means no decision was
/// reached at all.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The request's subject or resource id is unknown to the store.
    /// Seeds are the entities under evaluation; their absence is a request
    /// error, not a traversal skip.
    #[error("seed entity not found: {id}")]
    SeedNotFound { id: String },

    /// The request was malformed before evaluation could start.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A store failure other than a tolerable missing intermediate.
    /// Never downgraded to a deny.
    #[error("store failure: {0}")]
    Store(#[from] ngac_core::Error),

    /// The caller cancelled the evaluation; no decision was emitted.
    #[error("evaluation cancelled")]
    Cancelled,
}

impl EvalError {
    /// Upgrade a seed fetch failure: `NotFound` becomes
    /// [`SeedNotFound`](EvalError::SeedNotFound), anything else stays a
    /// store failure.
    pub(crate) fn for_seed(id: &str, err: ngac_core::Error) -> Self {
        if err.is_not_found() {
            EvalError::SeedNotFound { id: id.to_string() }
        } else {
            EvalError::Store(err)
        }
    }
}
