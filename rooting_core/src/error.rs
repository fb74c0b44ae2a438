use thiserror::Error;

/// Errors surfaced by the rooting engine.
///
/// `UnknownCategory` and `InvalidPrediction` are local to one prediction:
/// the orchestrator logs them and keeps processing the rest of the set.
/// `InvariantViolation` means the standings calculator itself is broken
/// and must fail loudly.
#[derive(Debug, Error)]
pub enum RootingError {
    #[error("unknown category referenced by prediction: {category_id}")]
    UnknownCategory { category_id: String },

    #[error("invalid prediction for {category_id}: {value:?} ({reason})")]
    InvalidPrediction {
        category_id: String,
        value: String,
        reason: String,
    },

    #[error("standings invariant violated: {0}")]
    InvariantViolation(String),
}
