use thiserror::Error;

/// Errors from the external narrowing evaluators.
///
/// A failed pass never replaces the committed view; the coordinator logs
/// the failure and keeps what the user is looking at.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("search evaluator failed: {0}")]
    Search(String),

    #[error("level evaluator failed: {0}")]
    Levels(String),

    #[error("stats evaluator failed: {0}")]
    Stats(String),
}
