use thiserror::Error;

/// Pipeline-fatal failures. Soft degradations (extractor/auditor trouble)
/// never appear here — those components return their default shapes
/// instead of erroring.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("content unavailable: {0}")]
    ContentUnavailable(String),

    #[error("evaluation generation failed: {0}")]
    Generation(String),

    #[error("invalid evaluation response: {0}")]
    InvalidResponse(String),

    #[error("configuration error: {0}")]
    Config(String),
}
