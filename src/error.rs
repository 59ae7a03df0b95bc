use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid exit strategy: {reason}")]
    InvalidStrategy { reason: String },

    #[error("invalid step size {0}: must be between 1 and 100 and divide 100")]
    InvalidStep(u32),

    #[error("no signals to evaluate")]
    NoSignals,

    #[error("optimization aborted after {evaluated} of {total} candidates")]
    Aborted { evaluated: usize, total: usize },

    #[error("signal source I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("signal source parse error: {0}")]
    Json(#[from] serde_json::Error),
}
