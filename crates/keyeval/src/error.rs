//! Error types for the evaluator.

use keyeval_core::{CoreError, RecordError};
use keyeval_engine::EngineError;
use thiserror::Error;

/// Errors that can occur during evaluator operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Record or candidate error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Backend construction error.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Configuration rejected by [`EvaluatorConfig::validate`].
    ///
    /// [`EvaluatorConfig::validate`]: crate::EvaluatorConfig::validate
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<RecordError> for EvalError {
    fn from(err: RecordError) -> Self {
        EvalError::Core(CoreError::MalformedRecord(err))
    }
}

/// Result type for evaluator operations.
pub type Result<T> = std::result::Result<T, EvalError>;
