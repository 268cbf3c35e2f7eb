//! Error types for the digest engine.

use thiserror::Error;

/// Errors raised while building a batch backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The requested lane count has no backend.
    #[error("unsupported lane width {0} (supported: 1, 2, 4, 8, 16)")]
    UnsupportedLaneWidth(usize),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
