//! Error types for the keyeval core.

use thiserror::Error;

/// A textual record that cannot be turned into a [`TargetRecord`].
///
/// Every variant is recoverable: it rejects one record, never the batch.
///
/// [`TargetRecord`]: crate::record::TargetRecord
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing '#' delimiter before digest")]
    MissingDelimiter,

    #[error("digest must be {expected} characters, got {actual}")]
    DigestLength { expected: usize, actual: usize },

    #[error("digest contains non-hex characters")]
    InvalidHex,

    #[error("salt length {len} outside [{min}, {max}]")]
    SaltLength { len: usize, min: usize, max: usize },

    #[error("record does not start with '{{x-is'")]
    MissingPrefix,

    #[error("unsupported algorithm tag: {0}")]
    UnsupportedAlgorithmTag(String),

    #[error("invalid iteration count: {0}")]
    InvalidIterations(String),

    #[error("iteration count must be at least 1")]
    ZeroIterations,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),

    #[error("encoded payload of {0} characters exceeds the maximum")]
    PayloadTooLong(usize),
}

/// Core errors surfaced to callers of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] RecordError),

    #[error("candidate of {len} bytes exceeds maximum of {max}")]
    CandidateTooLong { len: usize, max: usize },
}

impl CoreError {
    /// Whether this error rejects a record (as opposed to a candidate).
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, CoreError::MalformedRecord(_))
    }
}
