//! # keyeval core
//!
//! Pure data for the keyeval candidate evaluator: algorithm selectors, digests,
//! target records, candidates, the textual record codec and the comparator.
//!
//! This crate contains no hashing. Digest computation lives in
//! `keyeval-engine`; this crate only describes what to compute and what the
//! result must equal.
//!
//! ## Key Types
//!
//! - [`Algorithm`] - Construction and hash selector of a record
//! - [`TargetRecord`] - Parsed salt, iteration count and expected digest
//! - [`Candidate`] - A password candidate, at most [`PLAINTEXT_LENGTH`] bytes
//! - [`Digest`] - Fixed-capacity digest buffer, big-endian on the wire
//!
//! ## Record formats
//!
//! Two textual formats are understood, see [`codec`]:
//!
//! - `salt#hexdigest` (HMAC-SHA1)
//! - `{x-isTAG, iterations}base64(digest || salt)` (iterated salted chain)

pub mod codec;
pub mod compare;
pub mod error;
pub mod record;
pub mod types;

pub use codec::{canonicalize, parse, render, valid, Ciphertext, Format};
pub use compare::{full_match, quick_reject, Comparator};
pub use error::{CoreError, RecordError};
pub use record::{
    Candidate, Salt, TargetRecord, HMAC_SALT_MAX, ITERATED_SALT_MAX, ITERATED_SALT_MIN,
    PLAINTEXT_LENGTH,
};
pub use types::{Algorithm, Digest, HashKind, ITERATED_COMPARISON_SIZE, MAX_DIGEST_SIZE};
