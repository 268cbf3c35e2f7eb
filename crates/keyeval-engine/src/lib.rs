//! # keyeval engine
//!
//! Digest computation for keyeval target records.
//!
//! - [`hmac`]: HMAC over any supported hash, with a reusable key schedule
//! - [`chain`]: the iterated salted chain `H(p || salt)`, then `H(p || prev)`
//! - [`backend`]: batch evaluation of one salt against many keys
//! - [`lanes`]: the lock-step multi-lane HMAC-SHA1 backend
//!
//! [`compute`] is the single entry point used for one candidate against one
//! record; the batch backends exist for throughput and agree with it exactly.

pub mod backend;
pub mod chain;
pub mod error;
pub mod hmac;
pub mod lanes;
pub mod primitive;

pub use backend::{select, BackendKind, LaneBackend, ScalarBatch, SUPPORTED_WIDTHS};
pub use error::{EngineError, Result};
pub use hmac::HmacKey;
pub use lanes::LaneHmacSha1;
pub use primitive::HashPrimitive;

use keyeval_core::{Algorithm, Candidate, Digest, TargetRecord};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

/// Native digest of `plaintext` under `algorithm`.
///
/// For HMAC the plaintext is the key and the salt is the message, and
/// `iterations` is ignored.
///
/// # Panics
///
/// Panics if an iterated algorithm is asked for zero rounds.
pub fn compute(algorithm: Algorithm, plaintext: &[u8], salt: &[u8], iterations: u32) -> Digest {
    match algorithm {
        Algorithm::HmacSha1 => hmac::hmac::<Sha1>(plaintext, salt),
        Algorithm::IterSha1 => chain::chain::<Sha1>(plaintext, salt, iterations),
        Algorithm::IterSha256 => chain::chain::<Sha256>(plaintext, salt, iterations),
        Algorithm::IterSha384 => chain::chain::<Sha384>(plaintext, salt, iterations),
        Algorithm::IterSha512 => chain::chain::<Sha512>(plaintext, salt, iterations),
    }
}

/// Native digest of `candidate` against `record`'s parameters.
pub fn compute_for(candidate: &Candidate, record: &TargetRecord) -> Digest {
    compute(
        record.algorithm(),
        candidate.as_bytes(),
        record.salt().as_bytes(),
        record.iterations(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hmac_ignores_iterations() {
        assert_eq!(
            compute(Algorithm::HmacSha1, b"k", b"s", 1),
            compute(Algorithm::HmacSha1, b"k", b"s", 99)
        );
    }

    #[test]
    fn test_compute_sizes() {
        for algorithm in Algorithm::ITERATED {
            let digest = compute(algorithm, b"password", b"salt", 2);
            assert_eq!(digest.len(), algorithm.native_digest_size());
        }
    }

    #[test]
    fn test_compute_for_fixture() {
        let record = keyeval_core::parse("#fbdb1d1b18aa6c08324b7d64b71fb76370690e1d").unwrap();
        let candidate = Candidate::try_from("").unwrap();
        assert_eq!(
            compute_for(&candidate, &record).as_bytes(),
            record.expected_digest()
        );
    }
}
