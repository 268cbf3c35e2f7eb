//! Target records and candidates.
//!
//! A [`TargetRecord`] is what the codec produces from a textual record and
//! what the engine consumes. It is immutable once built, and its constructors
//! enforce every bound the codec checks, so any record that exists can be
//! rendered and re-parsed to an equal record.

use std::fmt;

use crate::error::{CoreError, RecordError};
use crate::types::{Algorithm, Digest};

/// Maximum candidate plaintext length in bytes.
pub const PLAINTEXT_LENGTH: usize = 125;

/// Maximum HMAC salt length (inner message must fit two SHA-1 blocks).
pub const HMAC_SALT_MAX: usize = 55;

/// Minimum iterated-chain salt length.
pub const ITERATED_SALT_MIN: usize = 1;

/// Maximum iterated-chain salt length.
pub const ITERATED_SALT_MAX: usize = 16;

/// Salt bytes, copied in at construction.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// Copy salt bytes.
    pub fn new(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// The salt bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the salt is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl AsRef<[u8]> for Salt {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A parsed target: what a candidate must hash to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRecord {
    algorithm: Algorithm,
    salt: Salt,
    iterations: u32,
    digest: Digest,
}

impl TargetRecord {
    /// Build an HMAC-SHA1 record from salt bytes and the 20-byte digest.
    pub fn hmac_sha1(salt: &[u8], digest: &[u8]) -> Result<Self, RecordError> {
        if salt.len() > HMAC_SALT_MAX {
            return Err(RecordError::SaltLength {
                len: salt.len(),
                min: 0,
                max: HMAC_SALT_MAX,
            });
        }
        let digest = Self::check_digest(Algorithm::HmacSha1, digest)?;
        Ok(Self {
            algorithm: Algorithm::HmacSha1,
            salt: Salt::new(salt),
            iterations: 1,
            digest,
        })
    }

    /// Build an iterated-chain record from its native-size digest.
    pub fn iterated(
        algorithm: Algorithm,
        salt: &[u8],
        iterations: u32,
        digest: &[u8],
    ) -> Result<Self, RecordError> {
        if !algorithm.is_iterated() {
            return Err(RecordError::UnsupportedAlgorithmTag(algorithm.to_string()));
        }
        if iterations == 0 {
            return Err(RecordError::ZeroIterations);
        }
        if !(ITERATED_SALT_MIN..=ITERATED_SALT_MAX).contains(&salt.len()) {
            return Err(RecordError::SaltLength {
                len: salt.len(),
                min: ITERATED_SALT_MIN,
                max: ITERATED_SALT_MAX,
            });
        }
        let digest = Self::check_digest(algorithm, digest)?;
        Ok(Self {
            algorithm,
            salt: Salt::new(salt),
            iterations,
            digest,
        })
    }

    fn check_digest(algorithm: Algorithm, digest: &[u8]) -> Result<Digest, RecordError> {
        let expected = algorithm.native_digest_size();
        if digest.len() != expected {
            return Err(RecordError::DigestLength {
                expected,
                actual: digest.len(),
            });
        }
        Digest::from_slice(digest).ok_or(RecordError::DigestLength {
            expected,
            actual: digest.len(),
        })
    }

    /// The algorithm selector.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The salt.
    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Iteration count (always 1 for HMAC).
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// The full digest as carried by the textual record.
    pub fn wire_digest(&self) -> &Digest {
        &self.digest
    }

    /// The comparison prefix of the digest.
    ///
    /// 20 bytes for HMAC-SHA1, 16 bytes for every iterated algorithm.
    pub fn expected_digest(&self) -> &[u8] {
        &self.digest.as_bytes()[..self.algorithm.comparison_size()]
    }

    /// Whether two records can share one computation per candidate.
    pub fn shares_salt_with(&self, other: &TargetRecord) -> bool {
        self.algorithm == other.algorithm
            && self.iterations == other.iterations
            && self.salt == other.salt
    }

    /// Bucket of this record's salt in a table of `table_size` slots.
    ///
    /// `table_size` must be a power of two.
    pub fn salt_bucket(&self, table_size: u32) -> u32 {
        debug_assert!(table_size.is_power_of_two());
        let mut hash: u32 = 5381;
        let mut mix = |byte: u8| {
            hash = (hash << 5).wrapping_add(hash) ^ u32::from(byte);
        };
        for byte in self.algorithm.cost_type().to_le_bytes() {
            mix(byte);
        }
        for byte in self.iterations.to_le_bytes() {
            mix(byte);
        }
        for &byte in self.salt.as_bytes() {
            mix(byte);
        }
        hash & (table_size - 1)
    }
}

/// A password candidate.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Candidate(Vec<u8>);

impl Candidate {
    /// Create a candidate, rejecting plaintexts over [`PLAINTEXT_LENGTH`].
    pub fn new(plaintext: impl Into<Vec<u8>>) -> Result<Self, CoreError> {
        let plaintext = plaintext.into();
        if plaintext.len() > PLAINTEXT_LENGTH {
            return Err(CoreError::CandidateTooLong {
                len: plaintext.len(),
                max: PLAINTEXT_LENGTH,
            });
        }
        Ok(Self(plaintext))
    }

    /// The plaintext bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the candidate is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Candidate({} bytes)", self.0.len())
    }
}

impl AsRef<[u8]> for Candidate {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&str> for Candidate {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for Candidate {
    type Error = CoreError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterated_salt_bounds() {
        let digest = [0u8; 20];
        assert!(TargetRecord::iterated(Algorithm::IterSha1, &[1; 16], 1, &digest).is_ok());
        assert!(matches!(
            TargetRecord::iterated(Algorithm::IterSha1, &[1; 17], 1, &digest),
            Err(RecordError::SaltLength { len: 17, .. })
        ));
        assert!(matches!(
            TargetRecord::iterated(Algorithm::IterSha1, &[], 1, &digest),
            Err(RecordError::SaltLength { len: 0, .. })
        ));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = TargetRecord::iterated(Algorithm::IterSha256, b"salt", 0, &[0u8; 32]);
        assert_eq!(result, Err(RecordError::ZeroIterations));
    }

    #[test]
    fn test_iterated_rejects_hmac_algorithm() {
        let result = TargetRecord::iterated(Algorithm::HmacSha1, b"salt", 1, &[0u8; 20]);
        assert!(matches!(result, Err(RecordError::UnsupportedAlgorithmTag(_))));
    }

    #[test]
    fn test_digest_size_checked() {
        let result = TargetRecord::iterated(Algorithm::IterSha512, b"salt", 10, &[0u8; 32]);
        assert_eq!(
            result,
            Err(RecordError::DigestLength {
                expected: 64,
                actual: 32
            })
        );
        assert!(TargetRecord::hmac_sha1(b"", &[0u8; 19]).is_err());
    }

    #[test]
    fn test_expected_digest_is_truncated() {
        let digest: Vec<u8> = (0u8..48).collect();
        let record = TargetRecord::iterated(Algorithm::IterSha384, b"abc", 5, &digest).unwrap();
        assert_eq!(record.expected_digest(), &digest[..16]);
        assert_eq!(record.wire_digest().len(), 48);

        let hmac = TargetRecord::hmac_sha1(b"s", &[3u8; 20]).unwrap();
        assert_eq!(hmac.expected_digest().len(), 20);
        assert_eq!(hmac.iterations(), 1);
    }

    #[test]
    fn test_hmac_salt_limit() {
        assert!(TargetRecord::hmac_sha1(&[b'a'; 55], &[0u8; 20]).is_ok());
        assert!(TargetRecord::hmac_sha1(&[b'a'; 56], &[0u8; 20]).is_err());
    }

    #[test]
    fn test_candidate_length_limit() {
        assert!(Candidate::new(vec![b'x'; PLAINTEXT_LENGTH]).is_ok());
        assert_eq!(
            Candidate::new(vec![b'x'; PLAINTEXT_LENGTH + 1]),
            Err(CoreError::CandidateTooLong {
                len: 126,
                max: PLAINTEXT_LENGTH
            })
        );
    }

    #[test]
    fn test_salt_bucket_is_stable_and_bounded() {
        let a = TargetRecord::iterated(Algorithm::IterSha1, b"abcdef", 1024, &[0u8; 20]).unwrap();
        let b = TargetRecord::iterated(Algorithm::IterSha1, b"abcdef", 1024, &[1u8; 20]).unwrap();
        assert_eq!(a.salt_bucket(1024), b.salt_bucket(1024));
        assert!(a.salt_bucket(1024) < 1024);
        assert!(a.shares_salt_with(&b));
    }
}
