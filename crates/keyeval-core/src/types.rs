//! Strong type definitions for keyeval.
//!
//! Algorithms and digests are typed so that a digest size can never drift away
//! from the algorithm that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest native digest produced by any supported hash (SHA-512).
pub const MAX_DIGEST_SIZE: usize = 64;

/// Comparison length for every iterated-chain algorithm.
///
/// All iterated digests are cut down to 16 bytes before comparing.
pub const ITERATED_COMPARISON_SIZE: usize = 16;

/// Masks for the seven hash-table bucket levels.
const BUCKET_MASKS: [u32; 7] = [
    0xf, 0xff, 0xfff, 0xffff, 0xfffff, 0xffffff, 0x7ffffff,
];

/// The underlying hash function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashKind {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashKind {
    /// Native output size in bytes.
    pub const fn digest_size(self) -> usize {
        match self {
            HashKind::Sha1 => 20,
            HashKind::Sha256 => 32,
            HashKind::Sha384 => 48,
            HashKind::Sha512 => 64,
        }
    }

    /// Compression block size in bytes (the HMAC pad size).
    pub const fn block_size(self) -> usize {
        match self {
            HashKind::Sha1 | HashKind::Sha256 => 64,
            HashKind::Sha384 | HashKind::Sha512 => 128,
        }
    }
}

/// Construction and hash selector of a target record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// HMAC-SHA1, `salt#hexdigest`.
    HmacSha1,
    /// Iterated chain over SHA-1, tag `sha`.
    IterSha1,
    /// Iterated chain over SHA-256, tag `SHA256`.
    IterSha256,
    /// Iterated chain over SHA-384, tag `SHA384`.
    IterSha384,
    /// Iterated chain over SHA-512, tag `SHA512`.
    IterSha512,
}

impl Algorithm {
    /// All iterated algorithms, in tag order.
    pub const ITERATED: [Algorithm; 4] = [
        Algorithm::IterSha1,
        Algorithm::IterSha256,
        Algorithm::IterSha384,
        Algorithm::IterSha512,
    ];

    /// The hash function this algorithm is built on.
    pub const fn hash_kind(self) -> HashKind {
        match self {
            Algorithm::HmacSha1 | Algorithm::IterSha1 => HashKind::Sha1,
            Algorithm::IterSha256 => HashKind::Sha256,
            Algorithm::IterSha384 => HashKind::Sha384,
            Algorithm::IterSha512 => HashKind::Sha512,
        }
    }

    /// Whether this is an iterated-chain algorithm.
    pub const fn is_iterated(self) -> bool {
        !matches!(self, Algorithm::HmacSha1)
    }

    /// Size of the digest carried by the textual record.
    pub const fn native_digest_size(self) -> usize {
        self.hash_kind().digest_size()
    }

    /// Number of leading digest bytes that take part in comparison.
    pub const fn comparison_size(self) -> usize {
        match self {
            Algorithm::HmacSha1 => 20,
            _ => ITERATED_COMPARISON_SIZE,
        }
    }

    /// The record tag of an iterated algorithm.
    ///
    /// SHA-1 is the lowercase `sha` without a trailing `1`; the others are
    /// uppercase. Records in the wild use exactly these spellings.
    pub const fn tag(self) -> Option<&'static str> {
        match self {
            Algorithm::HmacSha1 => None,
            Algorithm::IterSha1 => Some("sha"),
            Algorithm::IterSha256 => Some("SHA256"),
            Algorithm::IterSha384 => Some("SHA384"),
            Algorithm::IterSha512 => Some("SHA512"),
        }
    }

    /// Look up an iterated algorithm by its case-sensitive tag.
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        Self::ITERATED
            .into_iter()
            .find(|alg| alg.tag().map(str::as_bytes) == Some(tag))
    }

    /// Tunable-cost "hash type": 1 sha1, 2 SHA256, 3 SHA384, 4 SHA512, 0 for HMAC.
    pub const fn cost_type(self) -> u32 {
        match self {
            Algorithm::HmacSha1 => 0,
            Algorithm::IterSha1 => 1,
            Algorithm::IterSha256 => 2,
            Algorithm::IterSha384 => 3,
            Algorithm::IterSha512 => 4,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::HmacSha1 => "hmac-sha1",
            Algorithm::IterSha1 => "iter-sha1",
            Algorithm::IterSha256 => "iter-sha256",
            Algorithm::IterSha384 => "iter-sha384",
            Algorithm::IterSha512 => "iter-sha512",
        };
        f.write_str(name)
    }
}

/// A digest of up to [`MAX_DIGEST_SIZE`] bytes, stored in wire (big-endian) order.
///
/// Bytes past `len` are always zero, so derived equality is byte equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest {
    bytes: [u8; MAX_DIGEST_SIZE],
    len: u8,
}

impl Digest {
    /// A zero-filled digest of `len` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds [`MAX_DIGEST_SIZE`].
    pub fn zeroed(len: usize) -> Self {
        assert!(
            len <= MAX_DIGEST_SIZE,
            "digest length {len} exceeds {MAX_DIGEST_SIZE}"
        );
        Self {
            bytes: [0u8; MAX_DIGEST_SIZE],
            len: len as u8,
        }
    }

    /// Copy a digest from a slice. Returns `None` if it is too long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_DIGEST_SIZE {
            return None;
        }
        let mut digest = Self::zeroed(bytes.len());
        digest.bytes[..bytes.len()].copy_from_slice(bytes);
        Some(digest)
    }

    /// Parse from hex (either case).
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes).ok_or(hex::FromHexError::InvalidStringLength)
    }

    /// Length in bytes.
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the digest is empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// Mutable digest bytes, for primitives writing their output in place.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        let len = self.len();
        &mut self.bytes[..len]
    }

    /// A copy truncated to the first `n` bytes (or fewer, if shorter).
    pub fn prefix(&self, n: usize) -> Self {
        let n = n.min(self.len());
        let mut out = Self::zeroed(n);
        out.bytes[..n].copy_from_slice(&self.bytes[..n]);
        out
    }

    /// The first four bytes as a big-endian word (zero-extended if shorter).
    pub fn first_word(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// Hash-table bucket of this digest at `level` (0..=6).
    ///
    /// Parsed and computed digests bucket identically, so a host can index
    /// expected digests and probe with computed ones.
    pub fn bucket(&self, level: usize) -> u32 {
        self.first_word() & BUCKET_MASKS[level.min(BUCKET_MASKS.len() - 1)]
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Digest({})", &hex[..hex.len().min(16)])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
