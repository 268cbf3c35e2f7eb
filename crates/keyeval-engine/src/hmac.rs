//! HMAC (RFC 2104) over any [`HashPrimitive`].
//!
//! The key schedule is done once per key: [`HmacKey`] holds the hash states
//! after absorbing `key ^ ipad` and `key ^ opad`, and every message is then
//! two clones and two short updates.

use std::borrow::Cow;
use std::fmt;

use keyeval_core::{Digest, MAX_DIGEST_SIZE};

use crate::primitive::HashPrimitive;

/// Inner pad byte.
pub const IPAD: u8 = 0x36;

/// Outer pad byte.
pub const OPAD: u8 = 0x5c;

/// Largest block size of any supported hash.
const MAX_BLOCK_SIZE: usize = 128;

/// The key actually mixed into the pads.
///
/// Keys longer than the block size are replaced by their hash.
pub fn effective_key<H: HashPrimitive>(key: &[u8]) -> Cow<'_, [u8]> {
    if key.len() > H::BLOCK_SIZE {
        Cow::Owned(H::hash(key).as_bytes().to_vec())
    } else {
        Cow::Borrowed(key)
    }
}

/// Precomputed HMAC key schedule.
#[derive(Clone)]
pub struct HmacKey<H: HashPrimitive> {
    inner: H,
    outer: H,
}

impl<H: HashPrimitive> HmacKey<H> {
    /// Run the key schedule.
    pub fn new(key: &[u8]) -> Self {
        let key = effective_key::<H>(key);
        let mut ipad = [IPAD; MAX_BLOCK_SIZE];
        let mut opad = [OPAD; MAX_BLOCK_SIZE];
        for (i, &b) in key.iter().enumerate() {
            ipad[i] ^= b;
            opad[i] ^= b;
        }

        let mut inner = H::init();
        inner.update(&ipad[..H::BLOCK_SIZE]);
        let mut outer = H::init();
        outer.update(&opad[..H::BLOCK_SIZE]);
        Self { inner, outer }
    }

    /// HMAC of `message` under this key.
    pub fn digest(&self, message: &[u8]) -> Digest {
        let mut inner = self.inner.clone();
        inner.update(message);
        let mut inner_digest = [0u8; MAX_DIGEST_SIZE];
        inner.finalize_into(&mut inner_digest);

        let mut outer = self.outer.clone();
        outer.update(&inner_digest[..H::DIGEST_SIZE]);
        let mut out = Digest::zeroed(H::DIGEST_SIZE);
        outer.finalize_into(out.as_mut_bytes());
        out
    }
}

impl<H: HashPrimitive> fmt::Debug for HmacKey<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HmacKey<{:?}>(..)", H::KIND)
    }
}

/// One-shot HMAC.
pub fn hmac<H: HashPrimitive>(key: &[u8], message: &[u8]) -> Digest {
    HmacKey::<H>::new(key).digest(message)
}
