//! Hash primitives behind one trait.
//!
//! The HMAC and chain constructions are written once, generic over
//! [`HashPrimitive`]; this module binds the trait to the SHA-1 and SHA-2
//! implementations from the RustCrypto `sha1`/`sha2` crates.

use keyeval_core::{Digest, HashKind};

/// A streaming, cloneable hash function with a known block and digest size.
///
/// Cloning a partially fed state is how the constructions reuse a common
/// prefix (a key pad, a plaintext) across many messages.
pub trait HashPrimitive: Clone + Send + Sync + 'static {
    /// Which hash this is.
    const KIND: HashKind;

    /// Output size in bytes.
    const DIGEST_SIZE: usize = Self::KIND.digest_size();

    /// Compression block size in bytes.
    const BLOCK_SIZE: usize = Self::KIND.block_size();

    /// A fresh state.
    fn init() -> Self;

    /// Absorb `data`.
    fn update(&mut self, data: &[u8]);

    /// Finish and write the digest into the first [`Self::DIGEST_SIZE`]
    /// bytes of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than the digest.
    fn finalize_into(self, out: &mut [u8]);

    /// One-shot hash of `data`.
    fn hash(data: &[u8]) -> Digest {
        let mut state = Self::init();
        state.update(data);
        let mut out = Digest::zeroed(Self::DIGEST_SIZE);
        state.finalize_into(out.as_mut_bytes());
        out
    }
}

macro_rules! impl_hash_primitive {
    ($ty:ty, $kind:expr) => {
        impl HashPrimitive for $ty {
            const KIND: HashKind = $kind;

            fn init() -> Self {
                <$ty as digest::Digest>::new()
            }

            fn update(&mut self, data: &[u8]) {
                digest::Digest::update(self, data);
            }

            fn finalize_into(self, out: &mut [u8]) {
                assert!(
                    out.len() >= Self::DIGEST_SIZE,
                    "output buffer of {} bytes for a {}-byte digest",
                    out.len(),
                    Self::DIGEST_SIZE
                );
                let digest = digest::Digest::finalize(self);
                out[..Self::DIGEST_SIZE].copy_from_slice(&digest);
            }
        }
    };
}

impl_hash_primitive!(sha1::Sha1, HashKind::Sha1);
impl_hash_primitive!(sha2::Sha256, HashKind::Sha256);
impl_hash_primitive!(sha2::Sha384, HashKind::Sha384);
impl_hash_primitive!(sha2::Sha512, HashKind::Sha512);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_follow_kind() {
        assert_eq!(sha1::Sha1::DIGEST_SIZE, 20);
        assert_eq!(sha2::Sha256::BLOCK_SIZE, 64);
        assert_eq!(sha2::Sha384::DIGEST_SIZE, 48);
        assert_eq!(sha2::Sha512::BLOCK_SIZE, 128);
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(
            sha1::Sha1::hash(b"abc").to_hex(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            sha2::Sha256::hash(b"passwordsalt").to_hex(),
            "7a37b85c8918eac19a9089c0fa5a2ab4dce3f90528dcdeec108b23ddf3607b99"
        );
    }

    #[test]
    fn test_streaming_equals_one_shot() {
        let mut state = sha2::Sha512::init();
        state.update(b"pass");
        state.update(b"word");
        let mut out = [0u8; 64];
        state.finalize_into(&mut out);
        assert_eq!(&out[..], sha2::Sha512::hash(b"password").as_bytes());
    }

    #[test]
    #[should_panic(expected = "output buffer")]
    fn test_short_output_panics() {
        let mut out = [0u8; 16];
        sha1::Sha1::init().finalize_into(&mut out);
    }
}
