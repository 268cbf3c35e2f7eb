//! Iterated salted hash chain.
//!
//! ```text
//! d_0 = H(p || salt)
//! d_i = H(p || d_{i-1})    for i in 1..iterations
//! ```
//!
//! The salt enters only the first round. Every round re-absorbs the
//! plaintext, so the state after `H(p)` is computed once and cloned.

use keyeval_core::Digest;

use crate::primitive::HashPrimitive;

/// Run `iterations` rounds of the chain and return the full native digest.
///
/// # Panics
///
/// Panics if `iterations` is zero; parsed records never carry a zero count.
pub fn chain<H: HashPrimitive>(plaintext: &[u8], salt: &[u8], iterations: u32) -> Digest {
    assert!(iterations > 0, "hash chain needs at least one round");

    let mut prefix = H::init();
    prefix.update(plaintext);

    let mut round = prefix.clone();
    round.update(salt);
    let mut out = Digest::zeroed(H::DIGEST_SIZE);
    round.finalize_into(out.as_mut_bytes());

    for _ in 1..iterations {
        let mut round = prefix.clone();
        round.update(out.as_bytes());
        round.finalize_into(out.as_mut_bytes());
    }
    out
}
