//! Digest comparison: prefix fast-path rejection, then full compare.
//!
//! [`quick_reject`] looks at the first four bytes only and is what a host runs
//! when scanning many candidates against one target (or one candidate against
//! many targets). It can only say "definitely not". [`full_match`] is the
//! authoritative answer and must always follow before reporting a hit.

use crate::record::TargetRecord;

/// Number of leading bytes inspected by [`quick_reject`].
pub const QUICK_PREFIX: usize = 4;

/// True when `computed` certainly does not match `expected`.
///
/// Only the first [`QUICK_PREFIX`] bytes are compared. A `false` result does
/// not imply a match.
pub fn quick_reject(computed: &[u8], expected: &[u8]) -> bool {
    let n = QUICK_PREFIX.min(expected.len());
    computed.len() < n || computed[..n] != expected[..n]
}

/// True when the first `expected.len()` bytes of `computed` equal `expected`.
///
/// `computed` may be longer than `expected` (a native digest against a
/// truncated comparison digest); it may not be shorter.
pub fn full_match(computed: &[u8], expected: &[u8]) -> bool {
    computed.len() >= expected.len() && computed[..expected.len()] == *expected
}

/// Comparator bound to one target record.
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'a> {
    expected: &'a [u8],
    quick: bool,
}

impl<'a> Comparator<'a> {
    /// Compare against the record's comparison digest.
    pub fn new(record: &'a TargetRecord) -> Self {
        Self {
            expected: record.expected_digest(),
            quick: true,
        }
    }

    /// Enable or disable the prefix fast path.
    pub fn with_quick_reject(mut self, enabled: bool) -> Self {
        self.quick = enabled;
        self
    }

    /// The comparison digest.
    pub fn expected(&self) -> &'a [u8] {
        self.expected
    }

    /// Fast path only.
    pub fn quick_reject(&self, computed: &[u8]) -> bool {
        quick_reject(computed, self.expected)
    }

    /// Full compare only.
    pub fn full_match(&self, computed: &[u8]) -> bool {
        full_match(computed, self.expected)
    }

    /// Fast path (when enabled) followed by the full compare.
    pub fn matches(&self, computed: &[u8]) -> bool {
        if self.quick && self.quick_reject(computed) {
            return false;
        }
        self.full_match(computed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Algorithm;
    use proptest::prelude::*;

    #[test]
    fn test_quick_reject_prefix_only() {
        let expected = [1, 2, 3, 4, 5, 6];
        assert!(!quick_reject(&[1, 2, 3, 4, 0, 0], &expected));
        assert!(quick_reject(&[1, 2, 3, 0, 5, 6], &expected));
    }

    #[test]
    fn test_full_match_truncated() {
        let native = [9u8; 32];
        assert!(full_match(&native, &[9u8; 16]));
        assert!(!full_match(&native[..8], &[9u8; 16]));
    }

    #[test]
    fn test_comparator_on_record() {
        let digest: Vec<u8> = (0u8..20).collect();
        let record = TargetRecord::iterated(Algorithm::IterSha1, b"salt", 1, &digest).unwrap();
        let cmp = Comparator::new(&record);
        assert_eq!(cmp.expected().len(), 16);
        assert!(cmp.matches(&digest));

        let mut tail_differs = digest.clone();
        tail_differs[19] ^= 1;
        // Bytes past the comparison length are ignored.
        assert!(cmp.matches(&tail_differs));

        let mut head_differs = digest.clone();
        head_differs[10] ^= 1;
        assert!(!cmp.quick_reject(&head_differs));
        assert!(!cmp.matches(&head_differs));
        assert!(!cmp.with_quick_reject(false).matches(&head_differs));
    }

    proptest! {
        #[test]
        fn quick_reject_has_no_false_negatives(digest in prop::collection::vec(any::<u8>(), 4..64)) {
            prop_assert!(!quick_reject(&digest, &digest));
            prop_assert!(full_match(&digest, &digest));
        }

        #[test]
        fn full_match_rejects_any_flipped_byte(
            digest in prop::collection::vec(any::<u8>(), 16..64),
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let mut other = digest.clone();
            let i = index.index(digest.len());
            other[i] ^= flip;
            prop_assert!(!full_match(&other, &digest));
        }
    }
}
