//! Batch backends: one salt, many keys, one digest per lane.
//!
//! A batch is driven in a fixed order:
//!
//! 1. [`LaneBackend::set_salt`] once per target salt
//! 2. [`LaneBackend::set_key`] for each lane in use
//! 3. [`LaneBackend::compute_batch`]
//! 4. [`LaneBackend::lane_digest`] per lane
//!
//! Every backend computes HMAC-SHA1(key, salt) per lane, and every backend
//! must agree with the scalar one bit for bit. Lanes that were never given a
//! key (or were cleared) hash with the empty key.

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use tracing::debug;

use keyeval_core::{Digest, Salt, HMAC_SALT_MAX};

use crate::error::{EngineError, Result};
use crate::hmac::HmacKey;
use crate::lanes::LaneHmacSha1;

/// Lane counts a backend can be built with.
pub const SUPPORTED_WIDTHS: [usize; 5] = [1, 2, 4, 8, 16];

/// Which batch implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One lane at a time through the streaming hash.
    Scalar,
    /// Lock-step compression across all lanes.
    #[default]
    Lanes,
}

/// A multi-lane HMAC-SHA1 evaluator.
pub trait LaneBackend: Send {
    /// Number of lanes.
    fn width(&self) -> usize;

    /// Load the message shared by every lane. Invalidates earlier results.
    ///
    /// # Panics
    ///
    /// Panics if the salt is longer than [`HMAC_SALT_MAX`].
    fn set_salt(&mut self, salt: &Salt);

    /// Load the key for `lane`.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= width()`.
    fn set_key(&mut self, key: &[u8], lane: usize);

    /// The key last loaded into `lane`, empty if none.
    fn get_key(&self, lane: usize) -> &[u8];

    /// Reset every lane to the empty key.
    fn clear_keys(&mut self);

    /// Compute all lanes.
    fn compute_batch(&mut self);

    /// Digest of `lane` from the last [`compute_batch`](Self::compute_batch).
    ///
    /// # Panics
    ///
    /// Panics if the lane index is out of range, or if a salt or key was
    /// loaded after the last batch.
    fn lane_digest(&self, lane: usize) -> Digest;
}

/// Build a backend.
pub fn select(kind: BackendKind, width: usize) -> Result<Box<dyn LaneBackend>> {
    let backend: Box<dyn LaneBackend> = match (kind, width) {
        (BackendKind::Scalar, w) if SUPPORTED_WIDTHS.contains(&w) => Box::new(ScalarBatch::new(w)),
        (BackendKind::Lanes, 1) => Box::new(LaneHmacSha1::<1>::new()),
        (BackendKind::Lanes, 2) => Box::new(LaneHmacSha1::<2>::new()),
        (BackendKind::Lanes, 4) => Box::new(LaneHmacSha1::<4>::new()),
        (BackendKind::Lanes, 8) => Box::new(LaneHmacSha1::<8>::new()),
        (BackendKind::Lanes, 16) => Box::new(LaneHmacSha1::<16>::new()),
        (_, w) => return Err(EngineError::UnsupportedLaneWidth(w)),
    };
    debug!(?kind, width, "selected batch backend");
    Ok(backend)
}

pub(crate) fn check_salt(salt: &Salt) {
    assert!(
        salt.len() <= HMAC_SALT_MAX,
        "salt of {} bytes exceeds the {}-byte single-block limit",
        salt.len(),
        HMAC_SALT_MAX
    );
}

/// Reference backend: each lane runs the streaming HMAC on its own.
pub struct ScalarBatch {
    salt: Salt,
    keys: Vec<Vec<u8>>,
    schedules: Vec<HmacKey<Sha1>>,
    digests: Vec<Digest>,
    computed: bool,
}

impl ScalarBatch {
    /// A backend with `width` lanes, all holding the empty key.
    pub fn new(width: usize) -> Self {
        assert!(width > 0, "a batch needs at least one lane");
        Self {
            salt: Salt::new(&[]),
            keys: vec![Vec::new(); width],
            schedules: vec![HmacKey::new(&[]); width],
            digests: vec![Digest::zeroed(20); width],
            computed: false,
        }
    }
}

impl LaneBackend for ScalarBatch {
    fn width(&self) -> usize {
        self.keys.len()
    }

    fn set_salt(&mut self, salt: &Salt) {
        check_salt(salt);
        self.salt = salt.clone();
        self.computed = false;
    }

    fn set_key(&mut self, key: &[u8], lane: usize) {
        assert!(lane < self.width(), "lane {} out of range", lane);
        self.keys[lane] = key.to_vec();
        self.schedules[lane] = HmacKey::new(key);
        self.computed = false;
    }

    fn get_key(&self, lane: usize) -> &[u8] {
        &self.keys[lane]
    }

    fn clear_keys(&mut self) {
        let empty = HmacKey::new(&[]);
        for (key, schedule) in self.keys.iter_mut().zip(self.schedules.iter_mut()) {
            key.clear();
            *schedule = empty.clone();
        }
        self.computed = false;
    }

    fn compute_batch(&mut self) {
        for (digest, schedule) in self.digests.iter_mut().zip(&self.schedules) {
            *digest = schedule.digest(self.salt.as_bytes());
        }
        self.computed = true;
    }

    fn lane_digest(&self, lane: usize) -> Digest {
        assert!(self.computed, "lane digest read before compute_batch");
        self.digests[lane]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmac::hmac;

    #[test]
    fn test_select_widths() {
        for kind in [BackendKind::Scalar, BackendKind::Lanes] {
            for width in SUPPORTED_WIDTHS {
                assert_eq!(select(kind, width).unwrap().width(), width);
            }
            for width in [0, 3, 5, 32] {
                assert_eq!(
                    select(kind, width).err(),
                    Some(EngineError::UnsupportedLaneWidth(width))
                );
            }
        }
    }

    #[test]
    fn test_scalar_batch_matches_hmac() {
        let mut batch = ScalarBatch::new(4);
        batch.set_salt(&Salt::new(b"salt"));
        batch.set_key(b"alpha", 0);
        batch.set_key(b"beta", 2);
        batch.compute_batch();

        assert_eq!(batch.lane_digest(0), hmac::<Sha1>(b"alpha", b"salt"));
        assert_eq!(batch.lane_digest(1), hmac::<Sha1>(b"", b"salt"));
        assert_eq!(batch.lane_digest(2), hmac::<Sha1>(b"beta", b"salt"));
        assert_eq!(batch.get_key(2), b"beta");
        assert_eq!(batch.get_key(3), b"");
    }

    #[test]
    fn test_clear_keys() {
        let mut batch = ScalarBatch::new(2);
        batch.set_key(b"alpha", 1);
        batch.clear_keys();
        batch.compute_batch();
        assert!(batch.get_key(1).is_empty());
        assert_eq!(batch.lane_digest(1), hmac::<Sha1>(b"", b""));
    }

    #[test]
    #[should_panic(expected = "before compute_batch")]
    fn test_stale_read_panics() {
        let mut batch = ScalarBatch::new(1);
        batch.compute_batch();
        batch.set_key(b"x", 0);
        batch.lane_digest(0);
    }

    #[test]
    #[should_panic(expected = "single-block limit")]
    fn test_long_salt_panics() {
        let mut batch = ScalarBatch::new(1);
        batch.set_salt(&Salt::new(&[0; 56]));
    }

    #[test]
    fn test_backend_kind_default() {
        assert_eq!(BackendKind::default(), BackendKind::Lanes);
    }
}
