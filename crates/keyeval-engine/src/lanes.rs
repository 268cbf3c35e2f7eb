//! Lock-step HMAC-SHA1 over `W` lanes.
//!
//! Every buffer is laid out word-major: `[[u32; W]; 16]` holds word `t` of
//! every lane in `block[t]`, so each compression step is the same operation
//! on `W` adjacent integers and the inner loops vectorize.
//!
//! Bytes are packed big-endian into words when keys and salts are loaded, and
//! unpacked big-endian when a lane digest is read, so nothing here depends on
//! the host's byte order.
//!
//! The salt fits in one block after the pad block (at most 55 bytes), so each
//! lane costs exactly four compressions: `ipad`, salt, `opad`, inner digest.

use keyeval_core::{Digest, HashKind, Salt};
use sha1::Sha1;

use crate::backend::{check_salt, LaneBackend};
use crate::hmac::{effective_key, IPAD, OPAD};

const BLOCK_WORDS: usize = 16;
const STATE_WORDS: usize = 5;
const SCHEDULE_WORDS: usize = 80;
const DIGEST_SIZE: usize = HashKind::Sha1.digest_size();
const BLOCK_SIZE: usize = HashKind::Sha1.block_size();

const IV: [u32; STATE_WORDS] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

const IPAD_WORD: u32 = u32::from_be_bytes([IPAD; 4]);
const OPAD_WORD: u32 = u32::from_be_bytes([OPAD; 4]);

/// Length trailer of the outer message: one pad block plus one digest, in bits.
const OUTER_BIT_LEN: u32 = ((BLOCK_SIZE + DIGEST_SIZE) * 8) as u32;

type Block<const W: usize> = [[u32; W]; BLOCK_WORDS];
type State<const W: usize> = [[u32; W]; STATE_WORDS];

/// `W`-lane HMAC-SHA1 batch backend.
pub struct LaneHmacSha1<const W: usize> {
    ipad: Block<W>,
    opad: Block<W>,
    salt_block: Block<W>,
    outer_block: Block<W>,
    digests: State<W>,
    keys: Vec<Vec<u8>>,
    computed: bool,
}

impl<const W: usize> LaneHmacSha1<W> {
    /// A backend with every lane on the empty key and an empty salt.
    pub fn new() -> Self {
        assert!(W > 0, "a batch needs at least one lane");
        let mut outer_block = [[0u32; W]; BLOCK_WORDS];
        outer_block[STATE_WORDS] = [0x8000_0000; W];
        outer_block[BLOCK_WORDS - 1] = [OUTER_BIT_LEN; W];

        let mut backend = Self {
            ipad: [[IPAD_WORD; W]; BLOCK_WORDS],
            opad: [[OPAD_WORD; W]; BLOCK_WORDS],
            salt_block: [[0u32; W]; BLOCK_WORDS],
            outer_block,
            digests: [[0u32; W]; STATE_WORDS],
            keys: vec![Vec::new(); W],
            computed: false,
        };
        backend.set_salt(&Salt::default());
        backend
    }
}

impl<const W: usize> Default for LaneHmacSha1<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> LaneBackend for LaneHmacSha1<W> {
    fn width(&self) -> usize {
        W
    }

    fn set_salt(&mut self, salt: &Salt) {
        check_salt(salt);
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[..salt.len()].copy_from_slice(salt.as_bytes());
        bytes[salt.len()] = 0x80;
        let bit_len = ((BLOCK_SIZE + salt.len()) * 8) as u32;
        bytes[BLOCK_SIZE - 4..].copy_from_slice(&bit_len.to_be_bytes());

        for (word, chunk) in self.salt_block.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = [u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]); W];
        }
        self.computed = false;
    }

    fn set_key(&mut self, key: &[u8], lane: usize) {
        assert!(lane < W, "lane {} out of range for width {}", lane, W);
        for t in 0..BLOCK_WORDS {
            self.ipad[t][lane] = IPAD_WORD;
            self.opad[t][lane] = OPAD_WORD;
        }
        for (i, &b) in effective_key::<Sha1>(key).iter().enumerate() {
            let shifted = u32::from(b) << (24 - 8 * (i % 4));
            self.ipad[i / 4][lane] ^= shifted;
            self.opad[i / 4][lane] ^= shifted;
        }
        self.keys[lane] = key.to_vec();
        self.computed = false;
    }

    fn get_key(&self, lane: usize) -> &[u8] {
        &self.keys[lane]
    }

    fn clear_keys(&mut self) {
        self.ipad = [[IPAD_WORD; W]; BLOCK_WORDS];
        self.opad = [[OPAD_WORD; W]; BLOCK_WORDS];
        for key in &mut self.keys {
            key.clear();
        }
        self.computed = false;
    }

    fn compute_batch(&mut self) {
        let mut state = IV.map(|v| [v; W]);
        compress(&mut state, &self.ipad);
        compress(&mut state, &self.salt_block);
        self.outer_block[..STATE_WORDS].copy_from_slice(&state);

        let mut state = IV.map(|v| [v; W]);
        compress(&mut state, &self.opad);
        compress(&mut state, &self.outer_block);
        self.digests = state;
        self.computed = true;
    }

    fn lane_digest(&self, lane: usize) -> Digest {
        assert!(self.computed, "lane digest read before compute_batch");
        let mut out = Digest::zeroed(DIGEST_SIZE);
        for (chunk, word) in out.as_mut_bytes().chunks_exact_mut(4).zip(&self.digests) {
            chunk.copy_from_slice(&word[lane].to_be_bytes());
        }
        out
    }
}

#[inline(always)]
fn ch(b: u32, c: u32, d: u32) -> u32 {
    (b & c) | (!b & d)
}

#[inline(always)]
fn parity(b: u32, c: u32, d: u32) -> u32 {
    b ^ c ^ d
}

#[inline(always)]
fn maj(b: u32, c: u32, d: u32) -> u32 {
    (b & c) | (b & d) | (c & d)
}

/// One SHA-1 compression on every lane.
fn compress<const W: usize>(state: &mut State<W>, block: &Block<W>) {
    let mut w = [[0u32; W]; SCHEDULE_WORDS];
    w[..BLOCK_WORDS].copy_from_slice(block);
    for t in BLOCK_WORDS..SCHEDULE_WORDS {
        for l in 0..W {
            w[t][l] = (w[t - 3][l] ^ w[t - 8][l] ^ w[t - 14][l] ^ w[t - 16][l]).rotate_left(1);
        }
    }

    let [mut a, mut b, mut c, mut d, mut e] = *state;
    for (t, wt) in w.iter().enumerate() {
        let (k, f): (u32, fn(u32, u32, u32) -> u32) = match t {
            0..=19 => (0x5A827999, ch),
            20..=39 => (0x6ED9EBA1, parity),
            40..=59 => (0x8F1BBCDC, maj),
            _ => (0xCA62C1D6, parity),
        };
        let mut next = [0u32; W];
        for l in 0..W {
            next[l] = a[l]
                .rotate_left(5)
                .wrapping_add(f(b[l], c[l], d[l]))
                .wrapping_add(e[l])
                .wrapping_add(k)
                .wrapping_add(wt[l]);
        }
        e = d;
        d = c;
        c = b.map(|x| x.rotate_left(30));
        b = a;
        a = next;
    }

    for (word, add) in state.iter_mut().zip([a, b, c, d, e]) {
        for l in 0..W {
            word[l] = word[l].wrapping_add(add[l]);
        }
    }
}
