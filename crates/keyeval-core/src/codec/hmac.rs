//! HMAC-SHA1 record form: `salt#hexdigest`.
//!
//! The salt is raw bytes and may itself contain `#`; only the last `#` is a
//! delimiter. The digest is 40 hex characters in either case, rendered back
//! in lowercase.

use crate::codec::Ciphertext;
use crate::error::RecordError;
use crate::record::{TargetRecord, HMAC_SALT_MAX};
use crate::types::Algorithm;

/// The delimiter between salt and digest.
pub const DELIMITER: u8 = b'#';

/// Hex length of an HMAC-SHA1 digest.
pub const DIGEST_HEX_LEN: usize = Algorithm::HmacSha1.native_digest_size() * 2;

/// Split at the last delimiter and check every bound, without allocating.
fn split(text: &[u8]) -> Result<(&[u8], &[u8]), RecordError> {
    let pos = text
        .iter()
        .rposition(|&b| b == DELIMITER)
        .ok_or(RecordError::MissingDelimiter)?;
    let (salt, hex_digest) = (&text[..pos], &text[pos + 1..]);

    if salt.len() > HMAC_SALT_MAX {
        return Err(RecordError::SaltLength {
            len: salt.len(),
            min: 0,
            max: HMAC_SALT_MAX,
        });
    }
    if hex_digest.len() != DIGEST_HEX_LEN {
        return Err(RecordError::DigestLength {
            expected: DIGEST_HEX_LEN,
            actual: hex_digest.len(),
        });
    }
    if !hex_digest.iter().all(u8::is_ascii_hexdigit) {
        return Err(RecordError::InvalidHex);
    }
    Ok((salt, hex_digest))
}

/// Structural check.
pub fn valid(text: &[u8]) -> bool {
    split(text).is_ok()
}

/// Parse `salt#hexdigest`.
pub fn parse(text: &[u8]) -> Result<TargetRecord, RecordError> {
    let (salt, hex_digest) = split(text)?;
    let digest = hex::decode(hex_digest).map_err(|_| RecordError::InvalidHex)?;
    TargetRecord::hmac_sha1(salt, &digest)
}

/// Lowercase everything after the last delimiter; the salt is left untouched.
pub fn canonicalize(text: &[u8]) -> Ciphertext {
    let mut out = text.to_vec();
    if let Some(pos) = out.iter().rposition(|&b| b == DELIMITER) {
        out[pos + 1..].make_ascii_lowercase();
    }
    Ciphertext::new(out)
}

/// Render `salt#lowerhex`.
pub fn render(record: &TargetRecord) -> Ciphertext {
    debug_assert_eq!(record.algorithm(), Algorithm::HmacSha1);
    let salt = record.salt().as_bytes();
    let mut out = Vec::with_capacity(salt.len() + 1 + DIGEST_HEX_LEN);
    out.extend_from_slice(salt);
    out.push(DELIMITER);
    out.extend_from_slice(record.wire_digest().to_hex().as_bytes());
    Ciphertext::new(out)
}
