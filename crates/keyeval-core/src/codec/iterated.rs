//! Iterated-chain record form: `{x-isTAG, N}base64(digest || salt)`.
//!
//! `TAG` is one of `sha`, `SHA256`, `SHA384`, `SHA512` (case-sensitive), `N`
//! an unsigned decimal iteration count, and the payload MIME base64 with
//! optional `=` padding. The payload decodes to the native-size digest
//! followed by 1..=16 salt bytes.

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::codec::Ciphertext;
use crate::error::RecordError;
use crate::record::{TargetRecord, ITERATED_SALT_MAX, ITERATED_SALT_MIN};
use crate::types::{Algorithm, MAX_DIGEST_SIZE};

/// Literal prefix of every iterated record.
pub const PREFIX: &[u8] = b"{x-is";

/// Longest payload (SHA-512 digest plus a 16-byte salt), in base64 characters.
pub const MAX_PAYLOAD_CHARS: usize = (MAX_DIGEST_SIZE + ITERATED_SALT_MAX).div_ceil(3) * 4;

/// Decoder accepting padded and unpadded input, like MIME decoders do.
const MIME: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// The fields of an iterated record, before the payload is decoded.
struct Fields<'a> {
    algorithm: Algorithm,
    iterations: u32,
    payload: &'a [u8],
}

fn split(text: &[u8]) -> Result<Fields<'_>, RecordError> {
    let rest = text.strip_prefix(PREFIX).ok_or(RecordError::MissingPrefix)?;

    let comma = rest
        .iter()
        .position(|&b| b == b',')
        .ok_or_else(|| RecordError::UnsupportedAlgorithmTag(lossy(rest)))?;
    let tag = &rest[..comma];
    let algorithm =
        Algorithm::from_tag(tag).ok_or_else(|| RecordError::UnsupportedAlgorithmTag(lossy(tag)))?;

    let rest = rest[comma + 1..]
        .strip_prefix(b" ")
        .ok_or_else(|| RecordError::InvalidIterations("expected ' ' after tag".into()))?;
    let close = rest
        .iter()
        .position(|&b| b == b'}')
        .ok_or_else(|| RecordError::InvalidIterations("missing '}'".into()))?;
    let iterations = parse_iterations(&rest[..close])?;

    let payload = &rest[close + 1..];
    let decoded_len = decoded_len(payload)?;
    let digest_len = algorithm.native_digest_size();
    let salt_len = decoded_len.saturating_sub(digest_len);
    if decoded_len < digest_len || !(ITERATED_SALT_MIN..=ITERATED_SALT_MAX).contains(&salt_len) {
        return Err(RecordError::SaltLength {
            len: salt_len,
            min: ITERATED_SALT_MIN,
            max: ITERATED_SALT_MAX,
        });
    }

    Ok(Fields {
        algorithm,
        iterations,
        payload,
    })
}

/// Unsigned decimal, digits only, fitting in 32 bits, non-zero.
fn parse_iterations(digits: &[u8]) -> Result<u32, RecordError> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(RecordError::InvalidIterations(lossy(digits)));
    }
    let text = std::str::from_utf8(digits).map_err(|_| RecordError::InvalidIterations(lossy(digits)))?;
    let iterations: u32 = text
        .parse()
        .map_err(|_| RecordError::InvalidIterations(lossy(digits)))?;
    if iterations == 0 {
        return Err(RecordError::ZeroIterations);
    }
    Ok(iterations)
}

/// Decoded length of a base64 payload, checking its shape without decoding.
fn decoded_len(payload: &[u8]) -> Result<usize, RecordError> {
    if payload.len() > MAX_PAYLOAD_CHARS {
        return Err(RecordError::PayloadTooLong(payload.len()));
    }
    let body_len = payload
        .iter()
        .position(|&b| b == b'=')
        .unwrap_or(payload.len());
    let (body, padding) = payload.split_at(body_len);

    if !body
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
    {
        return Err(RecordError::InvalidBase64("character outside alphabet".into()));
    }
    if body.len() % 4 == 1 {
        return Err(RecordError::InvalidBase64("truncated quantum".into()));
    }
    if !padding.is_empty() {
        let expected = (4 - body.len() % 4) % 4;
        if padding.len() != expected || padding.iter().any(|&b| b != b'=') {
            return Err(RecordError::InvalidBase64("bad padding".into()));
        }
    }
    Ok(body.len() * 3 / 4)
}

/// Longest slice of input copied into an error message.
const ERROR_EXCERPT_LEN: usize = 16;

fn lossy(bytes: &[u8]) -> String {
    let excerpt = &bytes[..bytes.len().min(ERROR_EXCERPT_LEN)];
    let mut out = String::from_utf8_lossy(excerpt).into_owned();
    if bytes.len() > ERROR_EXCERPT_LEN {
        out.push_str("...");
    }
    out
}

/// Structural check. Does not decode the payload.
pub fn valid(text: &[u8]) -> bool {
    split(text).is_ok()
}

/// Parse `{x-isTAG, N}base64`.
pub fn parse(text: &[u8]) -> Result<TargetRecord, RecordError> {
    let fields = split(text)?;
    let decoded = MIME
        .decode(fields.payload)
        .map_err(|e| RecordError::InvalidBase64(e.to_string()))?;
    let (digest, salt) = decoded.split_at(fields.algorithm.native_digest_size());
    TargetRecord::iterated(fields.algorithm, salt, fields.iterations, digest)
}

/// Render `{x-isTAG, N}` followed by padded standard base64 of digest || salt.
pub fn render(record: &TargetRecord) -> Ciphertext {
    let algorithm = record.algorithm();
    let tag = algorithm.tag().unwrap_or_default();

    let mut payload = Vec::with_capacity(algorithm.native_digest_size() + record.salt().len());
    payload.extend_from_slice(record.wire_digest().as_bytes());
    payload.extend_from_slice(record.salt().as_bytes());

    let text = format!(
        "{{x-is{}, {}}}{}",
        tag,
        record.iterations(),
        STANDARD.encode(&payload)
    );
    Ciphertext::from(text)
}
