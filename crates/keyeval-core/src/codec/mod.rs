//! Textual record codec.
//!
//! Two independent formats are supported, both bit-exact:
//!
//! - [`hmac`]: `salt#hexdigest`, where only the last `#` delimits and the salt
//!   is opaque bytes.
//! - [`iterated`]: `{x-isTAG, N}base64(digest || salt)`.
//!
//! The top-level functions pick the format with [`Format::detect`]. Hosts that
//! already know the format can call the submodules directly.

pub mod hmac;
pub mod iterated;

use std::fmt;

use crate::error::RecordError;
use crate::record::TargetRecord;

/// Which textual format a record uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `salt#hexdigest`
    Hmac,
    /// `{x-isTAG, N}base64`
    Iterated,
}

impl Format {
    /// Pick the format of a textual record.
    ///
    /// An iterated record starts with the iterated prefix and never contains
    /// the HMAC delimiter. Everything else is the HMAC form, whose salt is
    /// opaque and may itself start with the iterated prefix.
    pub fn detect(text: &[u8]) -> Self {
        if text.starts_with(iterated::PREFIX) && !text.contains(&hmac::DELIMITER) {
            Format::Iterated
        } else {
            Format::Hmac
        }
    }
}

/// A textual record.
///
/// Salts are opaque bytes and may not be UTF-8, so the text is held as bytes.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Wrap record bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The record bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the record bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// The record as a string, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl AsRef<[u8]> for Ciphertext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Ciphertext {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Ciphertext {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Vec<u8>> for Ciphertext {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl PartialEq<str> for Ciphertext {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Ciphertext {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// Parse a textual record of either format.
pub fn parse(text: impl AsRef<[u8]>) -> Result<TargetRecord, RecordError> {
    let text = text.as_ref();
    match Format::detect(text) {
        Format::Hmac => hmac::parse(text),
        Format::Iterated => iterated::parse(text),
    }
}

/// Cheap structural check, run before [`parse`].
///
/// Agrees with `parse(text).is_ok()` but does not build a record.
pub fn valid(text: impl AsRef<[u8]>) -> bool {
    let text = text.as_ref();
    match Format::detect(text) {
        Format::Hmac => hmac::valid(text),
        Format::Iterated => iterated::valid(text),
    }
}

/// Normalize a textual record.
///
/// The HMAC digest is lowercased (digest comparison is case-insensitive but
/// the salt is not). Iterated records are returned unchanged: their tags are
/// case-sensitive and base64 is case-significant.
pub fn canonicalize(text: impl AsRef<[u8]>) -> Ciphertext {
    let text = text.as_ref();
    match Format::detect(text) {
        Format::Hmac => hmac::canonicalize(text),
        Format::Iterated => Ciphertext::new(text),
    }
}

/// Render a record back to its canonical text.
pub fn render(record: &TargetRecord) -> Ciphertext {
    if record.algorithm().is_iterated() {
        iterated::render(record)
    } else {
        hmac::render(record)
    }
}
