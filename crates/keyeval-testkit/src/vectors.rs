//! Golden test vectors: records with a known matching plaintext.
//!
//! Every vector's ciphertext is already in canonical form except the
//! mixed-case HMAC digest, so `render(parse(ciphertext))` reproduces it for
//! all others.

use serde::Serialize;

use keyeval_core::{codec, Algorithm, Candidate, Comparator};
use keyeval_engine::compute_for;

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The textual record.
    pub ciphertext: &'static str,
    /// A plaintext that matches it.
    pub plaintext: &'static str,
    /// The record's algorithm.
    pub algorithm: Algorithm,
}

/// HMAC-SHA1 vectors.
pub fn hmac_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "hmac: sentence salt",
            ciphertext: "The quick brown fox jumps over the lazy dog#de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9",
            plaintext: "key",
            algorithm: Algorithm::HmacSha1,
        },
        GoldenVector {
            name: "hmac: empty salt, empty key",
            ciphertext: "#fbdb1d1b18aa6c08324b7d64b71fb76370690e1d",
            plaintext: "",
            algorithm: Algorithm::HmacSha1,
        },
        GoldenVector {
            name: "hmac: '#' in salt, uppercase digest, key over one block",
            ciphertext: "Beppe#Grillo#DEBBDB4D549ABE59FAB67D0FB76B76FDBC4431F1",
            plaintext: "Io credo nella reincarnazione e sono di Genova; per cui ho fatto testamento e mi sono lasciato tutto a me.",
            algorithm: Algorithm::HmacSha1,
        },
        GoldenVector {
            name: "hmac: late*night",
            ciphertext: "7oTwG04WUjJ0BTDFFIkTJlgl#293b75c1f28def530c17fc8ae389008179bf4091",
            plaintext: "late*night",
            algorithm: Algorithm::HmacSha1,
        },
    ]
}

/// Iterated-chain vectors for all four hashes.
pub fn iterated_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "sha1: 12-byte salt",
            ciphertext: "{x-issha, 1024}hmiyJ2a/Z+HRpjQ37Osz+rYax9UxMjM0NTY3ODkwYWI=",
            plaintext: "OpenWall",
            algorithm: Algorithm::IterSha1,
        },
        GoldenVector {
            name: "sha1: JohnTheRipper",
            ciphertext: "{x-issha, 1024}fRLe9EvN/Le81BDEDZR5SEC0O6BhYmNkZWZnaHVrYWw=",
            plaintext: "JohnTheRipper",
            algorithm: Algorithm::IterSha1,
        },
        GoldenVector {
            name: "sha1: unpadded payload",
            ciphertext: "{x-issha, 1024}L1PHSP1vOwdYh0ASjswI69fQQQhzQXFlWmxnaFA5",
            plaintext: "booboo",
            algorithm: Algorithm::IterSha1,
        },
        GoldenVector {
            name: "sha1: 1-byte salt",
            ciphertext: "{x-issha, 1024}dCjaHQ47/WeSwsoSYDR/8puLby5T",
            plaintext: "booboo",
            algorithm: Algorithm::IterSha1,
        },
        GoldenVector {
            name: "sha1: punctuation in plaintext",
            ciphertext: "{x-issha, 1024}+q+WSxWXJt7SjV5VJEymEKPUbn1FQWM=",
            plaintext: "HYulafeE!3",
            algorithm: Algorithm::IterSha1,
        },
        GoldenVector {
            name: "sha1: 6666 iterations",
            ciphertext: "{x-issha, 6666}7qNFlIR+ZQUpe2DtSBvpvzU5VlBzcG1DVGxvOEFQODI=",
            plaintext: "dif_iterations",
            algorithm: Algorithm::IterSha1,
        },
        GoldenVector {
            name: "sha256: booboo",
            ciphertext: "{x-isSHA256, 3000}UqMnsr5BYN+uornWC7yhGa/Wj0u5tshX19mDUQSlgih6OTFoZjRpMQ==",
            plaintext: "booboo",
            algorithm: Algorithm::IterSha256,
        },
        GoldenVector {
            name: "sha256: GottaGoWhereNeeded",
            ciphertext: "{x-isSHA256, 3000}ydi0JlyU6lX5305Qk/Q3uLBbIFjWuTyGo3tPBZDcGFd6NkFvV1gza3RkNg==",
            plaintext: "GottaGoWhereNeeded",
            algorithm: Algorithm::IterSha256,
        },
        GoldenVector {
            name: "sha384: booboo",
            ciphertext: "{x-isSHA384, 5000}3O/F4YGKNmIYHDu7ZQ7Q+ioCOQi4HRY4yrggKptAU9DtmHigCuGqBiAPVbKbEAfGTzh4YlZLWUM=",
            plaintext: "booboo",
            algorithm: Algorithm::IterSha384,
        },
        GoldenVector {
            name: "sha384: yiPP3rs",
            ciphertext: "{x-isSHA384, 5000}XSLo2AKIvACwqW/X416UeVbHOXmio4u27Z7cgXS2rxND+zTpN+x3JNfQcEQX2PT0Z3FPdEY2dHM=",
            plaintext: "yiPP3rs",
            algorithm: Algorithm::IterSha384,
        },
        GoldenVector {
            name: "sha512: booboo",
            ciphertext: "{x-isSHA512, 7500}ctlX6qYsWspafEzwoej6nFp7zRQQjr8y22vE+xeveIX2gUndAw9N2Gep5azNUwuxOe2o7tusF800OfB9tg4taWI4Tg==",
            plaintext: "booboo",
            algorithm: Algorithm::IterSha512,
        },
        GoldenVector {
            name: "sha512: unpadded payload",
            ciphertext: "{x-isSHA512, 7500}Qyrh2JXgGkvIfKYOJRdWFut5/pVnXI/vZvqJ7N+Tz9M1zUTXGWCZSom4az4AhqOuAahBwuhcKqMq/pYPW4h3cThvT2JaWVBw",
            plaintext: "hapy1CCe!",
            algorithm: Algorithm::IterSha512,
        },
        GoldenVector {
            name: "sha512: 16-byte binary salt",
            ciphertext: "{x-isSHA512, 18009}C2+Sij3JyXPPDuQgsF6Zot7XnjRFX86X67tWJpUzXNnFw2dKcGPH6HDEzVJ8HN8+cJe4vZaOYTlmdz09gI7YEwECAwQFBgcICQoLDA0ODwA=",
            plaintext: "maxlen",
            algorithm: Algorithm::IterSha512,
        },
    ]
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    let mut vectors = hmac_vectors();
    vectors.extend(iterated_vectors());
    vectors
}

/// Check every vector: parse, compute and compare.
///
/// Returns `(name, matched)` per vector; a vector that fails to parse is
/// reported as not matched.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    all_vectors()
        .iter()
        .map(|v| {
            let matched = match (codec::parse(v.ciphertext), Candidate::try_from(v.plaintext)) {
                (Ok(record), Ok(candidate)) => {
                    Comparator::new(&record).matches(compute_for(&candidate, &record).as_bytes())
                }
                _ => false,
            };
            (v.name.to_string(), matched)
        })
        .collect()
}
