//! Proptest generators for property-based testing.

use proptest::prelude::*;

use keyeval_core::codec::iterated;
use keyeval_core::{
    Algorithm, Candidate, TargetRecord, HMAC_SALT_MAX, ITERATED_SALT_MAX, ITERATED_SALT_MIN,
    PLAINTEXT_LENGTH,
};
use keyeval_engine::compute;

/// Iteration counts used by generated records. Kept small so chains stay cheap.
pub const MAX_GENERATED_ITERATIONS: u32 = 64;

/// Generate any algorithm.
pub fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![
        Just(Algorithm::HmacSha1),
        Just(Algorithm::IterSha1),
        Just(Algorithm::IterSha256),
        Just(Algorithm::IterSha384),
        Just(Algorithm::IterSha512),
    ]
}

/// Generate an iterated algorithm.
pub fn iterated_algorithm() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ITERATED.to_vec())
}

/// Generate candidate plaintext bytes, up to the candidate limit.
pub fn plaintext() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=PLAINTEXT_LENGTH)
}

/// Generate a candidate.
pub fn candidate() -> impl Strategy<Value = Candidate> {
    plaintext().prop_map(|p| Candidate::new(p).expect("generated within the limit"))
}

/// Generate an HMAC salt (binary, may contain '#').
///
/// Some salts start with the iterated-record prefix, which random bytes
/// would never produce.
pub fn hmac_salt() -> impl Strategy<Value = Vec<u8>> {
    let prefix = iterated::PREFIX;
    prop_oneof![
        4 => prop::collection::vec(any::<u8>(), 0..=HMAC_SALT_MAX),
        1 => prop::collection::vec(any::<u8>(), 0..=HMAC_SALT_MAX - prefix.len())
            .prop_map(move |tail| [prefix, tail.as_slice()].concat()),
    ]
}

/// Generate an iterated-chain salt.
pub fn iterated_salt() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), ITERATED_SALT_MIN..=ITERATED_SALT_MAX)
}

/// Generate a record with an arbitrary digest, not tied to any plaintext.
pub fn arbitrary_record() -> impl Strategy<Value = TargetRecord> {
    let hmac = (hmac_salt(), prop::collection::vec(any::<u8>(), 20)).prop_map(|(salt, digest)| {
        TargetRecord::hmac_sha1(&salt, &digest).expect("generated within bounds")
    });
    let iterated = (iterated_algorithm(), iterated_salt(), 1u32..=u32::MAX)
        .prop_flat_map(|(alg, salt, iterations)| {
            prop::collection::vec(any::<u8>(), alg.native_digest_size()).prop_map(move |digest| {
                TargetRecord::iterated(alg, &salt, iterations, &digest)
                    .expect("generated within bounds")
            })
        });
    prop_oneof![hmac, iterated]
}

/// Parameters for generating a record that a known plaintext matches.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub algorithm: Algorithm,
    pub salt: Vec<u8>,
    pub iterations: u32,
    pub plaintext: Vec<u8>,
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (algorithm(), hmac_salt(), iterated_salt(), 1..=MAX_GENERATED_ITERATIONS, plaintext())
            .prop_map(|(algorithm, hmac_salt, iter_salt, iterations, plaintext)| {
                if algorithm.is_iterated() {
                    RecordParams {
                        algorithm,
                        salt: iter_salt,
                        iterations,
                        plaintext,
                    }
                } else {
                    RecordParams {
                        algorithm,
                        salt: hmac_salt,
                        iterations: 1,
                        plaintext,
                    }
                }
            })
            .boxed()
    }
}

impl RecordParams {
    /// The matching candidate.
    pub fn candidate(&self) -> Candidate {
        Candidate::new(self.plaintext.clone()).expect("generated within the limit")
    }
}

/// Build the record that `params.plaintext` matches.
pub fn record_from_params(params: &RecordParams) -> TargetRecord {
    let digest = compute(
        params.algorithm,
        &params.plaintext,
        &params.salt,
        params.iterations,
    );
    let record = if params.algorithm.is_iterated() {
        TargetRecord::iterated(
            params.algorithm,
            &params.salt,
            params.iterations,
            digest.as_bytes(),
        )
    } else {
        TargetRecord::hmac_sha1(&params.salt, digest.as_bytes())
    };
    record.expect("generated within bounds")
}
