//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use keyeval::{BackendKind, Evaluator, EvaluatorConfig};
use keyeval_core::{Algorithm, Candidate, TargetRecord};
use keyeval_engine::compute;

/// An evaluator plus helpers for building matching records.
pub struct TestFixture {
    pub evaluator: Evaluator,
}

impl TestFixture {
    /// A fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    /// A fixture with a specific configuration.
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self {
            evaluator: Evaluator::new(config).expect("fixture config must be valid"),
        }
    }

    /// A fixture on the scalar backend, sequential iterated evaluation.
    pub fn scalar(lane_width: usize) -> Self {
        Self::with_config(EvaluatorConfig {
            backend: BackendKind::Scalar,
            lane_width,
            parallel: false,
            ..EvaluatorConfig::default()
        })
    }

    /// An HMAC-SHA1 record that `plaintext` matches.
    pub fn hmac_target(&self, salt: &[u8], plaintext: &[u8]) -> TargetRecord {
        let digest = compute(Algorithm::HmacSha1, plaintext, salt, 1);
        TargetRecord::hmac_sha1(salt, digest.as_bytes()).expect("salt within bounds")
    }

    /// An iterated-chain record that `plaintext` matches.
    pub fn iterated_target(
        &self,
        algorithm: Algorithm,
        salt: &[u8],
        iterations: u32,
        plaintext: &[u8],
    ) -> TargetRecord {
        let digest = compute(algorithm, plaintext, salt, iterations);
        TargetRecord::iterated(algorithm, salt, iterations, digest.as_bytes())
            .expect("record parameters within bounds")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidates from string literals.
pub fn candidates(words: &[&str]) -> Vec<Candidate> {
    words
        .iter()
        .map(|w| Candidate::try_from(*w).expect("candidate within the limit"))
        .collect()
}

/// One fixture per backend and supported width.
pub fn backend_fixtures() -> Vec<(String, TestFixture)> {
    let mut fixtures = Vec::new();
    for kind in [BackendKind::Scalar, BackendKind::Lanes] {
        for width in keyeval_engine::SUPPORTED_WIDTHS {
            let config = EvaluatorConfig {
                backend: kind,
                lane_width: width,
                ..EvaluatorConfig::default()
            };
            fixtures.push((format!("{:?}x{}", kind, width), TestFixture::with_config(config)));
        }
    }
    fixtures
}
