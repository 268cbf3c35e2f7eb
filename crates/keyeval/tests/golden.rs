//! Golden vectors and end-to-end behavior of the evaluator.
//!
//! Every backend configuration must:
//! - accept each golden record and match its plaintext
//! - render each record back to its canonical text
//! - report identical batch and scan results

use keyeval::{BackendKind, Candidate, EvaluatorConfig, Match};
use keyeval_core::Algorithm;
use keyeval_testkit::generators::{hmac_salt, plaintext};
use keyeval_testkit::{all_vectors, backend_fixtures, candidates, GoldenVector, TestFixture};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn golden_vectors_match() {
    init_tracing();
    let fixture = TestFixture::new();
    for vector in all_vectors() {
        let record = fixture.evaluator.parse_target(vector.ciphertext).unwrap();
        let good = Candidate::try_from(vector.plaintext).unwrap();
        let bad = Candidate::try_from(format!("{}x", vector.plaintext).as_str()).unwrap();

        assert!(fixture.evaluator.evaluate(&good, &record), "{}", vector.name);
        assert!(!fixture.evaluator.evaluate(&bad, &record), "{}", vector.name);
    }
}

#[test]
fn golden_vectors_render_canonical_text() {
    let fixture = TestFixture::new();
    for vector in all_vectors() {
        let eval = &fixture.evaluator;
        assert!(eval.is_valid(vector.ciphertext), "{}", vector.name);

        let record = eval.parse_target(vector.ciphertext).unwrap();
        let canonical = eval.canonicalize(vector.ciphertext);
        assert_eq!(eval.render(&record), canonical, "{}", vector.name);
        assert_eq!(eval.parse_target(canonical.as_bytes()).unwrap(), record);
    }
}

#[test]
fn mixed_case_digest_canonicalizes() {
    let fixture = TestFixture::new();
    let text = "Beppe#Grillo#DEBBDB4D549ABE59FAB67D0FB76B76FDBC4431F1";
    assert_eq!(
        fixture.evaluator.canonicalize(text),
        "Beppe#Grillo#debbdb4d549abe59fab67d0fb76b76fdbc4431f1"
    );
}

#[test]
fn golden_vectors_serialize_to_json() {
    let json = serde_json::to_value(all_vectors()).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 17);
    assert_eq!(entries[4]["algorithm"], "IterSha1");
    assert_eq!(entries[4]["plaintext"], "OpenWall");
}

fn hmac_vectors() -> Vec<GoldenVector> {
    all_vectors()
        .into_iter()
        .filter(|v| v.algorithm == Algorithm::HmacSha1)
        .collect()
}

#[test]
fn batch_finds_plaintext_at_every_position() {
    init_tracing();
    for (name, mut fixture) in backend_fixtures() {
        for vector in hmac_vectors() {
            let record = fixture.evaluator.parse_target(vector.ciphertext).unwrap();
            for position in [0usize, 3, 8, 16] {
                let mut batch = candidates(&["alpha", "beta", "gamma", "delta", "epsilon"]);
                batch.extend(candidates(&["zeta"; 12]));
                batch.insert(position, Candidate::try_from(vector.plaintext).unwrap());

                let report = fixture.evaluator.evaluate_batch(&batch, &record);
                assert_eq!(report.tested, batch.len(), "{name}");
                assert_eq!(report.matched, vec![position], "{name}: {}", vector.name);
                assert!(report.survivors >= 1);
            }
        }
    }
}

#[test]
fn iterated_batch_parallel_and_sequential_agree() {
    let vectors: Vec<GoldenVector> = all_vectors()
        .into_iter()
        .filter(|v| v.algorithm == Algorithm::IterSha1)
        .collect();
    let words: Vec<&str> = vectors.iter().map(|v| v.plaintext).collect();
    let batch = candidates(&words);

    let mut parallel = TestFixture::new();
    let mut sequential = TestFixture::scalar(1);
    for vector in &vectors {
        let record = parallel.evaluator.parse_target(vector.ciphertext).unwrap();
        let a = parallel.evaluator.evaluate_batch(&batch, &record);
        let b = sequential.evaluator.evaluate_batch(&batch, &record);
        assert_eq!(a, b, "{}", vector.name);
        assert!(a.is_match(words.iter().position(|w| *w == vector.plaintext).unwrap()));
    }
}

#[test]
fn quick_reject_off_tests_everything() {
    let mut fixture = TestFixture::with_config(EvaluatorConfig {
        quick_reject: false,
        ..EvaluatorConfig::default()
    });
    let record = fixture.hmac_target(b"salt", b"right");
    let report = fixture
        .evaluator
        .evaluate_batch(&candidates(&["wrong", "right", "nope"]), &record);
    assert_eq!(report.survivors, 3);
    assert_eq!(report.matched, vec![1]);
}

#[test]
fn scan_groups_shared_salts() {
    init_tracing();
    let fixture = TestFixture::new();
    let targets = vec![
        fixture.hmac_target(b"shared", b"alpha"),
        fixture.hmac_target(b"shared", b"gamma"),
        fixture.hmac_target(b"other", b"beta"),
        fixture.iterated_target(Algorithm::IterSha256, b"shared", 10, b"beta"),
        fixture.iterated_target(Algorithm::IterSha256, b"shared", 10, b"alpha"),
        fixture.iterated_target(Algorithm::IterSha512, b"shared", 11, b"missing"),
    ];
    let batch = candidates(&["alpha", "beta", "gamma", "delta"]);

    let mut results = Vec::new();
    for (name, mut fixture) in backend_fixtures() {
        let report = fixture.evaluator.scan(&batch, &targets);
        assert_eq!(report.groups, 4, "{name}");
        assert_eq!(report.computed, 4 * batch.len(), "{name}");
        results.push(report);
    }

    let expected = vec![
        Match { candidate: 0, target: 0 },
        Match { candidate: 0, target: 4 },
        Match { candidate: 1, target: 2 },
        Match { candidate: 1, target: 3 },
        Match { candidate: 2, target: 1 },
    ];
    for report in &results {
        assert_eq!(report.matches, expected);
        assert_eq!(report, &results[0]);
    }
}

#[test]
fn scan_without_quick_reject_compares_whole_group() {
    let fixture = TestFixture::new();
    let targets = vec![
        fixture.hmac_target(b"shared", b"alpha"),
        fixture.hmac_target(b"shared", b"gamma"),
        fixture.iterated_target(Algorithm::IterSha384, b"pepper", 5, b"beta"),
    ];
    let batch = candidates(&["alpha", "beta", "gamma", "delta"]);

    let mut filtered = TestFixture::new();
    let mut exhaustive = TestFixture::with_config(EvaluatorConfig {
        quick_reject: false,
        ..EvaluatorConfig::default()
    });
    let a = filtered.evaluator.scan(&batch, &targets);
    let b = exhaustive.evaluator.scan(&batch, &targets);

    assert_eq!(b.groups, 2);
    assert_eq!(b.matches, a.matches);
    assert_eq!(
        b.matches,
        vec![
            Match { candidate: 0, target: 0 },
            Match { candidate: 1, target: 2 },
            Match { candidate: 2, target: 1 },
        ]
    );
    assert_eq!(b.survivors, batch.len() * 2 + batch.len());
    assert!(a.survivors <= b.survivors);
}

#[test]
fn scan_skips_malformed_text_targets() {
    init_tracing();
    let mut fixture = TestFixture::new();
    let targets = fixture.evaluator.parse_targets([
        "{x-issha, 1024}hmiyJ2a/Z+HRpjQ37Osz+rYax9UxMjM0NTY3ODkwYWI=",
        "{x-issha, 0}hmiyJ2a/Z+HRpjQ37Osz+rYax9UxMjM0NTY3ODkwYWI=",
        "not a record",
        "#fbdb1d1b18aa6c08324b7d64b71fb76370690e1d",
    ]);
    assert_eq!(targets.len(), 2);

    let report = fixture
        .evaluator
        .scan(&candidates(&["", "OpenWall"]), &targets);
    assert_eq!(
        report.matches,
        vec![
            Match { candidate: 0, target: 1 },
            Match { candidate: 1, target: 0 },
        ]
    );
}

#[test]
fn config_roundtrips_through_json() {
    let config = EvaluatorConfig {
        backend: BackendKind::Scalar,
        lane_width: 16,
        parallel: false,
        quick_reject: true,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"backend\":\"scalar\""));
    assert_eq!(serde_json::from_str::<EvaluatorConfig>(&json).unwrap(), config);

    let partial: EvaluatorConfig = serde_json::from_str(r#"{"lane_width": 4}"#).unwrap();
    assert_eq!(partial.lane_width, 4);
    assert_eq!(partial.backend, BackendKind::Lanes);
}

#[test]
fn oversized_candidate_rejected() {
    let long = "x".repeat(126);
    assert!(Candidate::try_from(long.as_str()).is_err());
    assert!(Candidate::try_from(&long[..125]).is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lane_and_scalar_batches_agree(
        salt in hmac_salt(),
        words in prop::collection::vec(plaintext(), 1..40),
        pick in any::<prop::sample::Index>(),
    ) {
        let batch: Vec<Candidate> = words.into_iter().map(|w| Candidate::new(w).unwrap()).collect();
        let chosen = pick.index(batch.len());

        let fixture = TestFixture::new();
        let record = fixture.hmac_target(&salt, batch[chosen].as_bytes());

        let mut reports = Vec::new();
        for (_, mut fixture) in backend_fixtures() {
            reports.push(fixture.evaluator.evaluate_batch(&batch, &record));
        }
        prop_assert!(reports[0].is_match(chosen));
        for report in &reports {
            prop_assert_eq!(report, &reports[0]);
        }
    }
}
