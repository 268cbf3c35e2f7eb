//! # keyeval testkit
//!
//! Testing utilities for keyeval.
//!
//! - **Golden vectors**: records with a known matching plaintext
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Evaluators and matching-record builders
//!
//! ## Golden Vectors
//!
//! ```rust
//! use keyeval_testkit::vectors::verify_all_vectors;
//!
//! for (name, matched) in verify_all_vectors() {
//!     assert!(matched, "{name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use keyeval_testkit::generators::{record_from_params, RecordParams};
//!
//! proptest! {
//!     #[test]
//!     fn plaintext_matches(params: RecordParams) {
//!         let record = record_from_params(&params);
//!         let mut fixture = keyeval_testkit::TestFixture::new();
//!         let report = fixture.evaluator.evaluate_batch(&[params.candidate()], &record);
//!         prop_assert_eq!(report.matched, vec![0]);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{backend_fixtures, candidates, TestFixture};
pub use generators::{record_from_params, RecordParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
