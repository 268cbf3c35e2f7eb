//! # keyeval
//!
//! A batched keyed-hash candidate evaluator.
//!
//! Given a password candidate and a target record (salt, iteration count,
//! algorithm and expected digest) it computes the candidate's digest and
//! reports whether it matches. Two constructions are supported:
//!
//! - **HMAC-SHA1**, records written `salt#hexdigest`. Keys over 64 bytes are
//!   hashed first.
//! - **Iterated salted chain** over SHA-1/256/384/512, records written
//!   `{x-isTAG, N}base64(digest || salt)`. The comparison uses the first 16
//!   bytes of the digest.
//!
//! HMAC-SHA1 batches run through a multi-lane backend; iterated batches are
//! spread over the rayon pool.
//!
//! ## Usage
//!
//! ```rust
//! use keyeval::{Candidate, Evaluator, EvaluatorConfig};
//!
//! let mut eval = Evaluator::new(EvaluatorConfig::default()).unwrap();
//! let record = eval
//!     .parse_target("{x-issha, 1024}hmiyJ2a/Z+HRpjQ37Osz+rYax9UxMjM0NTY3ODkwYWI=")
//!     .unwrap();
//!
//! let candidate = Candidate::try_from("OpenWall").unwrap();
//! assert!(eval.evaluate(&candidate, &record));
//!
//! let batch = [
//!     Candidate::try_from("openwall").unwrap(),
//!     Candidate::try_from("OpenWall").unwrap(),
//! ];
//! assert_eq!(eval.evaluate_batch(&batch, &record).matched, vec![1]);
//! ```
//!
//! ## Re-exports
//!
//! - `keyeval::core` - records, codec and comparator
//! - `keyeval::engine` - hash constructions and batch backends

pub mod error;
pub mod evaluator;

pub use keyeval_core as core;
pub use keyeval_engine as engine;

pub use error::{EvalError, Result};
pub use evaluator::{BatchReport, Evaluator, EvaluatorConfig, Match, ScanReport};

pub use keyeval_core::{Algorithm, Candidate, Ciphertext, Digest, TargetRecord};
pub use keyeval_engine::BackendKind;
