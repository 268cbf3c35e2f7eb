//! The evaluator: one candidate or a batch against one or many target records.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use keyeval_core::{codec, Algorithm, Candidate, Ciphertext, Comparator, Digest, TargetRecord};
use keyeval_engine::{compute_for, select, BackendKind, LaneBackend, SUPPORTED_WIDTHS};

use crate::error::{EvalError, Result};

/// Digest bucket level used to index expected digests during a scan.
const SCAN_BUCKET_LEVEL: usize = 6;

/// Salt table size used to group targets during a scan.
const SALT_TABLE_SIZE: u32 = 1 << 10;

/// Configuration for an [`Evaluator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Backend for HMAC-SHA1 batches.
    pub backend: BackendKind,
    /// Lanes per HMAC-SHA1 batch. One of 1, 2, 4, 8, 16.
    pub lane_width: usize,
    /// Evaluate iterated records on the rayon pool.
    pub parallel: bool,
    /// Run the four-byte prefix check before the full compare.
    pub quick_reject: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Lanes,
            lane_width: 8,
            parallel: true,
            quick_reject: true,
        }
    }
}

impl EvaluatorConfig {
    /// Check the configuration can be built.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_WIDTHS.contains(&self.lane_width) {
            return Err(EvalError::InvalidConfig(format!(
                "lane_width {} not in {:?}",
                self.lane_width, SUPPORTED_WIDTHS
            )));
        }
        Ok(())
    }
}

/// Result of [`Evaluator::evaluate_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of candidates hashed.
    pub tested: usize,
    /// Number that got past the prefix check (all of them when it is off).
    pub survivors: usize,
    /// Indices of matching candidates, ascending.
    pub matched: Vec<usize>,
}

impl BatchReport {
    /// Whether candidate `index` matched.
    pub fn is_match(&self, index: usize) -> bool {
        self.matched.binary_search(&index).is_ok()
    }
}

/// One candidate matching one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Match {
    /// Index into the candidate slice.
    pub candidate: usize,
    /// Index into the target slice.
    pub target: usize,
}

/// Result of [`Evaluator::scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Distinct (algorithm, salt, iterations) groups.
    pub groups: usize,
    /// Digests computed: candidates times groups.
    pub computed: usize,
    /// Candidate-target pairs that got past the prefix check.
    pub survivors: usize,
    /// Confirmed matches, sorted by candidate then target.
    pub matches: Vec<Match>,
}

/// Targets that can share one digest per candidate.
struct SaltGroup<'a> {
    representative: &'a TargetRecord,
    targets: Vec<usize>,
}

/// Evaluates candidates against target records.
///
/// Owns its batch backend, so batch operations take `&mut self`; separate
/// evaluators are independent and may run on separate threads.
pub struct Evaluator {
    config: EvaluatorConfig,
    backend: Box<dyn LaneBackend>,
}

impl Evaluator {
    /// Build an evaluator and its HMAC-SHA1 batch backend.
    pub fn new(config: EvaluatorConfig) -> Result<Self> {
        config.validate()?;
        let backend = select(config.backend, config.lane_width)?;
        Ok(Self { config, backend })
    }

    /// The active configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Parse a textual record.
    pub fn parse_target(&self, text: impl AsRef<[u8]>) -> Result<TargetRecord> {
        Ok(codec::parse(text)?)
    }

    /// Parse many textual records, skipping (and logging) malformed ones.
    pub fn parse_targets<I, T>(&self, texts: I) -> Vec<TargetRecord>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        texts
            .into_iter()
            .enumerate()
            .filter_map(|(i, text)| match codec::parse(text.as_ref()) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index = i, "Rejected target record: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Structural check of a textual record.
    pub fn is_valid(&self, text: impl AsRef<[u8]>) -> bool {
        codec::valid(text)
    }

    /// Canonical text of a textual record.
    pub fn canonicalize(&self, text: impl AsRef<[u8]>) -> Ciphertext {
        codec::canonicalize(text)
    }

    /// Render a record back to text.
    pub fn render(&self, record: &TargetRecord) -> Ciphertext {
        codec::render(record)
    }

    fn comparator<'r>(&self, record: &'r TargetRecord) -> Comparator<'r> {
        Comparator::new(record).with_quick_reject(self.config.quick_reject)
    }

    /// Whether `candidate` hashes to `record`'s digest.
    pub fn evaluate(&self, candidate: &Candidate, record: &TargetRecord) -> bool {
        let digest = compute_for(candidate, record);
        self.comparator(record).matches(digest.as_bytes())
    }

    /// Evaluate every candidate against one record.
    pub fn evaluate_batch(&mut self, candidates: &[Candidate], record: &TargetRecord) -> BatchReport {
        let digests = self.digests(candidates, record);
        let cmp = self.comparator(record);

        let mut report = BatchReport {
            tested: digests.len(),
            ..BatchReport::default()
        };
        for (i, digest) in digests.iter().enumerate() {
            if self.config.quick_reject && cmp.quick_reject(digest.as_bytes()) {
                continue;
            }
            report.survivors += 1;
            if cmp.full_match(digest.as_bytes()) {
                report.matched.push(i);
            }
        }
        debug!(
            algorithm = %record.algorithm(),
            tested = report.tested,
            survivors = report.survivors,
            matched = report.matched.len(),
            "Batch evaluated"
        );
        report
    }

    /// Evaluate every candidate against every target.
    ///
    /// Targets sharing algorithm, salt and iteration count are hashed once
    /// per candidate. Within a group, computed digests are looked up by
    /// digest bucket, and only bucket hits get the full compare.
    pub fn scan(&mut self, candidates: &[Candidate], targets: &[TargetRecord]) -> ScanReport {
        let groups = group_by_salt(targets);
        let mut report = ScanReport {
            groups: groups.len(),
            ..ScanReport::default()
        };

        for group in &groups {
            let digests = self.digests(candidates, group.representative);
            report.computed += digests.len();

            let mut buckets: HashMap<u32, Vec<usize>> = HashMap::new();
            for &t in &group.targets {
                buckets
                    .entry(targets[t].wire_digest().bucket(SCAN_BUCKET_LEVEL))
                    .or_default()
                    .push(t);
            }

            for (c, digest) in digests.iter().enumerate() {
                let probe: &[usize] = if self.config.quick_reject {
                    match buckets.get(&digest.bucket(SCAN_BUCKET_LEVEL)) {
                        Some(hits) => hits.as_slice(),
                        None => continue,
                    }
                } else {
                    group.targets.as_slice()
                };
                for &t in probe {
                    report.survivors += 1;
                    if self.comparator(&targets[t]).full_match(digest.as_bytes()) {
                        report.matches.push(Match { candidate: c, target: t });
                    }
                }
            }
            trace!(
                algorithm = %group.representative.algorithm(),
                targets = group.targets.len(),
                "Scanned salt group"
            );
        }

        report.matches.sort_unstable();
        debug!(
            groups = report.groups,
            computed = report.computed,
            matches = report.matches.len(),
            "Scan complete"
        );
        report
    }

    /// Native digests of every candidate under `record`'s parameters.
    fn digests(&mut self, candidates: &[Candidate], record: &TargetRecord) -> Vec<Digest> {
        match record.algorithm() {
            Algorithm::HmacSha1 => self.lane_digests(candidates, record),
            _ if self.config.parallel => candidates
                .par_iter()
                .map(|candidate| compute_for(candidate, record))
                .collect(),
            _ => candidates
                .iter()
                .map(|candidate| compute_for(candidate, record))
                .collect(),
        }
    }

    fn lane_digests(&mut self, candidates: &[Candidate], record: &TargetRecord) -> Vec<Digest> {
        let backend = &mut self.backend;
        let width = backend.width();
        let mut out = Vec::with_capacity(candidates.len());

        backend.set_salt(record.salt());
        for (chunk_index, chunk) in candidates.chunks(width).enumerate() {
            for (lane, candidate) in chunk.iter().enumerate() {
                backend.set_key(candidate.as_bytes(), lane);
            }
            backend.compute_batch();
            out.extend((0..chunk.len()).map(|lane| backend.lane_digest(lane)));
            trace!(chunk = chunk_index, lanes = chunk.len(), "Computed lane batch");
        }
        backend.clear_keys();
        out
    }
}

fn group_by_salt(targets: &[TargetRecord]) -> Vec<SaltGroup<'_>> {
    let mut groups: Vec<SaltGroup<'_>> = Vec::new();
    let mut index: HashMap<u32, Vec<usize>> = HashMap::new();

    for (t, target) in targets.iter().enumerate() {
        let slot = index.entry(target.salt_bucket(SALT_TABLE_SIZE)).or_default();
        match slot
            .iter()
            .copied()
            .find(|&g| groups[g].representative.shares_salt_with(target))
        {
            Some(g) => groups[g].targets.push(t),
            None => {
                slot.push(groups.len());
                groups.push(SaltGroup {
                    representative: target,
                    targets: vec![t],
                });
            }
        }
    }
    groups
}
