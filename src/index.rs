//! Corpus shingle index construction.
//!
//! [`IndexBuilder`] turns a batch of `(id, text)` documents into a
//! [`CorpusShingleIndex`]: one shingle set per document id. Per-document work
//! is independent, so the builder can shard it across the rayon pool; results
//! are always merged in input order, which keeps last-write-wins for repeated
//! ids deterministic.

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use canonical::{normalize, tokenize, NormalizeConfig};
use matcher::{jaccard, DuplicateFinder, DuplicatePair, MatchConfig, MatchError};
use perceptual::{make_shingle_set, window_count, ShingleConfig, ShingleSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{field, info, warn, Level};

use crate::document::{Document, DocumentText};
use crate::PipelineError;

/// Cooperative cancellation flag shared between a build and its caller.
///
/// Checked once per document, before the document is fingerprinted. Entries
/// already inserted when cancellation is observed stay intact.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Stage at which a single document failed.
///
/// Only decoding can fail per document: the shingle size is validated when
/// the builder is created and normalization is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Raw bytes were not valid UTF-8.
    Decode,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Decode => f.write_str("decode"),
        }
    }
}

/// A document skipped because it could not be fingerprinted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure<I> {
    pub id: I,
    pub stage: FailureStage,
    pub reason: String,
}

/// Outcome counters for one index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport<I> {
    /// Documents fingerprinted, counting every occurrence of a repeated id.
    pub indexed: usize,
    /// Documents with absent or empty text.
    pub filtered: usize,
    pub failures: Vec<DocumentFailure<I>>,
    /// Sliding windows attempted across all fingerprinted documents.
    pub total_windows: usize,
    /// False when the build was cancelled before every document was seen.
    /// A partial index must not be read as "fewer matches".
    pub complete: bool,
}

impl<I> IndexReport<I> {
    fn new() -> Self {
        Self {
            indexed: 0,
            filtered: 0,
            failures: Vec::new(),
            total_windows: 0,
            complete: true,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Mapping from document id to that document's shingle set.
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusShingleIndex<I: Eq + Hash> {
    entries: HashMap<I, ShingleSet>,
    shingle_size: usize,
}

impl<I: Eq + Hash> CorpusShingleIndex<I> {
    fn new(shingle_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            shingle_size,
        }
    }

    /// Shingle size `k` the sets were built with.
    pub fn shingle_size(&self) -> usize {
        self.shingle_size
    }

    pub fn get(&self, id: &I) -> Option<&ShingleSet> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &I) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, I, ShingleSet> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &I> {
        self.entries.keys()
    }

    /// Jaccard similarity of two indexed documents, `None` if either id is
    /// unknown.
    pub fn similarity(&self, a: &I, b: &I) -> Option<f64> {
        Some(jaccard(self.get(a)?, self.get(b)?))
    }

    /// Near-duplicate pairs across the whole index.
    pub fn find_duplicates(&self, cfg: &MatchConfig) -> Result<Vec<DuplicatePair<I>>, MatchError>
    where
        I: Ord + Clone + Sync,
    {
        DuplicateFinder::new(cfg.clone())?.find_duplicates(self)
    }

    pub fn into_map(self) -> HashMap<I, ShingleSet> {
        self.entries
    }
}

impl<'a, I: Eq + Hash> IntoIterator for &'a CorpusShingleIndex<I> {
    type Item = (&'a I, &'a ShingleSet);
    type IntoIter = hash_map::Iter<'a, I, ShingleSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Result of a build: the (possibly partial) index and its report.
#[derive(Debug, Clone)]
pub struct IndexBuild<I: Eq + Hash> {
    pub index: CorpusShingleIndex<I>,
    pub report: IndexReport<I>,
}

enum Outcome {
    Indexed { set: ShingleSet, windows: usize },
    Filtered,
    Failed { stage: FailureStage, reason: String },
    Cancelled,
}

struct Accumulator<I: Eq + Hash> {
    index: CorpusShingleIndex<I>,
    report: IndexReport<I>,
}

impl<I: Eq + Hash + fmt::Debug> Accumulator<I> {
    fn new(shingle_size: usize) -> Self {
        Self {
            index: CorpusShingleIndex::new(shingle_size),
            report: IndexReport::new(),
        }
    }

    fn apply(&mut self, id: I, outcome: Outcome) {
        match outcome {
            Outcome::Indexed { set, windows } => {
                self.report.indexed += 1;
                self.report.total_windows += windows;
                self.index.entries.insert(id, set);
            }
            Outcome::Filtered => self.report.filtered += 1,
            Outcome::Failed { stage, reason } => {
                warn!(doc_id = ?id, stage = %stage, error = %reason, "document_failure");
                self.report
                    .failures
                    .push(DocumentFailure { id, stage, reason });
            }
            Outcome::Cancelled => self.report.complete = false,
        }
    }
}

/// Builds a [`CorpusShingleIndex`] from `(id, text)` documents.
///
/// Configuration is validated when the builder is created, so a bad shingle
/// size is rejected before any document is read.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    normalize: NormalizeConfig,
    shingle: ShingleConfig,
    cancel: CancellationToken,
}

impl IndexBuilder {
    /// Builder with the default normalization scheme.
    pub fn new(shingle: ShingleConfig) -> Result<Self, PipelineError> {
        Self::with_configs(NormalizeConfig::default(), shingle)
    }

    pub fn with_configs(
        normalize: NormalizeConfig,
        shingle: ShingleConfig,
    ) -> Result<Self, PipelineError> {
        normalize.validate()?;
        shingle.validate()?;
        Ok(Self {
            normalize,
            shingle,
            cancel: CancellationToken::new(),
        })
    }

    /// Observe `token` between documents.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn normalize_config(&self) -> &NormalizeConfig {
        &self.normalize
    }

    pub fn shingle_config(&self) -> &ShingleConfig {
        &self.shingle
    }

    /// Build with the strategy selected by `ShingleConfig::use_parallel`.
    pub fn build<I, D, It>(&self, docs: It) -> IndexBuild<I>
    where
        I: Eq + Hash + fmt::Debug + Send,
        D: Into<Document<I>>,
        It: IntoIterator<Item = D>,
    {
        if self.shingle.use_parallel {
            self.build_parallel(docs)
        } else {
            self.build_sequential(docs)
        }
    }

    /// Single pass over `docs` on the calling thread.
    ///
    /// On cancellation the index holds exactly the documents seen before
    /// the token was observed.
    pub fn build_sequential<I, D, It>(&self, docs: It) -> IndexBuild<I>
    where
        I: Eq + Hash + fmt::Debug,
        D: Into<Document<I>>,
        It: IntoIterator<Item = D>,
    {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "shinglefp.build_index",
            documents = field::Empty,
            shingle_size = self.shingle.shingle_size,
            parallel = false
        );
        let _guard = span.enter();

        let mut acc = Accumulator::new(self.shingle.shingle_size);
        let mut seen = 0usize;
        for doc in docs {
            if self.cancel.is_cancelled() {
                acc.report.complete = false;
                break;
            }
            seen += 1;
            let doc = doc.into();
            let outcome = self.process(&doc);
            acc.apply(doc.id, outcome);
        }
        span.record("documents", seen);

        finish(acc, start)
    }

    /// Fingerprint documents on the rayon pool.
    ///
    /// The input is collected first. Outcomes are merged in input order, so
    /// the resulting index is identical to [`Self::build_sequential`] unless
    /// the build is cancelled, in which case any subset of documents may
    /// have been fingerprinted.
    pub fn build_parallel<I, D, It>(&self, docs: It) -> IndexBuild<I>
    where
        I: Eq + Hash + fmt::Debug + Send,
        D: Into<Document<I>>,
        It: IntoIterator<Item = D>,
    {
        let start = Instant::now();
        let docs: Vec<Document<I>> = docs.into_iter().map(Into::into).collect();
        let span = tracing::span!(
            Level::INFO,
            "shinglefp.build_index",
            documents = docs.len(),
            shingle_size = self.shingle.shingle_size,
            parallel = true
        );
        let _guard = span.enter();

        let outcomes: Vec<(I, Outcome)> = docs
            .into_par_iter()
            .map(|doc| {
                if self.cancel.is_cancelled() {
                    return (doc.id, Outcome::Cancelled);
                }
                let outcome = self.process(&doc);
                (doc.id, outcome)
            })
            .collect();

        let mut acc = Accumulator::new(self.shingle.shingle_size);
        for (id, outcome) in outcomes {
            acc.apply(id, outcome);
        }

        finish(acc, start)
    }

    fn process<I>(&self, doc: &Document<I>) -> Outcome {
        match &doc.text {
            Some(text) if !text.is_empty() => self.fingerprint(text),
            _ => Outcome::Filtered,
        }
    }

    fn fingerprint(&self, text: &DocumentText) -> Outcome {
        let text = match text.decode() {
            Ok(text) => text,
            Err(err) => {
                return Outcome::Failed {
                    stage: FailureStage::Decode,
                    reason: err.to_string(),
                }
            }
        };
        let normalized = normalize(&text, &self.normalize);
        let tokens = tokenize(&normalized);
        let width = self.shingle.window_width();
        Outcome::Indexed {
            set: make_shingle_set(&tokens, width),
            windows: window_count(tokens.len(), width),
        }
    }
}

fn finish<I: Eq + Hash>(acc: Accumulator<I>, start: Instant) -> IndexBuild<I> {
    let Accumulator { index, report } = acc;
    info!(
        entries = index.len(),
        indexed = report.indexed,
        filtered = report.filtered,
        failed = report.failed(),
        total_windows = report.total_windows,
        cancelled = !report.complete,
        elapsed_micros = start.elapsed().as_micros() as u64,
        "build_index_complete"
    );
    IndexBuild { index, report }
}

/// Build an index with shingle size `k` and the default normalization.
///
/// Fails before reading any document when `k < 2`. Documents that fail to
/// decode are left out of the index and only logged. Callers that need the
/// failures, the filtered count or the `complete` flag should use
/// [`IndexBuilder::build`] and read the [`IndexReport`].
pub fn build_index<I, D, It>(docs: It, k: usize) -> Result<CorpusShingleIndex<I>, PipelineError>
where
    I: Eq + Hash + fmt::Debug + Send,
    D: Into<Document<I>>,
    It: IntoIterator<Item = D>,
{
    let builder = IndexBuilder::new(ShingleConfig::new().with_shingle_size(k))?;
    Ok(builder.build(docs).index)
}
