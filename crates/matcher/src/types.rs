use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How candidate pairs are generated before exact Jaccard scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Score every pair of non-empty sets. Quadratic; fine for small corpora.
    Exhaustive,
    /// Bucket MinHash signatures by LSH bands and score only colliding pairs.
    #[default]
    Lsh,
}

/// Configuration for duplicate search.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Configuration schema version. Must be >= 1.
    pub version: u32,
    pub strategy: MatchStrategy,
    /// Number of LSH bands. Signature length is `bands * rows_per_band`.
    pub bands: usize,
    pub rows_per_band: usize,
    /// Seed for the MinHash permutation family.
    pub seed: u64,
    /// Minimum exact Jaccard similarity for a pair to be reported, in `(0, 1]`.
    pub threshold: f64,
    /// Compute MinHash signatures on the rayon pool.
    pub use_parallel: bool,
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the LSH banding. More bands raise recall; more rows per band
    /// raise precision.
    pub fn with_banding(mut self, bands: usize, rows_per_band: usize) -> Self {
        self.bands = bands;
        self.rows_per_band = rows_per_band;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// MinHash signature length, `bands * rows_per_band`.
    pub fn signature_len(&self) -> Result<usize, MatchError> {
        self.bands
            .checked_mul(self.rows_per_band)
            .ok_or(MatchError::InvalidConfigSignatureLength {
                bands: self.bands,
                rows: self.rows_per_band,
            })
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version < 1 {
            return Err(MatchError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.bands < 1 {
            return Err(MatchError::InvalidConfigBands { bands: self.bands });
        }
        if self.rows_per_band < 1 {
            return Err(MatchError::InvalidConfigRows {
                rows: self.rows_per_band,
            });
        }
        self.signature_len()?;
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(MatchError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            strategy: MatchStrategy::Lsh,
            bands: 16,
            rows_per_band: 8,
            seed: 0xF00D_BAAD_F00D_BAAD,
            threshold: 0.8,
            use_parallel: false,
        }
    }
}

/// A pair of documents whose shingle sets meet the similarity threshold.
///
/// `left < right` under the id ordering, so each pair is reported once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuplicatePair<I> {
    pub left: I,
    pub right: I,
    /// Exact Jaccard similarity of the two shingle sets.
    pub similarity: f64,
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: bands must be >= 1 (got {bands})")]
    InvalidConfigBands { bands: usize },

    #[error("invalid config: rows_per_band must be >= 1 (got {rows})")]
    InvalidConfigRows { rows: usize },

    #[error("invalid config: signature length overflow for bands={bands} rows={rows}")]
    InvalidConfigSignatureLength { bands: usize, rows: usize },

    #[error("invalid config: threshold must be in (0, 1] (got {threshold})")]
    InvalidThreshold { threshold: f64 },

    #[error("signature length mismatch: expected {expected}, got {got}")]
    SignatureLengthMismatch { expected: usize, got: usize },
}
