//! Workspace umbrella crate for shingle fingerprinting.
//!
//! Stitches normalization, shingle extraction and corpus indexing into one
//! entry point. A document's fingerprint is the set of CRC-32 hashes of its
//! word shingles; the [`CorpusShingleIndex`] maps every document id to that
//! set and is the input for near-duplicate search in [`matcher`].
//!
//! ```
//! use shinglefp::{build_index, MatchConfig};
//!
//! let docs = vec![
//!     (1u32, "The quick brown fox."),
//!     (2u32, "the quick brown fox"),
//! ];
//! let index = build_index(docs, 3).unwrap();
//! assert_eq!(index.get(&1).unwrap().len(), 3);
//! assert_eq!(index.similarity(&1, &2), Some(1.0));
//!
//! let pairs = index.find_duplicates(&MatchConfig::default()).unwrap();
//! assert_eq!(pairs.len(), 1);
//! ```

pub mod config;
mod document;
mod index;

pub use canonical::{
    collapse_whitespace, is_punctuation, normalize, normalize_text, tokenize, CanonicalError,
    NormalizeConfig, PunctuationClass,
};
pub use matcher::{
    find_duplicates, jaccard, DuplicateFinder, DuplicatePair, LshIndex, MatchConfig, MatchError,
    MatchStrategy, MinHashSignature, MinHasher,
};
pub use perceptual::{
    shingle_hash, shingles, shingles_from_tokens, window_count, ShingleConfig, ShingleError,
    ShingleFingerprint, ShingleMeta, ShingleSet, ShingleWindows, DEFAULT_SHINGLE_SIZE,
    MIN_SHINGLE_SIZE,
};

pub use crate::config::{ConfigLoadError, FieldsConfig, ShinglefpConfig};
pub use crate::document::{Document, DocumentText};
pub use crate::index::{
    build_index, CancellationToken, CorpusShingleIndex, DocumentFailure, FailureStage,
    IndexBuild, IndexBuilder, IndexReport,
};

use thiserror::Error;

/// Errors surfaced by the pipeline entry points.
///
/// Configuration problems are reported here before any document is touched.
/// Problems with a single document are not errors; they are collected as
/// [`DocumentFailure`]s in the build report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("normalization failure: {0}")]
    Canonical(#[from] CanonicalError),

    #[error("shingle failure: {0}")]
    Shingle(#[from] ShingleError),

    #[error("match failure: {0}")]
    Match(#[from] MatchError),
}

/// Normalize `text` and compute its shingle fingerprint.
pub fn fingerprint_document(
    text: &str,
    normalize_cfg: &NormalizeConfig,
    shingle_cfg: &ShingleConfig,
) -> Result<ShingleFingerprint, PipelineError> {
    normalize_cfg.validate()?;
    Ok(perceptual::fingerprint_text(text, normalize_cfg, shingle_cfg)?)
}

/// Like [`fingerprint_document`], also returning the normalized text and
/// keeping every shingle string for inspection.
pub fn fingerprint_document_verbose(
    text: &str,
    normalize_cfg: &NormalizeConfig,
    shingle_cfg: &ShingleConfig,
) -> Result<(String, ShingleFingerprint), PipelineError> {
    normalize_cfg.validate()?;
    let normalized = normalize(text, normalize_cfg);
    let fingerprint = {
        let tokens = tokenize(&normalized);
        perceptual::fingerprint_tokens_verbose(&tokens, shingle_cfg)?
    };
    Ok((normalized, fingerprint))
}
