//! # Shingle matcher (`matcher`)
//!
//! Reference consumer of shingle-set fingerprints. It implements the
//! similarity contract every downstream scorer must honor:
//!
//! - Pairwise similarity is the Jaccard index of two shingle sets, with
//!   `0.0` whenever either set is empty (never NaN, never "identical").
//! - For corpora too large for all pairs, sets are compressed to MinHash
//!   signatures and bucketed with LSH banding to find candidate pairs; exact
//!   Jaccard is recomputed on every candidate before the threshold applies.
//!
//! ## Core types
//!
//! - [`MatchConfig`]: strategy, banding, seed and threshold.
//! - [`MinHasher`] / [`MinHashSignature`]: fixed-length signatures.
//! - [`LshIndex`]: banding buckets over signatures.
//! - [`DuplicateFinder`]: runs the search and returns [`DuplicatePair`]s.
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use matcher::{DuplicateFinder, MatchConfig};
//! use perceptual::shingles;
//!
//! let mut docs = HashMap::new();
//! docs.insert(1u64, shingles("great doctor very patient and kind", 3).unwrap());
//! docs.insert(2u64, shingles("great doctor very patient and kind", 3).unwrap());
//!
//! let finder = DuplicateFinder::new(MatchConfig::default()).unwrap();
//! let pairs = finder.find_duplicates(&docs).unwrap();
//! assert_eq!(pairs.len(), 1);
//! assert_eq!(pairs[0].similarity, 1.0);
//! ```

pub mod engine;
pub mod lsh;
pub mod minhash;
pub mod similarity;
pub mod types;

pub use crate::engine::{find_duplicates, DuplicateFinder};
pub use crate::lsh::LshIndex;
pub use crate::minhash::{MinHashSignature, MinHasher};
pub use crate::similarity::jaccard;
pub use crate::types::{DuplicatePair, MatchConfig, MatchError, MatchStrategy};
