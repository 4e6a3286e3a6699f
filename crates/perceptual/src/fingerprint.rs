//! Shingle set and fingerprint metadata types.
//!
//! The shingle set is the handoff artifact to any similarity stage. Its
//! schema is part of the public contract: any change to how hashes are
//! derived must bump [`crate::SHINGLE_VERSION`].

use std::collections::hash_set;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Set of distinct 32-bit shingle hashes for one document.
///
/// Set semantics are required for Jaccard-style comparison: inserting a hash
/// that is already present changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShingleSet {
    hashes: HashSet<u32>,
}

impl ShingleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hashes: HashSet::with_capacity(capacity),
        }
    }

    /// Insert a hash. Returns `false` if it was already present.
    pub fn insert(&mut self, hash: u32) -> bool {
        self.hashes.insert(hash)
    }

    pub fn contains(&self, hash: u32) -> bool {
        self.hashes.contains(&hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, u32> {
        self.hashes.iter()
    }

    /// Number of hashes present in both sets.
    pub fn intersection_len(&self, other: &ShingleSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().filter(|h| large.contains(**h)).count()
    }

    /// Number of hashes present in either set.
    pub fn union_len(&self, other: &ShingleSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }

    /// Hashes in ascending order, for stable output.
    pub fn to_sorted_vec(&self) -> Vec<u32> {
        let mut out: Vec<u32> = self.hashes.iter().copied().collect();
        out.sort_unstable();
        out
    }

    pub fn as_hash_set(&self) -> &HashSet<u32> {
        &self.hashes
    }

    pub fn into_hash_set(self) -> HashSet<u32> {
        self.hashes
    }
}

impl From<HashSet<u32>> for ShingleSet {
    fn from(hashes: HashSet<u32>) -> Self {
        Self { hashes }
    }
}

impl FromIterator<u32> for ShingleSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Self {
            hashes: iter.into_iter().collect(),
        }
    }
}

impl Extend<u32> for ShingleSet {
    fn extend<T: IntoIterator<Item = u32>>(&mut self, iter: T) {
        self.hashes.extend(iter);
    }
}

impl IntoIterator for ShingleSet {
    type Item = u32;
    type IntoIter = hash_set::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.hashes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ShingleSet {
    type Item = &'a u32;
    type IntoIter = hash_set::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.hashes.iter()
    }
}

/// Shingle set plus the metadata needed to tell which scheme produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShingleFingerprint {
    pub set: ShingleSet,
    /// Shingle strings in window order, including repeats.
    ///
    /// Only filled by the verbose entry points; empty otherwise.
    pub shingle_texts: Vec<String>,
    pub meta: ShingleMeta,
}

/// Metadata for traceability and determinism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShingleMeta {
    /// Shingle algorithm version owned by this crate.
    pub shingle_version: u16,
    /// Human-readable algorithm identifier.
    pub algorithm_name: String,
    /// Configured shingle size `k`.
    pub shingle_size: usize,
    /// Tokens per shingle, `k - 1`.
    pub window_width: usize,
    /// Number of tokens in the document.
    pub tokens: usize,
    /// Number of windows attempted, `max(0, tokens - width + 1)`.
    pub windows: usize,
    /// Configuration schema version supplied by the caller.
    pub config_version: u32,
}
