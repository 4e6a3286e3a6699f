//! MinHash signatures over shingle sets.
//!
//! Fixed-length signatures whose slot-agreement rate estimates the Jaccard
//! index of the underlying sets. The permutation family is derived from a
//! single 64-bit seed, so signatures are deterministic for `(set, seed, len)`.

use perceptual::ShingleSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::types::MatchError;

/// Fixed-length MinHash signature of one shingle set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinHashSignature {
    /// Minimum permuted hash per slot. `u64::MAX` in every slot for an
    /// empty set.
    pub values: Vec<u64>,
    /// Size of the set the signature was computed from.
    pub set_len: usize,
}

impl MinHashSignature {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when the source shingle set was empty.
    pub fn is_from_empty_set(&self) -> bool {
        self.set_len == 0
    }

    /// Estimated Jaccard similarity: the fraction of agreeing slots.
    ///
    /// Follows the exact-Jaccard convention for empty sets: `0.0` if either
    /// source set was empty.
    pub fn estimate_similarity(&self, other: &MinHashSignature) -> Result<f64, MatchError> {
        if self.values.len() != other.values.len() {
            return Err(MatchError::SignatureLengthMismatch {
                expected: self.values.len(),
                got: other.values.len(),
            });
        }
        if self.is_from_empty_set() || other.is_from_empty_set() || self.values.is_empty() {
            return Ok(0.0);
        }
        let agree = self
            .values
            .iter()
            .zip(&other.values)
            .filter(|(a, b)| a == b)
            .count();
        Ok(agree as f64 / self.values.len() as f64)
    }
}

/// MinHash signature generator for a fixed `(len, seed)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinHasher {
    keys: Vec<u64>,
    use_parallel: bool,
}

impl MinHasher {
    /// Create a generator for `len`-slot signatures.
    pub fn new(len: usize, seed: u64) -> Self {
        let keys = (0..len).map(|j| slot_key(seed, j)).collect();
        Self {
            keys,
            use_parallel: false,
        }
    }

    /// Compute slots on the rayon pool. Output is identical either way.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Signature length.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compute the signature of `set`. Independent of set iteration order.
    pub fn signature(&self, set: &ShingleSet) -> MinHashSignature {
        if set.is_empty() {
            return MinHashSignature {
                values: vec![u64::MAX; self.keys.len()],
                set_len: 0,
            };
        }

        let hashes: Vec<u32> = set.iter().copied().collect();
        let mut values = Vec::with_capacity(self.keys.len());
        if self.use_parallel {
            self.keys
                .par_iter()
                .map(|&key| compute_slot(&hashes, key))
                .collect_into_vec(&mut values);
        } else {
            values.extend(self.keys.iter().map(|&key| compute_slot(&hashes, key)));
        }

        MinHashSignature {
            values,
            set_len: set.len(),
        }
    }
}

/// Per-slot permutation key.
#[inline]
fn slot_key(seed: u64, j: usize) -> u64 {
    let step = (j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    splitmix64(seed.wrapping_add(step))
}

/// Minimum of the permuted hashes of every shingle for one slot.
#[inline]
pub(crate) fn compute_slot(hashes: &[u32], key: u64) -> u64 {
    let mut minv = u64::MAX;
    for &val in hashes {
        let h = mix_u32(val, key);
        if h < minv {
            minv = h;
        }
    }
    minv
}

#[inline]
pub(crate) fn mix_u32(x: u32, key: u64) -> u64 {
    let mut h = xxh3_64_with_seed(&x.to_le_bytes(), key);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
    h ^ (h >> 33)
}

#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
