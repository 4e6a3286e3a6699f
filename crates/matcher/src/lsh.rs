//! LSH banding over MinHash signatures.
//!
//! A signature of `bands * rows_per_band` slots is cut into `bands` chunks.
//! Two documents become a candidate pair when any band hashes to the same
//! bucket. Signatures of empty sets are never bucketed: they would all
//! collide, and their similarity is zero by definition.

use std::collections::{BTreeSet, HashMap};

use xxhash_rust::xxh3::xxh3_64;

use crate::minhash::MinHashSignature;
use crate::types::MatchError;

/// Banding index. Documents are referred to by insertion slot.
#[derive(Debug)]
pub struct LshIndex {
    bands: usize,
    rows_per_band: usize,
    buckets: Vec<HashMap<u64, Vec<usize>>>,
    len: usize,
}

impl LshIndex {
    pub fn new(bands: usize, rows_per_band: usize) -> Result<Self, MatchError> {
        if bands == 0 {
            return Err(MatchError::InvalidConfigBands { bands });
        }
        if rows_per_band == 0 {
            return Err(MatchError::InvalidConfigRows {
                rows: rows_per_band,
            });
        }
        Ok(Self {
            bands,
            rows_per_band,
            buckets: (0..bands).map(|_| HashMap::new()).collect(),
            len: 0,
        })
    }

    /// Expected signature length.
    pub fn signature_len(&self) -> usize {
        self.bands * self.rows_per_band
    }

    /// Number of inserted documents, including unbucketed empty ones.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a signature and return its slot.
    pub fn insert(&mut self, signature: &MinHashSignature) -> Result<usize, MatchError> {
        self.check_len(signature)?;
        let slot = self.len;
        self.len += 1;
        if signature.is_from_empty_set() {
            return Ok(slot);
        }
        for (band_idx, chunk) in signature.values.chunks(self.rows_per_band).enumerate() {
            self.buckets[band_idx]
                .entry(hash_band(chunk))
                .or_default()
                .push(slot);
        }
        Ok(slot)
    }

    /// Slots sharing at least one bucket with `signature`, ascending.
    pub fn query(&self, signature: &MinHashSignature) -> Result<Vec<usize>, MatchError> {
        self.check_len(signature)?;
        if signature.is_from_empty_set() {
            return Ok(Vec::new());
        }
        let mut candidates = BTreeSet::new();
        for (band_idx, chunk) in signature.values.chunks(self.rows_per_band).enumerate() {
            if let Some(slots) = self.buckets[band_idx].get(&hash_band(chunk)) {
                candidates.extend(slots.iter().copied());
            }
        }
        Ok(candidates.into_iter().collect())
    }

    /// Every unordered pair of slots sharing a bucket, as `(low, high)`,
    /// ascending and without repeats.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = BTreeSet::new();
        for table in &self.buckets {
            for slots in table.values() {
                for (i, &a) in slots.iter().enumerate() {
                    for &b in &slots[i + 1..] {
                        pairs.insert((a.min(b), a.max(b)));
                    }
                }
            }
        }
        pairs.into_iter().collect()
    }

    fn check_len(&self, signature: &MinHashSignature) -> Result<(), MatchError> {
        let expected = self.signature_len();
        if signature.len() != expected {
            return Err(MatchError::SignatureLengthMismatch {
                expected,
                got: signature.len(),
            });
        }
        Ok(())
    }
}

/// Stable band hash, independent of the process's `RandomState`.
fn hash_band(values: &[u64]) -> u64 {
    let mut bytes = Vec::with_capacity(values.len() * 8);
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    xxh3_64(&bytes)
}
