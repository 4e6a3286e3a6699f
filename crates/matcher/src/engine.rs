use std::time::Instant;

use perceptual::ShingleSet;
use rayon::prelude::*;
use tracing::debug;

use crate::lsh::LshIndex;
use crate::minhash::{MinHashSignature, MinHasher};
use crate::similarity::jaccard;
use crate::types::{DuplicatePair, MatchConfig, MatchError, MatchStrategy};

#[cfg(test)]
mod tests;

/// Near-duplicate search over a corpus of shingle sets.
///
/// Candidates come either from all pairs or from LSH banding; every reported
/// pair is re-scored with exact Jaccard before the threshold is applied, so
/// LSH only ever costs recall, never precision.
#[derive(Debug, Clone)]
pub struct DuplicateFinder {
    cfg: MatchConfig,
    hasher: MinHasher,
}

impl DuplicateFinder {
    pub fn new(cfg: MatchConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        let hasher =
            MinHasher::new(cfg.signature_len()?, cfg.seed).with_parallel(cfg.use_parallel);
        Ok(Self { cfg, hasher })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Signature generator matching this finder's configuration.
    pub fn hasher(&self) -> &MinHasher {
        &self.hasher
    }

    /// All pairs with exact Jaccard similarity >= the configured threshold.
    ///
    /// Pairs are ordered by descending similarity, then ascending ids. Each
    /// pair appears once with `left < right`.
    pub fn find_duplicates<'a, I, It>(
        &self,
        docs: It,
    ) -> Result<Vec<DuplicatePair<I>>, MatchError>
    where
        I: Ord + Clone + Sync + 'a,
        It: IntoIterator<Item = (&'a I, &'a ShingleSet)>,
    {
        let start = Instant::now();
        let mut docs: Vec<(&I, &ShingleSet)> = docs.into_iter().collect();
        docs.sort_by(|a, b| a.0.cmp(b.0));

        let candidates = match self.cfg.strategy {
            MatchStrategy::Exhaustive => all_pairs(&docs),
            MatchStrategy::Lsh => self.lsh_pairs(&docs)?,
        };
        let candidate_count = candidates.len();

        let mut pairs: Vec<DuplicatePair<I>> = candidates
            .into_iter()
            .filter_map(|(i, j)| {
                let similarity = jaccard(docs[i].1, docs[j].1);
                (similarity >= self.cfg.threshold).then(|| DuplicatePair {
                    left: docs[i].0.clone(),
                    right: docs[j].0.clone(),
                    similarity,
                })
            })
            .collect();

        pairs.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.left.cmp(&b.left))
                .then_with(|| a.right.cmp(&b.right))
        });

        debug!(
            documents = docs.len(),
            strategy = ?self.cfg.strategy,
            candidates = candidate_count,
            duplicates = pairs.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "find_duplicates"
        );
        Ok(pairs)
    }

    /// Documents whose exact similarity to `query` meets the threshold,
    /// best first.
    pub fn match_against<'a, I, It>(&self, query: &ShingleSet, docs: It) -> Vec<(I, f64)>
    where
        I: Ord + Clone + 'a,
        It: IntoIterator<Item = (&'a I, &'a ShingleSet)>,
    {
        let mut hits: Vec<(I, f64)> = docs
            .into_iter()
            .filter_map(|(id, set)| {
                let similarity = jaccard(query, set);
                (similarity >= self.cfg.threshold).then(|| (id.clone(), similarity))
            })
            .collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        hits
    }

    fn lsh_pairs<I: Sync>(
        &self,
        docs: &[(&I, &ShingleSet)],
    ) -> Result<Vec<(usize, usize)>, MatchError> {
        let signatures: Vec<MinHashSignature> = if self.cfg.use_parallel {
            docs.par_iter()
                .map(|(_, set)| self.hasher.signature(set))
                .collect()
        } else {
            docs.iter()
                .map(|(_, set)| self.hasher.signature(set))
                .collect()
        };

        let mut lsh = LshIndex::new(self.cfg.bands, self.cfg.rows_per_band)?;
        for signature in &signatures {
            lsh.insert(signature)?;
        }
        Ok(lsh.candidate_pairs())
    }
}

fn all_pairs<I>(docs: &[(&I, &ShingleSet)]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..docs.len() {
        if docs[i].1.is_empty() {
            continue;
        }
        for j in (i + 1)..docs.len() {
            if !docs[j].1.is_empty() {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// One-shot helper: validate `cfg` and search `docs`.
pub fn find_duplicates<'a, I, It>(
    docs: It,
    cfg: &MatchConfig,
) -> Result<Vec<DuplicatePair<I>>, MatchError>
where
    I: Ord + Clone + Sync + 'a,
    It: IntoIterator<Item = (&'a I, &'a ShingleSet)>,
{
    DuplicateFinder::new(cfg.clone())?.find_duplicates(docs)
}
