use super::*;
use std::collections::{BTreeMap, HashMap};

use perceptual::{shingles, ShingleSet};

fn corpus(texts: &[(u32, &str)], k: usize) -> HashMap<u32, ShingleSet> {
    texts
        .iter()
        .map(|&(id, text)| (id, shingles(text, k).expect("valid k")))
        .collect()
}

fn exhaustive(threshold: f64) -> DuplicateFinder {
    DuplicateFinder::new(
        MatchConfig::new()
            .with_strategy(MatchStrategy::Exhaustive)
            .with_threshold(threshold),
    )
    .expect("valid config")
}

#[test]
fn new_rejects_invalid_config() {
    let err = DuplicateFinder::new(MatchConfig::new().with_threshold(0.0)).unwrap_err();
    assert!(matches!(err, MatchError::InvalidThreshold { .. }));
}

#[test]
fn identical_documents_pair_with_similarity_one() {
    let docs = corpus(
        &[(1, "the quick brown fox"), (2, "the quick brown fox")],
        3,
    );
    let pairs = exhaustive(0.9).find_duplicates(&docs).unwrap();
    assert_eq!(
        pairs,
        vec![DuplicatePair {
            left: 1,
            right: 2,
            similarity: 1.0
        }]
    );
}

#[test]
fn empty_sets_never_pair() {
    let docs = corpus(&[(1, "too short"), (2, "too short")], 5);
    assert!(docs.values().all(ShingleSet::is_empty));
    assert!(exhaustive(0.01).find_duplicates(&docs).unwrap().is_empty());
}

#[test]
fn threshold_filters_pairs() {
    // "a b c d e" vs "a b c d f" at k=3: {ab,bc,cd,de} vs {ab,bc,cd,df} -> 3/5
    let docs = corpus(&[(1, "a b c d e"), (2, "a b c d f"), (3, "x y z w v")], 3);
    let loose = exhaustive(0.5).find_duplicates(&docs).unwrap();
    assert_eq!(loose.len(), 1);
    assert!((loose[0].similarity - 0.6).abs() < 1e-12);
    assert!(exhaustive(0.7).find_duplicates(&docs).unwrap().is_empty());
}

#[test]
fn pairs_sorted_by_similarity_then_id() {
    let docs = corpus(
        &[
            (4, "a b c d e"),
            (3, "a b c d f"),
            (2, "m n o p"),
            (1, "m n o p"),
        ],
        3,
    );
    let pairs = exhaustive(0.5).find_duplicates(&docs).unwrap();
    let ids: Vec<(u32, u32)> = pairs.iter().map(|p| (p.left, p.right)).collect();
    assert_eq!(ids, vec![(1, 2), (3, 4)]);
    assert!(pairs.iter().all(|p| p.left < p.right));
}

#[test]
fn lsh_finds_same_duplicates_as_exhaustive_for_clear_cases() {
    let base = "please call me back about the appointment tomorrow morning thanks a lot doctor";
    let docs = corpus(
        &[
            (10, base),
            (11, base),
            (12, "completely unrelated review about parking and the waiting room being cold"),
            (13, "the doctor was great and explained everything about my treatment plan clearly"),
        ],
        5,
    );
    let exact = exhaustive(0.8).find_duplicates(&docs).unwrap();
    let lsh = DuplicateFinder::new(MatchConfig::new().with_threshold(0.8))
        .unwrap()
        .find_duplicates(&docs)
        .unwrap();
    assert_eq!(exact, lsh);
    assert_eq!(exact.len(), 1);
    assert_eq!((exact[0].left, exact[0].right), (10, 11));
}

#[test]
fn lsh_never_reports_below_threshold() {
    let docs = corpus(
        &[(1, "a b c d e f g h"), (2, "a b c d x y z w"), (3, "a b c d e f g h")],
        3,
    );
    let pairs = DuplicateFinder::new(MatchConfig::new().with_threshold(0.9))
        .unwrap()
        .find_duplicates(&docs)
        .unwrap();
    assert!(pairs.iter().all(|p| p.similarity >= 0.9));
}

#[test]
fn parallel_signatures_match_sequential() {
    let docs: BTreeMap<u32, ShingleSet> = (0u32..40)
        .map(|i| {
            let text = format!("shared prefix words here and there item {}", i % 10);
            (i, shingles(&text, 3).unwrap())
        })
        .collect();
    let seq = DuplicateFinder::new(MatchConfig::new().with_threshold(0.5))
        .unwrap()
        .find_duplicates(&docs)
        .unwrap();
    let par = DuplicateFinder::new(MatchConfig::new().with_threshold(0.5).with_parallel(true))
        .unwrap()
        .find_duplicates(&docs)
        .unwrap();
    assert_eq!(seq, par);
    assert!(!seq.is_empty());
}

#[test]
fn match_against_ranks_hits() {
    let docs = corpus(&[(1, "a b c d e"), (2, "a b c d f"), (3, "q r s t")], 3);
    let query = shingles("a b c d e", 3).unwrap();
    let hits = exhaustive(0.5).match_against(&query, &docs);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0], (1, 1.0));
    assert_eq!(hits[1].0, 2);
}

#[test]
fn one_shot_helper_validates() {
    let docs: HashMap<u32, ShingleSet> = HashMap::new();
    let bad = MatchConfig::new().with_banding(0, 1);
    assert!(find_duplicates(&docs, &bad).is_err());
    assert!(find_duplicates(&docs, &MatchConfig::default())
        .unwrap()
        .is_empty());
}
