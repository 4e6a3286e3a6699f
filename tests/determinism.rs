use shinglefp::{
    build_index, fingerprint_document, normalize, shingle_hash, shingles, NormalizeConfig,
    ShingleConfig, ShingleSet,
};

fn shingle_cfg(k: usize) -> ShingleConfig {
    ShingleConfig::new().with_shingle_size(k)
}

#[test]
fn fingerprints_equivalent_inputs_match() {
    let cfg = shingle_cfg(2);
    let normalize_cfg = NormalizeConfig::default();

    let fp_a = fingerprint_document(" Hello   world!  ", &normalize_cfg, &cfg)
        .expect("first fingerprint");
    let fp_b = fingerprint_document("hello WORLD!", &normalize_cfg, &cfg)
        .expect("second fingerprint");

    assert_eq!(fp_a.set, fp_b.set);
    assert_eq!(fp_a.meta, fp_b.meta);
}

#[test]
fn repeated_calls_are_identical() {
    let text = normalize(
        "It was the best of times, it was the worst of times.",
        &NormalizeConfig::default(),
    );
    let first = shingles(&text, 4).unwrap();
    for _ in 0..50 {
        assert_eq!(shingles(&text, 4).unwrap(), first);
    }
}

#[test]
fn hashes_are_stable_crc32_values() {
    // Reference values of the standard CRC-32 (IEEE) checksum.
    assert_eq!(shingle_hash(""), 0);
    assert_eq!(shingle_hash("123456789"), 0xCBF4_3926);
    assert_eq!(
        shingle_hash("The quick brown fox jumps over the lazy dog"),
        0x414F_A339
    );
}

#[test]
fn set_ignores_repeated_shingles() {
    // Repeated shingle text collapses; only the distinct shingles count.
    let a = shingles("a b a b", 2).unwrap();
    let b = shingles("b a b a", 2).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}

#[test]
fn colliding_shingles_share_one_hash() {
    // "plumless" and "buckeroo" have the same CRC-32.
    assert_eq!(shingle_hash("plumless"), shingle_hash("buckeroo"));
    assert_eq!(shingle_hash("plumless"), 0x4DDB_0C25);

    let set = shingles("plumless buckeroo", 2).expect("collision is not an error");
    assert_eq!(set.len(), 1);
    assert!(set.contains(0x4DDB_0C25));
}

#[test]
fn greek_final_sigma_matches_lowercase_text() {
    let docs = vec![(1u32, "ΟΔΟΣ ΚΑΛΟΣ"), (2u32, "οδος καλος")];
    let index = build_index(docs, 2).unwrap();

    assert_eq!(index.similarity(&1, &2), Some(1.0));
    assert!(index.get(&1).unwrap().contains(shingle_hash("οδος")));
}

#[test]
fn index_is_identical_across_runs() {
    let docs: Vec<(u32, String)> = (0..100)
        .map(|i| (i, format!("response {} mentions delivery {} times", i % 7, i % 3)))
        .collect();

    let first = build_index(docs.clone(), 3).unwrap();
    let second = build_index(docs, 3).unwrap();
    assert_eq!(first, second);
}

#[test]
fn shingle_size_changes_fingerprint() {
    let text = "one two three four five six";
    let k3: ShingleSet = shingles(text, 3).unwrap();
    let k4: ShingleSet = shingles(text, 4).unwrap();
    assert_eq!(k3.len(), 5);
    assert_eq!(k4.len(), 4);
    assert_eq!(k3.intersection_len(&k4), 0);
}
