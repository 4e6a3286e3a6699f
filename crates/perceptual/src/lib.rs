//! # Shingle fingerprinting
//!
//! This crate turns normalized text into a document fingerprint: the set of
//! CRC-32 hashes of its overlapping word shingles.
//!
//! ## Contract
//!
//! - Input is normalized text (single-spaced tokens) or an ordered token
//!   slice. This crate never normalizes unless the `with_canonical` feature
//!   entry points are used.
//! - The API is a pure function of `(tokens, config)`: no I/O, no clocks,
//!   no global state. Documents can be fingerprinted on any thread.
//!
//! Invariant: for the same token sequence and the same shingle size, the
//! shingle set is identical across calls, threads and processes.
//!
//! ## Shingle size vs. window width
//!
//! A configured shingle size `k` produces shingles of `k - 1` tokens. The
//! offset is part of the fingerprint scheme and is kept so that sets stay
//! comparable with fingerprints produced elsewhere under the same scheme.
//!
//! ## Example
//!
//! ```
//! use perceptual::{shingles, shingle_hash};
//!
//! let set = shingles("the quick brown fox", 3).unwrap();
//! assert_eq!(set.len(), 3);
//! assert!(set.contains(shingle_hash("brown fox")));
//! ```

pub mod config;
pub mod fingerprint;
mod shingles;

pub use crate::config::{
    validate_shingle_size, ShingleConfig, ShingleError, DEFAULT_SHINGLE_SIZE, MIN_SHINGLE_SIZE,
};
pub use crate::fingerprint::{ShingleFingerprint, ShingleMeta, ShingleSet};
pub use crate::shingles::{
    hash_window, make_shingle_set, shingle_hash, window_count, ShingleWindows,
};

/// Current shingle algorithm version for this crate.
pub const SHINGLE_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const SHINGLE_ALGORITHM: &str = "crc32_word_shingles_v1";

/// Shingle set of normalized text for shingle size `k`.
///
/// `normalized_text` is split on single spaces. Text shorter than `k - 1`
/// tokens yields an empty set. Fails only when `k < 2`.
pub fn shingles(normalized_text: &str, k: usize) -> Result<ShingleSet, ShingleError> {
    let tokens: Vec<&str> = normalized_text
        .split(' ')
        .filter(|t| !t.is_empty())
        .collect();
    shingles_from_tokens(&tokens, k)
}

/// Shingle set of an ordered token slice for shingle size `k`.
pub fn shingles_from_tokens<S: AsRef<str>>(
    tokens: &[S],
    k: usize,
) -> Result<ShingleSet, ShingleError> {
    validate_shingle_size(k)?;
    Ok(make_shingle_set(tokens, k - 1))
}

/// Compute a shingle fingerprint with metadata.
pub fn fingerprint_tokens<S: AsRef<str>>(
    tokens: &[S],
    cfg: &ShingleConfig,
) -> Result<ShingleFingerprint, ShingleError> {
    cfg.validate()?;
    let width = cfg.window_width();
    Ok(ShingleFingerprint {
        set: make_shingle_set(tokens, width),
        shingle_texts: Vec::new(),
        meta: meta_for(tokens.len(), cfg),
    })
}

/// Like [`fingerprint_tokens`], also keeping every shingle string in window order.
pub fn fingerprint_tokens_verbose<S: AsRef<str>>(
    tokens: &[S],
    cfg: &ShingleConfig,
) -> Result<ShingleFingerprint, ShingleError> {
    cfg.validate()?;
    let width = cfg.window_width();
    let shingle_texts: Vec<String> = ShingleWindows::new(tokens, width).collect();
    let set = shingle_texts.iter().map(|s| shingle_hash(s)).collect();
    Ok(ShingleFingerprint {
        set,
        shingle_texts,
        meta: meta_for(tokens.len(), cfg),
    })
}

fn meta_for(tokens: usize, cfg: &ShingleConfig) -> ShingleMeta {
    let width = cfg.window_width();
    ShingleMeta {
        shingle_version: SHINGLE_VERSION,
        algorithm_name: SHINGLE_ALGORITHM.to_string(),
        shingle_size: cfg.shingle_size,
        window_width: width,
        tokens,
        windows: window_count(tokens, width),
        config_version: cfg.version,
    }
}

/// Normalize raw text and fingerprint it in one call.
#[cfg(feature = "with_canonical")]
pub fn fingerprint_text(
    text: &str,
    normalize_cfg: &canonical::NormalizeConfig,
    cfg: &ShingleConfig,
) -> Result<ShingleFingerprint, ShingleError> {
    let normalized = canonical::normalize(text, normalize_cfg);
    let tokens = canonical::tokenize(&normalized);
    fingerprint_tokens(&tokens, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn end_to_end_example() {
        let set = shingles("the quick brown fox", 3).unwrap();
        let expected: ShingleSet = ["the quick", "quick brown", "brown fox"]
            .iter()
            .map(|s| shingle_hash(s))
            .collect();
        assert_eq!(set, expected);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn default_size_uses_four_token_windows() {
        let set = shingles("a b c d e", DEFAULT_SHINGLE_SIZE).unwrap();
        let expected: ShingleSet = [shingle_hash("a b c d"), shingle_hash("b c d e")]
            .into_iter()
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn short_document_yields_empty_set() {
        assert!(shingles("only three tokens", 5).unwrap().is_empty());
        assert!(shingles("", 2).unwrap().is_empty());
    }

    #[test]
    fn k_two_gives_single_token_shingles() {
        let set = shingles("spam spam eggs", 2).unwrap();
        let expected: ShingleSet = [shingle_hash("spam"), shingle_hash("eggs")]
            .into_iter()
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn hash_collisions_collapse_silently() {
        let set = shingles("plumless buckeroo", 2).unwrap();
        assert_eq!(shingle_hash("plumless"), shingle_hash("buckeroo"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn k_below_two_rejected() {
        for k in [0, 1] {
            assert_eq!(
                shingles("a b c", k),
                Err(ShingleError::InvalidShingleSize { k })
            );
        }
    }

    #[test]
    fn fingerprint_meta_reports_windows() {
        let tokens = ["a", "b", "c", "d", "e", "f"];
        let cfg = ShingleConfig::new().with_shingle_size(3);
        let fp = fingerprint_tokens(&tokens, &cfg).unwrap();
        assert_eq!(fp.meta.shingle_size, 3);
        assert_eq!(fp.meta.window_width, 2);
        assert_eq!(fp.meta.tokens, 6);
        assert_eq!(fp.meta.windows, 5);
        assert_eq!(fp.meta.algorithm_name, SHINGLE_ALGORITHM);
        assert!(fp.shingle_texts.is_empty());
    }

    #[test]
    fn verbose_fingerprint_matches_plain() {
        let tokens = ["x", "y", "x", "y"];
        let cfg = ShingleConfig::new().with_shingle_size(3);
        let plain = fingerprint_tokens(&tokens, &cfg).unwrap();
        let verbose = fingerprint_tokens_verbose(&tokens, &cfg).unwrap();
        assert_eq!(plain.set, verbose.set);
        assert_eq!(verbose.shingle_texts, vec!["x y", "y x", "x y"]);
    }

    #[test]
    fn fingerprint_rejects_invalid_config() {
        let cfg = ShingleConfig::new().with_shingle_size(1);
        assert!(matches!(
            fingerprint_tokens(&["a"], &cfg),
            Err(ShingleError::InvalidShingleSize { k: 1 })
        ));
    }

    #[cfg(feature = "with_canonical")]
    #[test]
    fn fingerprint_text_normalizes_first() {
        let cfg = ShingleConfig::new().with_shingle_size(3);
        let ncfg = canonical::NormalizeConfig::default();
        let a = fingerprint_text("The quick brown fox.", &ncfg, &cfg).unwrap();
        let b = fingerprint_text("the quick brown fox", &ncfg, &cfg).unwrap();
        assert_eq!(a.set, b.set);
    }

    proptest! {
        #[test]
        fn set_size_bounded_by_window_count(
            tokens in prop::collection::vec("[a-d]{1,2}", 0..40),
            k in 2usize..7,
        ) {
            let set = shingles_from_tokens(&tokens, k).unwrap();
            let windows = window_count(tokens.len(), k - 1);
            prop_assert!(set.len() <= windows);
            let distinct: std::collections::HashSet<String> =
                ShingleWindows::new(&tokens, k - 1).collect();
            prop_assert!(set.len() <= distinct.len());
            prop_assert_eq!(set.is_empty(), tokens.len() < k - 1);
        }

        #[test]
        fn text_and_token_entry_points_agree(
            tokens in prop::collection::vec("[a-z]{1,6}", 0..30),
            k in 2usize..6,
        ) {
            let text = tokens.join(" ");
            prop_assert_eq!(
                shingles(&text, k).unwrap(),
                shingles_from_tokens(&tokens, k).unwrap()
            );
        }
    }
}
