use std::borrow::Cow;

use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::config::{NormalizeConfig, PunctuationClass};
use crate::whitespace::collapse_whitespace;

/// Main entry point. Folds raw text into the single-spaced, punctuation-free
/// form that the shingle stage tokenizes.
///
/// Punctuation is replaced by a space rather than deleted, so `"fox.jumps"`
/// becomes `"fox jumps"` and never `"foxjumps"`. The function is pure and
/// safe to call concurrently on independent inputs.
///
/// ```rust
/// use canonical::{normalize, NormalizeConfig};
///
/// let cfg = NormalizeConfig::default();
/// assert_eq!(normalize("The  quick, brown FOX.", &cfg), "the quick brown fox");
/// ```
pub fn normalize(text: &str, cfg: &NormalizeConfig) -> String {
    // NFKC may change character boundaries, so it runs before anything else.
    let source: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(text.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(text)
    };

    // Whole-string lowercasing, so a word-final 'Σ' becomes 'ς'.
    let source: Cow<str> = if cfg.lowercase {
        Cow::Owned(source.to_lowercase())
    } else {
        source
    };

    let spaced: String = source
        .chars()
        .map(|ch| if is_punctuation(ch, cfg.punctuation) { ' ' } else { ch })
        .collect();

    collapse_whitespace(&spaced)
}

/// [`normalize`] with the default configuration.
pub fn normalize_text(text: &str) -> String {
    normalize(text, &NormalizeConfig::default())
}

/// Returns true when `ch` is replaced by a space under `class`.
pub fn is_punctuation(ch: char, class: PunctuationClass) -> bool {
    match class {
        PunctuationClass::Ascii => ch.is_ascii_punctuation(),
        PunctuationClass::Unicode => ch.is_ascii_punctuation() || ch.is_punctuation(),
    }
}
