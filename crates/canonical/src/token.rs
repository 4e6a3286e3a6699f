/// Splits normalized text into its ordered tokens.
///
/// The input is expected to come from [`normalize`](crate::normalize), i.e.
/// tokens separated by exactly one ASCII space. Empty segments are skipped,
/// so empty text yields no tokens rather than one empty token.
///
/// ```rust
/// use canonical::tokenize;
///
/// assert_eq!(tokenize("the quick brown fox"), vec!["the", "quick", "brown", "fox"]);
/// assert!(tokenize("").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(' ').filter(|t| !t.is_empty()).collect()
}
