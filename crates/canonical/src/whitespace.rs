//! Whitespace normalization utilities.
//!
//! Whitespace follows Unicode's definition (`char::is_whitespace`), so tabs,
//! newlines, carriage returns and non-breaking spaces all act as separators.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  hello \t\n  world  "), "hello world");
//! ```

/// Collapses runs of whitespace to a single ASCII space and trims both ends.
///
/// Returns an empty string for empty or whitespace-only input. Already
/// collapsed text is returned unchanged.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("hello\r\nworld"), "hello world");
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
