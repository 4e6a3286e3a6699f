//! Sliding-window word shingles and their CRC-32 hashes.
//!
//! A shingle is `width` consecutive tokens joined by single spaces. Each
//! shingle is hashed as the CRC-32 of its UTF-8 bytes. Both the window walk
//! and the hashing run in O(total token bytes).

use crate::fingerprint::ShingleSet;

/// CRC-32 of a shingle string's UTF-8 bytes.
///
/// Distinct shingle strings may collide; that is an accepted approximation.
#[inline]
pub fn shingle_hash(shingle: &str) -> u32 {
    crc32fast::hash(shingle.as_bytes())
}

/// CRC-32 of `window` joined by single spaces, without building the string.
///
/// Equal to `shingle_hash(&window.join(" "))`.
pub fn hash_window<S: AsRef<str>>(window: &[S]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    for (idx, token) in window.iter().enumerate() {
        if idx > 0 {
            hasher.update(b" ");
        }
        hasher.update(token.as_ref().as_bytes());
    }
    hasher.finalize()
}

/// Number of windows of `width` tokens over `n` tokens: `max(0, n - width + 1)`.
#[inline]
pub fn window_count(n: usize, width: usize) -> usize {
    if width == 0 || n < width {
        0
    } else {
        n - width + 1
    }
}

/// Iterator over the shingle strings of a token sequence, in window order.
///
/// Repeated shingles are yielded each time they occur.
#[derive(Debug, Clone)]
pub struct ShingleWindows<'a, S> {
    tokens: &'a [S],
    width: usize,
    next: usize,
}

impl<'a, S: AsRef<str>> ShingleWindows<'a, S> {
    pub fn new(tokens: &'a [S], width: usize) -> Self {
        Self {
            tokens,
            width,
            next: 0,
        }
    }
}

impl<S: AsRef<str>> Iterator for ShingleWindows<'_, S> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.width == 0 || self.next + self.width > self.tokens.len() {
            return None;
        }
        let window = &self.tokens[self.next..self.next + self.width];
        self.next += 1;

        let len = window.iter().map(|t| t.as_ref().len() + 1).sum::<usize>();
        let mut shingle = String::with_capacity(len);
        for token in window {
            shingle.push_str(token.as_ref());
            shingle.push(' ');
        }
        // Drop the separator after the last token.
        shingle.pop();
        Some(shingle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining =
            window_count(self.tokens.len(), self.width).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<S: AsRef<str>> ExactSizeIterator for ShingleWindows<'_, S> {}

/// Hash every `width`-token window of `tokens` into a set.
///
/// The caller must provide tokens in document order; `width` is the window
/// width (`k - 1`), not the shingle size.
pub fn make_shingle_set<S: AsRef<str>>(tokens: &[S], width: usize) -> ShingleSet {
    let windows = window_count(tokens.len(), width);
    let mut set = ShingleSet::with_capacity(windows);
    if windows == 0 {
        return set;
    }
    for window in tokens.windows(width) {
        set.insert(hash_window(window));
    }
    set
}
