//! Exact set similarity over shingle sets.

use perceptual::ShingleSet;

/// Jaccard index `|A ∩ B| / |A ∪ B|`.
///
/// An empty set has similarity `0.0` against every set, including another
/// empty set. The result is never NaN.
///
/// ```
/// use matcher::jaccard;
/// use perceptual::ShingleSet;
///
/// let a: ShingleSet = [1u32, 2, 3].into_iter().collect();
/// let b: ShingleSet = [2u32, 3, 4].into_iter().collect();
/// assert_eq!(jaccard(&a, &b), 0.5);
/// assert_eq!(jaccard(&ShingleSet::new(), &ShingleSet::new()), 0.0);
/// ```
pub fn jaccard(a: &ShingleSet, b: &ShingleSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection_len(b);
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}
