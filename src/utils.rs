//! Utility functions for the matchbox crate

use rand::Rng;

/// Performs weighted random sampling over integer-weighted items.
///
/// Draws a threshold in `[0, total)` and walks the items in the order given,
/// subtracting weights until the threshold crosses zero. Zero-weight items
/// can never be selected.
///
/// Callers that need reproducible draws must pass the items in a stable
/// order; the number of random values consumed is exactly one per call.
///
/// # Returns
///
/// - `Some(item)` if at least one item has positive weight
/// - `None` if the slice is empty or all weights are zero
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use matchbox::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let items = vec![(0usize, 1u32), (4, 2), (8, 1)];
/// assert!(weighted_sample(&mut rng, &items).is_some());
/// ```
pub fn weighted_sample<R, T>(rng: &mut R, items: &[(T, u32)]) -> Option<T>
where
    R: Rng,
    T: Copy,
{
    let total: u64 = items.iter().map(|(_, w)| u64::from(*w)).sum();
    if total == 0 {
        return None;
    }

    let mut threshold = rng.random_range(0..total);
    for (item, weight) in items {
        let w = u64::from(*weight);
        if threshold < w {
            return Some(*item);
        }
        threshold -= w;
    }

    // Unreachable given threshold < total, kept for arithmetic safety.
    items.last().map(|(item, _)| *item)
}
