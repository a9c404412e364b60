//! Shuffle helpers
//!
//! Fisher-Yates shuffling that can pin one track in place, plus the uniform
//! index draw used by shuffled navigation.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `items` in place, keeping the element at `fixed` where it is
///
/// Every other element is shuffled among the remaining slots. With
/// `fixed == None` (or out of range) the whole slice is shuffled.
pub fn shuffle_around<T, R: Rng + ?Sized>(items: &mut Vec<T>, fixed: Option<usize>, rng: &mut R) {
    match fixed.filter(|&index| index < items.len()) {
        Some(index) => {
            let pinned = items.remove(index);
            items.shuffle(rng);
            items.insert(index, pinned);
        }
        None => items.shuffle(rng),
    }
}

/// Uniform index in `[0, len)`
///
/// `len` must be non-zero.
pub fn random_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    rng.gen_range(0..len)
}
