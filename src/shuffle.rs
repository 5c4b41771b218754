//! Fisher–Yates shuffle used to order quiz rounds.

use crate::prng::Pcg32;

/// Shuffle `items` in place.
///
/// Walks from the back, swapping each slot with a uniformly chosen
/// slot at or before it. Every permutation is equally likely.
pub fn shuffle<T>(items: &mut [T], rng: &mut Pcg32) {
    for i in (1..items.len()).rev() {
        let j = rng.next_below(i as u32 + 1) as usize;
        items.swap(i, j);
    }
}

/// Return a shuffled copy of `items`.
pub fn shuffled<T: Clone>(items: &[T], rng: &mut Pcg32) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle(&mut out, rng);
    out
}
