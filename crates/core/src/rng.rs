//! Bounded integer sampling used by the question generator.

use rand::Rng;

/// Samples an integer uniformly from `[min, max]`, both ends inclusive.
///
/// An inverted range (`max < min`) yields `min`. Callers that build ranges from
/// other random draws rely on their own validation to reject such candidates.
pub fn random_in<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max < min {
        return min;
    }
    rng.random_range(min..=max)
}

/// Fair coin flip.
pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random_bool(0.5)
}
