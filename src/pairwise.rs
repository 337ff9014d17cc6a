//! The two functions of the Glicko-2 paper evaluated per opponent. Both
//! operate on the internal scale only.

use std::f64::consts::PI;

/// Reduces the impact of a game according to the deviation of the opponent.
/// Decreasing in `deviation`, `1.0` for a perfectly known opponent.
#[inline]
pub(crate) fn g(deviation: f64) -> f64 {
    1.0 / (1.0 + 3.0 * deviation * deviation / (PI * PI)).sqrt()
}

/// Expected score of a player with `rating` against an opponent with
/// `opponent_rating` and `opponent_deviation`.
#[inline]
pub(crate) fn expectation(rating: f64, opponent_rating: f64, opponent_deviation: f64) -> f64 {
    1.0 / (1.0 + (-g(opponent_deviation) * (rating - opponent_rating)).exp())
}
