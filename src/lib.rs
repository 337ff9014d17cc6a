//! Glicko-2 rating system with explicit rating periods.
//!
//! Results are recorded against a [`Player`] as they happen, and the rating
//! is updated once at the end of each rating period.
//!
//! ```
//! use glicko2_period::Player;
//!
//! let mut a = Player::new(1500.0, 200.0, 0.06)?;
//! let b = Player::new(1400.0, 30.0, 0.06)?;
//! let c = Player::new(1550.0, 100.0, 0.06)?;
//! let d = Player::new(1700.0, 300.0, 0.06)?;
//!
//! a.add_win(&b);
//! a.add_loss(&c);
//! a.add_loss(&d);
//! a.update()?;
//!
//! assert!((f64::from(a.rating()) - 1464.05).abs() < 0.01);
//! assert!((f64::from(a.deviation()) - 151.52).abs() < 0.01);
//! # Ok::<_, glicko2_period::Error>(())
//! ```
//!
//! When players meet each other within a period, take all snapshots (or
//! record all results) before updating any of them.

mod error;
mod internal_rating;
mod pairwise;
mod player;
mod rating;
mod rating_system;
mod score;

pub use error::Error;
pub use internal_rating::{
    to_internal_deviation, to_internal_rating, to_public_deviation, to_public_rating,
    INTERNAL_RATING_SCALE, RATING_OFFSET,
};
pub use player::Player;
pub use rating::{Rating, RatingDifference, RatingScalar, Volatility};
pub use rating_system::{RatingSystem, RatingSystemBuilder};
pub use score::Score;

/// Log likelihood deviance metric that can be used to evaluate the quality of
/// rating system predictions.
///
/// Lower is better.
///
/// See https://www.kaggle.com/c/ChessRatings2/overview/evaluation.
pub fn deviance(expected: Score, actual: Score) -> f64 {
    let expected = expected.value().clamp(0.01, 0.99);
    let actual = actual.value();
    -(actual * expected.log10() + (1.0 - actual) * (1.0 - expected).log10())
}
