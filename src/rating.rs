use std::{cmp::Ordering, ops::Sub};

use crate::{
    error::{finite, positive},
    internal_rating::{
        to_internal_deviation, to_internal_rating, to_public_deviation, to_public_rating,
        InternalRating,
    },
    pairwise::expectation,
    Error, Score,
};

/// Number representing playing strength, such that the difference between two
/// ratings can be used to predict an expected score. Higher is better.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct RatingScalar(pub f64);

impl From<RatingScalar> for f64 {
    #[inline]
    fn from(RatingScalar(rating): RatingScalar) -> f64 {
        rating
    }
}

impl From<f64> for RatingScalar {
    #[inline]
    fn from(rating: f64) -> RatingScalar {
        RatingScalar(rating)
    }
}

impl Sub<RatingScalar> for RatingScalar {
    type Output = RatingDifference;

    #[inline]
    fn sub(self, rhs: RatingScalar) -> RatingDifference {
        RatingDifference(self.0 - rhs.0)
    }
}

/// A difference between two ratings. Also used for rating deviations.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct RatingDifference(pub f64);

impl From<RatingDifference> for f64 {
    #[inline]
    fn from(RatingDifference(difference): RatingDifference) -> f64 {
        difference
    }
}

impl From<f64> for RatingDifference {
    #[inline]
    fn from(difference: f64) -> RatingDifference {
        RatingDifference(difference)
    }
}

/// Number representing the degree of expected fluctuation in a rating.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Volatility(pub f64);

impl From<Volatility> for f64 {
    #[inline]
    fn from(Volatility(volatility): Volatility) -> f64 {
        volatility
    }
}

impl From<f64> for Volatility {
    #[inline]
    fn from(volatility: f64) -> Volatility {
        Volatility(volatility)
    }
}

/// Scale factor of the rating gap in [`Rating::win_probability()`].
const WIN_PROBABILITY_DEVIATION_FACTOR: f64 = 0.0000100723986;

/// A rating, deviation and volatility, as a value.
///
/// Values are held on the internal Glicko-2 scale. All accessors and
/// constructors use the public Glicko scale, where new players start at
/// 1500 with a deviation of 350.
///
/// Deviation and volatility are always finite and strictly positive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rating {
    internal: InternalRating,
}

impl Rating {
    pub fn new(
        rating: impl Into<RatingScalar>,
        deviation: impl Into<RatingDifference>,
        volatility: impl Into<Volatility>,
    ) -> Result<Rating, Error> {
        let RatingScalar(rating) = rating.into();
        let RatingDifference(deviation) = deviation.into();
        let Volatility(volatility) = volatility.into();
        Ok(Rating {
            internal: InternalRating {
                rating: to_internal_rating(finite("rating", rating)?),
                deviation: to_internal_deviation(positive("deviation", deviation)?),
                volatility: positive("volatility", volatility)?,
            },
        })
    }

    pub(crate) fn from_internal(internal: InternalRating) -> Rating {
        Rating { internal }
    }

    pub(crate) fn internal(&self) -> InternalRating {
        self.internal
    }

    /// Number indicating playing strength. Higher is better.
    pub fn rating(&self) -> RatingScalar {
        RatingScalar(to_public_rating(self.internal.rating))
    }

    /// Uncertainty in the rating. A range from rating minus twice the
    /// deviation to rating plus twice the deviation approximately represents
    /// a 95% confidence interval.
    pub fn deviation(&self) -> RatingDifference {
        RatingDifference(to_public_deviation(self.internal.deviation))
    }

    pub fn volatility(&self) -> Volatility {
        Volatility(self.internal.volatility)
    }

    pub fn set_rating(&mut self, rating: impl Into<RatingScalar>) -> Result<(), Error> {
        let RatingScalar(rating) = rating.into();
        self.internal.rating = to_internal_rating(finite("rating", rating)?);
        Ok(())
    }

    pub fn set_deviation(&mut self, deviation: impl Into<RatingDifference>) -> Result<(), Error> {
        let RatingDifference(deviation) = deviation.into();
        self.internal.deviation = to_internal_deviation(positive("deviation", deviation)?);
        Ok(())
    }

    pub fn set_volatility(&mut self, volatility: impl Into<Volatility>) -> Result<(), Error> {
        let Volatility(volatility) = volatility.into();
        self.internal.volatility = positive("volatility", volatility)?;
        Ok(())
    }

    /// Glicko-2 expected score against `opponent`, damped by the deviation
    /// of the opponent.
    pub fn expected_score(&self, opponent: &Rating) -> Score {
        Score::saturating(expectation(
            self.internal.rating,
            opponent.internal.rating,
            opponent.internal.deviation,
        ))
    }

    /// Probability of beating `opponent`, taking the deviations of both
    /// players into account.
    ///
    /// This is a different estimate than [`Rating::expected_score()`]. It
    /// works on the public scale with a base 10 logistic curve.
    pub fn win_probability(&self, opponent: &Rating) -> Score {
        let RatingDifference(gap) = opponent.rating() - self.rating();
        let RatingDifference(deviation) = self.deviation();
        let RatingDifference(opponent_deviation) = opponent.deviation();
        let spread = 400.0
            * (1.0
                + WIN_PROBABILITY_DEVIATION_FACTOR
                    * (deviation * deviation + opponent_deviation * opponent_deviation))
                .sqrt();
        Score::saturating(1.0 / (1.0 + 10f64.powf(gap / spread)))
    }

    /// Orders by rating only.
    pub fn cmp_rating(&self, other: &Rating) -> Ordering {
        self.internal.rating.total_cmp(&other.internal.rating)
    }
}
