//! Conversion between the public Glicko scale and the internal Glicko-2
//! scale, on which all computations are performed.

pub const INTERNAL_RATING_SCALE: f64 = 173.7178;

/// Public rating that maps to an internal rating of `0.0`.
pub const RATING_OFFSET: f64 = 1500.0;

#[inline]
pub fn to_public_rating(rating: f64) -> f64 {
    rating * INTERNAL_RATING_SCALE + RATING_OFFSET
}

#[inline]
pub fn to_internal_rating(rating: f64) -> f64 {
    (rating - RATING_OFFSET) / INTERNAL_RATING_SCALE
}

#[inline]
pub fn to_public_deviation(deviation: f64) -> f64 {
    deviation * INTERNAL_RATING_SCALE
}

#[inline]
pub fn to_internal_deviation(deviation: f64) -> f64 {
    deviation / INTERNAL_RATING_SCALE
}

/// Rating triple on the internal scale. Volatility is the same on both
/// scales.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct InternalRating {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

impl InternalRating {
    #[inline]
    pub fn deviation_sq(&self) -> f64 {
        self.deviation * self.deviation
    }

    #[inline]
    pub fn volatility_sq(&self) -> f64 {
        self.volatility * self.volatility
    }

    /// Deviation after one rating period without results.
    pub fn inflated_deviation(&self) -> f64 {
        (self.deviation_sq() + self.volatility_sq()).sqrt()
    }
}
