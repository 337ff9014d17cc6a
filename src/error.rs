use thiserror::Error;

/// Errors that can occur when constructing ratings or closing a rating
/// period.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A rating, deviation, volatility, score or system setting was out of
    /// its valid range.
    #[error("invalid {parameter}: {value}")]
    InvalidParameter { parameter: &'static str, value: f64 },
    /// An intermediate quantity of the rating update was not finite (or zero
    /// where it is used as a divisor).
    #[error("degenerate {quantity} in rating update")]
    ArithmeticDegenerate { quantity: &'static str },
    /// The volatility iteration did not settle within the configured number
    /// of steps.
    #[error("volatility did not converge after {iterations} iterations")]
    ConvergenceFailure { iterations: u32 },
}

impl Error {
    pub(crate) fn invalid(parameter: &'static str, value: f64) -> Error {
        Error::InvalidParameter { parameter, value }
    }

    pub(crate) fn degenerate(quantity: &'static str) -> Error {
        Error::ArithmeticDegenerate { quantity }
    }
}

/// Returns `value` if it is finite and strictly positive.
pub(crate) fn positive(parameter: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid(parameter, value))
    }
}

/// Returns `value` if it is finite.
pub(crate) fn finite(parameter: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid(parameter, value))
    }
}
