use tracing::trace;

use crate::{
    error::{finite, positive},
    internal_rating::{to_internal_deviation, to_internal_rating, InternalRating},
    pairwise::{expectation, g},
    Error, Player, Rating, Score,
};

#[derive(Debug, Clone)]
pub struct RatingSystemBuilder {
    default_rating: f64,
    default_deviation: f64,
    default_volatility: f64,

    tau: f64,

    convergence_tolerance: f64,
    max_iterations: u32,
}

impl Default for RatingSystemBuilder {
    fn default() -> RatingSystemBuilder {
        RatingSystemBuilder::new()
    }
}

impl RatingSystemBuilder {
    pub fn new() -> RatingSystemBuilder {
        RatingSystemBuilder {
            default_rating: 1500.0,
            default_deviation: 350.0,
            default_volatility: 0.06,

            tau: 0.3,

            convergence_tolerance: 1e-7,
            max_iterations: 100,
        }
    }

    pub fn default_rating(&mut self, default_rating: f64) -> &mut Self {
        self.default_rating = default_rating;
        self
    }

    pub fn default_deviation(&mut self, default_deviation: f64) -> &mut Self {
        self.default_deviation = default_deviation;
        self
    }

    pub fn default_volatility(&mut self, default_volatility: f64) -> &mut Self {
        self.default_volatility = default_volatility;
        self
    }

    /// Constrains the change in volatility over time. Reasonable choices are
    /// between 0.3 and 1.2.
    pub fn tau(&mut self, tau: f64) -> &mut Self {
        self.tau = tau;
        self
    }

    pub fn convergence_tolerance(&mut self, convergence_tolerance: f64) -> &mut Self {
        self.convergence_tolerance = convergence_tolerance;
        self
    }

    pub fn max_iterations(&mut self, max_iterations: u32) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(&self) -> Result<RatingSystem, Error> {
        if self.max_iterations < 1 {
            return Err(Error::invalid("max_iterations", f64::from(self.max_iterations)));
        }

        Ok(RatingSystem {
            default_rating: finite("default_rating", self.default_rating)?,
            default_deviation: positive("default_deviation", self.default_deviation)?,
            default_volatility: positive("default_volatility", self.default_volatility)?,

            tau: positive("tau", self.tau)?,

            convergence_tolerance: positive("convergence_tolerance", self.convergence_tolerance)?,
            max_iterations: self.max_iterations,
        })
    }
}

/// Parameters of the Glicko-2 rating system, and the update of a single
/// rating at the end of a rating period.
#[derive(Debug, Clone)]
pub struct RatingSystem {
    default_rating: f64,
    default_deviation: f64,
    default_volatility: f64,

    tau: f64,

    convergence_tolerance: f64,
    max_iterations: u32,
}

impl Default for RatingSystem {
    fn default() -> RatingSystem {
        RatingSystem::new()
    }
}

impl RatingSystem {
    pub fn builder() -> RatingSystemBuilder {
        RatingSystemBuilder::default()
    }

    pub fn new() -> RatingSystem {
        let defaults = RatingSystemBuilder::new();
        RatingSystem {
            default_rating: defaults.default_rating,
            default_deviation: defaults.default_deviation,
            default_volatility: defaults.default_volatility,

            tau: defaults.tau,

            convergence_tolerance: defaults.convergence_tolerance,
            max_iterations: defaults.max_iterations,
        }
    }

    /// Rating for a player without any games.
    pub fn new_rating(&self) -> Rating {
        Rating::from_internal(InternalRating {
            rating: to_internal_rating(self.default_rating),
            deviation: to_internal_deviation(self.default_deviation),
            volatility: self.default_volatility,
        })
    }

    pub fn new_player(&self) -> Player {
        Player::from(self.new_rating())
    }

    pub fn default_rating(&self) -> f64 {
        self.default_rating
    }

    pub fn default_deviation(&self) -> f64 {
        self.default_deviation
    }

    pub fn default_volatility(&self) -> f64 {
        self.default_volatility
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Computes the rating for the next rating period, given the current
    /// rating and all results of the period. Each result is a snapshot of the
    /// opponent as of the start of the period, and the score from the point
    /// of view of `current`.
    ///
    /// Without any results only the deviation grows, according to the
    /// volatility.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::ArithmeticDegenerate`] if the results carry no
    /// information (for example when every expected score rounds to exactly
    /// `0.0` or `1.0`), and with [`Error::ConvergenceFailure`] if the new
    /// volatility can not be determined within the configured number of
    /// iterations.
    pub fn rate(&self, current: &Rating, results: &[(Rating, Score)]) -> Result<Rating, Error> {
        let current = current.internal();

        if results.is_empty() {
            return committed(InternalRating {
                deviation: current.inflated_deviation(),
                ..current
            });
        }

        // Sum of g(φⱼ)² E (1 - E) is the inverse of the estimated variance v.
        // Sum of g(φⱼ) (s - E) is the estimated improvement Δ divided by v.
        let mut inverse_variance = 0.0;
        let mut score_surplus = 0.0;
        for (opponent, score) in results {
            let opponent = opponent.internal();
            let impact = g(opponent.deviation);
            let expected = expectation(current.rating, opponent.rating, opponent.deviation);
            inverse_variance += impact * impact * expected * (1.0 - expected);
            score_surplus += impact * (score.value() - expected);
        }

        let variance = 1.0 / inverse_variance;
        if !variance.is_finite() || variance <= 0.0 {
            return Err(Error::degenerate("variance"));
        }

        let improvement = variance * score_surplus;
        if !improvement.is_finite() {
            return Err(Error::degenerate("improvement"));
        }

        let volatility = self.new_volatility(&current, variance, improvement)?;

        let pre_deviation_sq = current.deviation_sq() + volatility * volatility;
        let deviation = 1.0 / (1.0 / pre_deviation_sq + 1.0 / variance).sqrt();

        committed(InternalRating {
            rating: current.rating + deviation * deviation * score_surplus,
            deviation,
            volatility,
        })
    }

    /// Newton-Raphson iteration for `x = ln(σ'²)` on the derivative of the
    /// log posterior of the volatility.
    fn new_volatility(
        &self,
        current: &InternalRating,
        variance: f64,
        improvement: f64,
    ) -> Result<f64, Error> {
        let tau_sq = self.tau * self.tau;
        let deviation_sq_variance = current.deviation_sq() + variance;
        let improvement_sq = improvement * improvement;

        // ln(σ²) without squaring, which underflows for tiny σ.
        let a = 2.0 * current.volatility.ln();
        let mut x = a;

        for iteration in 1..=self.max_iterations {
            let ex = x.exp();
            let d = deviation_sq_variance + ex;

            let h1 =
                -(x - a) / tau_sq - 0.5 * ex / d + 0.5 * ex * (improvement / d) * (improvement / d);
            let h2 = -1.0 / tau_sq - 0.5 * ex * deviation_sq_variance / (d * d)
                + 0.5 * improvement_sq * ex * (deviation_sq_variance - ex) / (d * d * d);

            let next = x - h1 / h2;
            trace!(iteration, x = next, "volatility iteration");

            if !next.is_finite() {
                return Err(Error::degenerate("volatility iterate"));
            }
            if (x - next).abs() <= self.convergence_tolerance {
                return Ok((next / 2.0).exp());
            }
            x = next;
        }

        Err(Error::ConvergenceFailure {
            iterations: self.max_iterations,
        })
    }
}

fn committed(next: InternalRating) -> Result<Rating, Error> {
    if !next.rating.is_finite() {
        Err(Error::degenerate("rating"))
    } else if !next.deviation.is_finite() || next.deviation <= 0.0 {
        Err(Error::degenerate("deviation"))
    } else if !next.volatility.is_finite() || next.volatility <= 0.0 {
        Err(Error::degenerate("volatility"))
    } else {
        Ok(Rating::from_internal(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> (Rating, Vec<(Rating, Score)>) {
        (
            Rating::new(1500.0, 200.0, 0.06).unwrap(),
            vec![
                (Rating::new(1400.0, 30.0, 0.06).unwrap(), Score::WIN),
                (Rating::new(1550.0, 100.0, 0.06).unwrap(), Score::LOSS),
                (Rating::new(1700.0, 300.0, 0.06).unwrap(), Score::LOSS),
            ],
        )
    }

    #[test]
    fn test_builder_defaults() {
        let system = RatingSystem::builder().build().unwrap();
        assert_eq!(system.tau(), 0.3);
        assert_eq!(system.convergence_tolerance(), 1e-7);
        assert_eq!(system.max_iterations(), 100);

        let rating = system.new_rating();
        assert!((f64::from(rating.rating()) - 1500.0).abs() < 1e-9);
        assert!((f64::from(rating.deviation()) - 350.0).abs() < 1e-9);
        assert_eq!(f64::from(rating.volatility()), 0.06);
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        assert!(matches!(
            RatingSystem::builder().tau(0.0).build(),
            Err(Error::InvalidParameter { parameter: "tau", .. })
        ));
        assert!(matches!(
            RatingSystem::builder().default_deviation(-350.0).build(),
            Err(Error::InvalidParameter { parameter: "default_deviation", .. })
        ));
        assert!(matches!(
            RatingSystem::builder().default_volatility(f64::NAN).build(),
            Err(Error::InvalidParameter { parameter: "default_volatility", .. })
        ));
        assert!(matches!(
            RatingSystem::builder().max_iterations(0).build(),
            Err(Error::InvalidParameter { parameter: "max_iterations", .. })
        ));
    }

    #[test]
    fn test_rate_example() {
        let (current, results) = example();
        let next = RatingSystem::new().rate(&current, &results).unwrap();
        assert!((f64::from(next.rating()) - 1464.05).abs() < 0.01);
        assert!((f64::from(next.deviation()) - 151.516).abs() < 0.01);
        assert!((f64::from(next.volatility()) - 0.06).abs() < 1e-3);
    }

    #[test]
    fn test_rate_without_results() {
        let current = Rating::new(1500.0, 200.0, 0.06).unwrap();
        let next = RatingSystem::new().rate(&current, &[]).unwrap();
        assert_eq!(next.rating(), current.rating());
        assert_eq!(next.volatility(), current.volatility());
        let internal = to_internal_deviation(200.0);
        let expected = (internal * internal + 0.06 * 0.06).sqrt() * 173.7178;
        assert!((f64::from(next.deviation()) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_larger_tau_allows_larger_volatility_change() {
        // Surprising results pull the volatility up.
        let current = Rating::new(1500.0, 50.0, 0.06).unwrap();
        let results = vec![
            (Rating::new(2100.0, 50.0, 0.06).unwrap(), Score::WIN),
            (Rating::new(2000.0, 50.0, 0.06).unwrap(), Score::WIN),
            (Rating::new(2200.0, 50.0, 0.06).unwrap(), Score::WIN),
        ];
        let tight = RatingSystem::new().rate(&current, &results).unwrap();
        let loose = RatingSystem::builder()
            .tau(1.2)
            .build()
            .unwrap()
            .rate(&current, &results)
            .unwrap();
        assert!(tight.volatility().0 > 0.06);
        assert!(loose.volatility().0 > tight.volatility().0);
    }

    #[test]
    fn test_tiny_volatility() {
        let current = Rating::new(1500.0, 200.0, 1e-170).unwrap();
        let results = vec![(Rating::new(1400.0, 30.0, 0.06).unwrap(), Score::WIN)];
        let next = RatingSystem::new().rate(&current, &results).unwrap();
        assert!(next.rating().0 > 1500.0);
        assert!(next.volatility().0 > 0.0 && next.volatility().0 < 1e-100);
    }

    #[test]
    fn test_convergence_failure() {
        let (current, results) = example();
        let system = RatingSystem::builder().max_iterations(1).build().unwrap();
        assert_eq!(
            system.rate(&current, &results),
            Err(Error::ConvergenceFailure { iterations: 1 })
        );
    }

    #[test]
    fn test_degenerate_variance() {
        // Expected score underflows to exactly 0.0.
        let current = Rating::new(1500.0, 200.0, 0.06).unwrap();
        let results = vec![(Rating::new(1.0e6, 30.0, 0.06).unwrap(), Score::LOSS)];
        assert_eq!(
            RatingSystem::new().rate(&current, &results),
            Err(Error::ArithmeticDegenerate {
                quantity: "variance"
            })
        );
    }
}
