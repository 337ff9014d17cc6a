use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::{Error, Rating, RatingDifference, RatingScalar, RatingSystem, Score, Volatility};

/// A competitor: the current rating, and the results recorded against other
/// players since the last rating period was closed.
///
/// Results hold a copy of the opponent's rating at the time they were
/// recorded, so updating the opponent later (or in the same period) does not
/// affect them.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    rating: Rating,
    pending: Vec<(Rating, Score)>,
}

impl Default for Player {
    /// New player with rating 1500, deviation 350 and volatility 0.06.
    fn default() -> Player {
        RatingSystem::new().new_player()
    }
}

impl From<Rating> for Player {
    fn from(rating: Rating) -> Player {
        Player {
            rating,
            pending: Vec::new(),
        }
    }
}

impl Player {
    pub fn new(
        rating: impl Into<RatingScalar>,
        deviation: impl Into<RatingDifference>,
        volatility: impl Into<Volatility>,
    ) -> Result<Player, Error> {
        Ok(Player::from(Rating::new(rating, deviation, volatility)?))
    }

    pub fn rating(&self) -> RatingScalar {
        self.rating.rating()
    }

    pub fn deviation(&self) -> RatingDifference {
        self.rating.deviation()
    }

    pub fn volatility(&self) -> Volatility {
        self.rating.volatility()
    }

    pub fn set_rating(&mut self, rating: impl Into<RatingScalar>) -> Result<(), Error> {
        self.rating.set_rating(rating)
    }

    pub fn set_deviation(&mut self, deviation: impl Into<RatingDifference>) -> Result<(), Error> {
        self.rating.set_deviation(deviation)
    }

    pub fn set_volatility(&mut self, volatility: impl Into<Volatility>) -> Result<(), Error> {
        self.rating.set_volatility(volatility)
    }

    /// Current rating as a value, independent of this player.
    pub fn snapshot(&self) -> Rating {
        self.rating
    }

    /// Records a result against `opponent`, from the point of view of this
    /// player. Nothing is computed until [`Player::update()`].
    pub fn add_result(&mut self, opponent: &Player, score: Score) {
        self.add_result_against(opponent.snapshot(), score);
    }

    /// Like [`Player::add_result()`], for callers that took snapshots of
    /// their opponents up front.
    pub fn add_result_against(&mut self, opponent: Rating, score: Score) {
        self.pending.push((opponent, score));
    }

    pub fn add_win(&mut self, opponent: &Player) {
        self.add_result(opponent, Score::WIN);
    }

    pub fn add_loss(&mut self, opponent: &Player) {
        self.add_result(opponent, Score::LOSS);
    }

    pub fn add_draw(&mut self, opponent: &Player) {
        self.add_result(opponent, Score::DRAW);
    }

    pub fn clear_results(&mut self) {
        self.pending.clear();
    }

    pub fn pending_results(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending_results(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Closes the rating period with the default [`RatingSystem`].
    pub fn update(&mut self) -> Result<(), Error> {
        self.update_with(&RatingSystem::new())
    }

    /// Closes the rating period: replaces rating, deviation and volatility
    /// with their values for the next period, based on all recorded results.
    ///
    /// Recorded results are discarded in any case. On error the rating is
    /// left unchanged.
    pub fn update_with(&mut self, rating_system: &RatingSystem) -> Result<(), Error> {
        let next = rating_system.rate(&self.rating, &self.pending);
        let results = self.pending.len();
        self.clear_results();

        match next {
            Ok(next) => {
                debug!(
                    results,
                    rating = next.rating().0,
                    deviation = next.deviation().0,
                    volatility = next.volatility().0,
                    "closed rating period"
                );
                self.rating = next;
                Ok(())
            }
            Err(err) => {
                warn!(results, %err, "discarding rating period");
                Err(err)
            }
        }
    }

    /// See [`Rating::win_probability()`].
    pub fn win_probability(&self, opponent: &Player) -> Score {
        self.rating.win_probability(&opponent.rating)
    }

    /// See [`Rating::expected_score()`].
    pub fn expected_score(&self, opponent: &Player) -> Score {
        self.rating.expected_score(&opponent.rating)
    }

    pub fn cmp_rating(&self, other: &Player) -> Ordering {
        self.rating.cmp_rating(&other.rating)
    }
}
