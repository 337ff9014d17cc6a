use crate::Error;

/// A score or expectation value in the range `0.0..=1.0`, where `0.0` is a
/// loss and `1.0` is a win.
///
/// Values in between are accepted, so that weighted or partial outcomes can
/// be recorded as well as draws.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Score(f64);

impl Score {
    pub const LOSS: Score = Score(0.0);
    pub const DRAW: Score = Score(0.5);
    pub const WIN: Score = Score(1.0);

    pub fn new(score: f64) -> Result<Score, Error> {
        if (0.0..=1.0).contains(&score) {
            Ok(Score(score))
        } else {
            Err(Error::invalid("score", score))
        }
    }

    /// Expectations are clamped into range rather than rejected.
    pub(crate) fn saturating(score: f64) -> Score {
        Score(score.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn opposite(self) -> Score {
        Score(1.0 - self.0)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Score> for f64 {
    #[inline]
    fn from(Score(score): Score) -> f64 {
        score
    }
}

impl TryFrom<f64> for Score {
    type Error = Error;

    fn try_from(score: f64) -> Result<Score, Error> {
        Score::new(score)
    }
}
