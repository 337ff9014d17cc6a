use std::str::FromStr;

use glicko2_period::Score;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use thiserror::Error;

/// A league: players, teams of players, and the encounters of each rating
/// period in order.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub players: Vec<RawPlayer>,
    #[serde(default)]
    pub teams: Vec<RawTeam>,
    #[serde(default)]
    pub periods: Vec<RawPeriod>,
}

impl FromStr for Document {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Document, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Player with an optional initial rating. Missing values are taken from the
/// rating system defaults.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct RawPlayer {
    pub name: String,
    pub rating: Option<f64>,
    pub deviation: Option<f64>,
    pub volatility: Option<f64>,
}

/// A team stands for all of its members wherever its name is used as a
/// competitor.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct RawTeam {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RawPeriod {
    #[serde(default)]
    pub games: Vec<RawGame>,
    #[serde(default)]
    pub races: Vec<RawRace>,
}

#[serde_as]
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct RawGame {
    pub home: String,
    pub away: String,
    #[serde_as(as = "DisplayFromStr")]
    pub result: GameResult,
}

/// Competitors in finishing order, winner first.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct RawRace {
    pub competitors: Vec<String>,
}

/// Result of a game from the point of view of the home side.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Error)]
#[error("invalid game result")]
pub struct InvalidGameResult;

impl FromStr for GameResult {
    type Err = InvalidGameResult;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "win" => GameResult::Win,
            "loss" => GameResult::Loss,
            "draw" => GameResult::Draw,
            _ => return Err(InvalidGameResult),
        })
    }
}

impl GameResult {
    pub fn home_score(self) -> Score {
        match self {
            GameResult::Win => Score::WIN,
            GameResult::Loss => Score::LOSS,
            GameResult::Draw => Score::DRAW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let document: Document = r#"
            [[players]]
            name = "alice"
            rating = 1600.0
            deviation = 120.0

            [[players]]
            name = "bob"

            [[teams]]
            name = "crew"
            members = ["alice", "bob"]

            [[periods]]
            games = [
                { home = "alice", away = "bob", result = "draw" },
            ]

            [[periods]]
            races = [
                { competitors = ["crew", "carol"] },
            ]
        "#
        .parse()
        .unwrap();

        assert_eq!(document.players.len(), 2);
        assert_eq!(document.players[0].rating, Some(1600.0));
        assert_eq!(document.players[0].volatility, None);
        assert_eq!(document.teams[0].members, ["alice", "bob"]);
        assert_eq!(document.periods.len(), 2);
        assert_eq!(document.periods[0].games[0].result, GameResult::Draw);
        assert!(document.periods[0].races.is_empty());
        assert_eq!(document.periods[1].races[0].competitors, ["crew", "carol"]);
    }

    #[test]
    fn test_invalid_game_result() {
        assert!("tie".parse::<GameResult>().is_err());
        assert!(r#"
            [[periods]]
            games = [{ home = "a", away = "b", result = "1-0" }]
        "#
        .parse::<Document>()
        .is_err());
    }

    #[test]
    fn test_home_score() {
        assert_eq!(GameResult::Win.home_score(), Score::WIN);
        assert_eq!(GameResult::Loss.home_score().opposite(), Score::WIN);
        assert_eq!(GameResult::Draw.home_score(), Score::DRAW);
    }
}
