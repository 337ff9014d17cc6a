use glicko2_period::{deviance, Player, Rating, RatingSystem, Score};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::document::{Document, RawPeriod};

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("unknown player or team: {0}")]
    UnknownName(String),
    #[error("duplicate player or team: {0}")]
    DuplicateName(String),
    #[error("team without members: {0}")]
    EmptyTeam(String),
    #[error("{player} competes against themselves")]
    SelfEncounter { player: String },
    #[error("rating of {player}: {source}")]
    Rating {
        player: String,
        #[source]
        source: glicko2_period::Error,
    },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PlayerId(usize);

/// Players by name, and teams resolved to their members.
#[derive(Default)]
struct Roster {
    ids: FxHashMap<Box<str>, PlayerId>,
    teams: FxHashMap<Box<str>, Box<[PlayerId]>>,
}

impl Roster {
    /// Ids are assigned in insertion order, starting at 0.
    fn insert_player(&mut self, name: &str) -> Result<PlayerId, LeagueError> {
        let next_id = PlayerId(self.ids.len());
        if self.ids.contains_key(name) {
            return Err(LeagueError::DuplicateName(name.to_owned()));
        }
        self.ids.insert(name.into(), next_id);
        Ok(next_id)
    }

    fn insert_team(&mut self, name: &str, members: &[String]) -> Result<(), LeagueError> {
        if members.is_empty() {
            return Err(LeagueError::EmptyTeam(name.to_owned()));
        }
        if self.ids.contains_key(name) || self.teams.contains_key(name) {
            return Err(LeagueError::DuplicateName(name.to_owned()));
        }
        let members = members
            .iter()
            .map(|member| self.player(member))
            .collect::<Result<Box<[PlayerId]>, LeagueError>>()?;
        self.teams.insert(name.into(), members);
        Ok(())
    }

    fn player(&self, name: &str) -> Result<PlayerId, LeagueError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| LeagueError::UnknownName(name.to_owned()))
    }

    /// A team resolves to all of its members, a player to itself.
    fn competitors(&self, name: &str) -> Result<Vec<PlayerId>, LeagueError> {
        match self.teams.get(name) {
            Some(members) => Ok(members.to_vec()),
            None => Ok(vec![self.player(name)?]),
        }
    }
}

/// Outcome of replaying one rating period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    /// Number of pairwise encounters, counted once per pair.
    pub encounters: usize,
    /// Mean deviance of the expected scores before the period, or `None`
    /// if there were no encounters.
    pub mean_deviance: Option<f64>,
}

pub struct League {
    rating_system: RatingSystem,
    roster: Roster,
    names: Vec<Box<str>>,
    players: Vec<Player>,
}

impl League {
    pub fn new(document: &Document, rating_system: RatingSystem) -> Result<League, LeagueError> {
        let mut roster = Roster::default();
        let mut names = Vec::with_capacity(document.players.len());
        let mut players = Vec::with_capacity(document.players.len());

        for raw in &document.players {
            let PlayerId(id) = roster.insert_player(&raw.name)?;
            debug_assert_eq!(id, players.len());
            let player = Player::new(
                raw.rating.unwrap_or(rating_system.default_rating()),
                raw.deviation.unwrap_or(rating_system.default_deviation()),
                raw.volatility.unwrap_or(rating_system.default_volatility()),
            )
            .map_err(|source| LeagueError::Rating {
                player: raw.name.clone(),
                source,
            })?;
            names.push(raw.name.as_str().into());
            players.push(player);
        }

        for team in &document.teams {
            roster.insert_team(&team.name, &team.members)?;
        }

        Ok(League {
            rating_system,
            roster,
            names,
            players,
        })
    }

    /// Records all games and races of the period against the ratings as of
    /// the start of the period, then updates every player once.
    ///
    /// The period is applied as a whole: on error no player is changed and
    /// no results are left pending.
    pub fn play_period(&mut self, period: &RawPeriod) -> Result<PeriodSummary, LeagueError> {
        let encounters = self.resolve(period)?;

        let snapshots: Vec<Rating> = self.players.iter().map(Player::snapshot).collect();
        let mut next = self.players.clone();
        let mut total_deviance = 0.0;

        for &(PlayerId(first), PlayerId(second), score) in &encounters {
            next[first].add_result_against(snapshots[second], score);
            next[second].add_result_against(snapshots[first], score.opposite());

            let expected = snapshots[first].expected_score(&snapshots[second]);
            debug!(
                first = &*self.names[first],
                second = &*self.names[second],
                expected = expected.value(),
                actual = score.value(),
                "encounter"
            );
            total_deviance += deviance(expected, score);
        }

        for (id, player) in next.iter_mut().enumerate() {
            player
                .update_with(&self.rating_system)
                .map_err(|source| LeagueError::Rating {
                    player: self.names[id].to_string(),
                    source,
                })?;
        }
        self.players = next;

        Ok(PeriodSummary {
            encounters: encounters.len(),
            mean_deviance: (!encounters.is_empty())
                .then(|| total_deviance / encounters.len() as f64),
        })
    }

    /// Expands games and races into pairwise encounters, with the score
    /// from the point of view of the first player.
    fn resolve(
        &self,
        period: &RawPeriod,
    ) -> Result<Vec<(PlayerId, PlayerId, Score)>, LeagueError> {
        let mut encounters = Vec::new();

        for game in &period.games {
            let home = self.roster.competitors(&game.home)?;
            let away = self.roster.competitors(&game.away)?;
            let score = game.result.home_score();
            for &h in &home {
                for &a in &away {
                    encounters.push(self.encounter(h, a, score)?);
                }
            }
        }

        for race in &period.races {
            let mut finished: Vec<PlayerId> = Vec::new();
            for competitor in &race.competitors {
                let competitors = self.roster.competitors(competitor)?;
                for &winner in &finished {
                    for &loser in &competitors {
                        encounters.push(self.encounter(winner, loser, Score::WIN)?);
                    }
                }
                finished.extend(competitors);
            }
        }

        Ok(encounters)
    }

    fn encounter(
        &self,
        first: PlayerId,
        second: PlayerId,
        score: Score,
    ) -> Result<(PlayerId, PlayerId, Score), LeagueError> {
        if first == second {
            let PlayerId(id) = first;
            return Err(LeagueError::SelfEncounter {
                player: self.names[id].to_string(),
            });
        }
        Ok((first, second, score))
    }

    /// Players sorted by rating, highest first.
    pub fn standings(&self) -> Vec<(&str, &Player)> {
        let mut standings: Vec<_> = self
            .names
            .iter()
            .map(|name| &**name)
            .zip(&self.players)
            .collect();
        standings.sort_by(|(_, a), (_, b)| b.cmp_rating(a));
        standings
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.roster
            .player(name)
            .ok()
            .map(|PlayerId(id)| &self.players[id])
    }
}
