use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{RecordId, TeamSide};
use crate::clock::SHOT_CLOCK_SECONDS;

/// Team identity shown on the scoreboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    /// Display color, e.g. `#1d4ed8`.
    pub color: String,
}

impl TeamInfo {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Persisted game record: scoreboard, period, and both countdown clocks.
///
/// Ledger invariant: `home_score + away_score` equals the sum of `points`
/// across the game's committed events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: RecordId,
    pub home: TeamInfo,
    pub away: TeamInfo,
    pub home_score: u32,
    pub away_score: u32,
    /// Current period ("quarter"); regulation is 1..=4, overtime beyond.
    pub period: u8,
    /// Game clock seconds remaining; non-increasing while the clock runs.
    pub clock_seconds: u32,
    pub shot_clock_seconds: u32,
    pub created_at: DateTime<Utc>,
}

impl Game {
    /// Builds an unpersisted game in the first period with the given clock.
    pub fn new(home: TeamInfo, away: TeamInfo, clock_seconds: u32) -> Self {
        Self {
            id: RecordId::default(),
            home,
            away,
            home_score: 0,
            away_score: 0,
            period: 1,
            clock_seconds,
            shot_clock_seconds: SHOT_CLOCK_SECONDS,
            created_at: DateTime::UNIX_EPOCH,
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamInfo {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn score_for(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_score,
            TeamSide::Away => self.away_score,
        }
    }

    pub fn credit_points(&mut self, side: TeamSide, points: u32) {
        match side {
            TeamSide::Home => self.home_score += points,
            TeamSide::Away => self.away_score += points,
        }
    }
}
