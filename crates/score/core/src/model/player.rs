use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{RecordId, TeamSide};

/// Cumulative counting stats carried on a player record.
///
/// Invariants maintained by the derivation engine: `fgm <= fga`,
/// `tpm <= tpa`, `ftm <= fta`, and `points` equals the point total of the
/// player's committed events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub points: u32,
    /// Field goals made/attempted (two- and three-pointers combined).
    pub fgm: u32,
    pub fga: u32,
    /// Three-pointers made/attempted.
    pub tpm: u32,
    pub tpa: u32,
    /// Free throws made/attempted.
    pub ftm: u32,
    pub fta: u32,
    pub oreb: u32,
    pub dreb: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    /// All foul sub-types count here; the sub-type lives on the event.
    pub fouls: u32,
}

impl StatLine {
    pub fn rebounds(&self) -> u32 {
        self.oreb + self.dreb
    }
}

/// On-court position, stored with the roster entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "PG")]
    PointGuard,
    #[serde(rename = "SG")]
    ShootingGuard,
    #[serde(rename = "SF")]
    SmallForward,
    #[serde(rename = "PF")]
    PowerForward,
    #[serde(rename = "C")]
    Center,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::PointGuard => "PG",
            Position::ShootingGuard => "SG",
            Position::SmallForward => "SF",
            Position::PowerForward => "PF",
            Position::Center => "C",
        }
    }
}

/// Persisted roster entry plus the player's cumulative stat line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: RecordId,
    pub game_id: RecordId,
    pub name: String,
    pub jersey: u8,
    pub position: Position,
    pub side: TeamSide,
    pub stats: StatLine,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Builds an unpersisted roster entry; the store assigns id and
    /// creation stamp.
    pub fn new(
        game_id: RecordId,
        name: impl Into<String>,
        jersey: u8,
        position: Position,
        side: TeamSide,
    ) -> Self {
        Self {
            id: RecordId::default(),
            game_id,
            name: name.into(),
            jersey,
            position,
            side,
            stats: StatLine::default(),
            created_at: DateTime::UNIX_EPOCH,
        }
    }
}
