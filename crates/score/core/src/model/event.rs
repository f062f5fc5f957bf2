//! Append-only game event records and their closed vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::RecordId;
use crate::buffer::FoulKind;

/// Every discrete occurrence a confirm batch can produce.
///
/// The vocabulary is closed: the derivation engine matches the pending
/// buffer exhaustively onto these variants, so a new stat category cannot
/// be added without the compiler pointing at every site that must handle it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    // ========================================================================
    // Scoring
    // ========================================================================
    TwoMade,
    TwoMissed,
    ThreeMade,
    ThreeMissed,
    FreeThrowMade,
    FreeThrowMissed,

    // ========================================================================
    // Possession
    // ========================================================================
    Assist,
    Steal,
    Block,
    Turnover,
    OffensiveRebound,
    DefensiveRebound,

    // ========================================================================
    // Fouls
    // ========================================================================
    FoulPersonal,
    FoulOffensive,
    FoulTechnical,
    FoulUnsportsmanlike,
}

impl EventKind {
    /// Points this occurrence contributes to the scoreboard ledger.
    pub fn points(self) -> u32 {
        match self {
            EventKind::TwoMade => 2,
            EventKind::ThreeMade => 3,
            EventKind::FreeThrowMade => 1,
            _ => 0,
        }
    }

    /// True for the makes that restart the shot clock.
    pub fn is_field_goal_make(self) -> bool {
        matches!(self, EventKind::TwoMade | EventKind::ThreeMade)
    }

    pub fn is_foul(self) -> bool {
        matches!(
            self,
            EventKind::FoulPersonal
                | EventKind::FoulOffensive
                | EventKind::FoulTechnical
                | EventKind::FoulUnsportsmanlike
        )
    }

    /// Verb phrase used when composing event descriptions.
    pub fn phrase(self) -> &'static str {
        match self {
            EventKind::TwoMade => "made a 2-point shot",
            EventKind::TwoMissed => "missed a 2-point shot",
            EventKind::ThreeMade => "made a 3-point shot",
            EventKind::ThreeMissed => "missed a 3-point shot",
            EventKind::FreeThrowMade => "made a free throw",
            EventKind::FreeThrowMissed => "missed a free throw",
            EventKind::Assist => "recorded an assist",
            EventKind::Steal => "recorded a steal",
            EventKind::Block => "blocked a shot",
            EventKind::Turnover => "committed a turnover",
            EventKind::OffensiveRebound => "grabbed an offensive rebound",
            EventKind::DefensiveRebound => "grabbed a defensive rebound",
            EventKind::FoulPersonal => "committed a personal foul",
            EventKind::FoulOffensive => "committed an offensive foul",
            EventKind::FoulTechnical => "committed a technical foul",
            EventKind::FoulUnsportsmanlike => "committed an unsportsmanlike foul",
        }
    }
}

impl From<FoulKind> for EventKind {
    fn from(kind: FoulKind) -> Self {
        match kind {
            FoulKind::Personal => EventKind::FoulPersonal,
            FoulKind::Offensive => EventKind::FoulOffensive,
            FoulKind::Technical => EventKind::FoulTechnical,
            FoulKind::Unsportsmanlike => EventKind::FoulUnsportsmanlike,
        }
    }
}

/// One discrete occurrence, persisted append-only at confirm time.
///
/// Events are never mutated or deleted by this subsystem. Every event in a
/// confirm batch stamps the same period/clock snapshot: the confirmation
/// instant, not the instant of the original tap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: RecordId,
    pub game_id: RecordId,
    pub player_id: RecordId,
    pub kind: EventKind,
    pub period: u8,
    /// Game clock seconds remaining when the batch was confirmed.
    pub clock_seconds: u32,
    /// 0 unless the kind is a make.
    pub points: u32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl GameEvent {
    /// Builds an unpersisted event draft; the store assigns id and
    /// creation stamp at bulk-create.
    pub fn draft(
        game_id: RecordId,
        player_id: RecordId,
        kind: EventKind,
        period: u8,
        clock_seconds: u32,
        description: String,
    ) -> Self {
        Self {
            id: RecordId::default(),
            game_id,
            player_id,
            kind,
            period,
            clock_seconds,
            points: kind.points(),
            description,
            created_at: DateTime::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn only_makes_carry_points() {
        for kind in EventKind::iter() {
            let expected = match kind {
                EventKind::TwoMade => 2,
                EventKind::ThreeMade => 3,
                EventKind::FreeThrowMade => 1,
                _ => 0,
            };
            assert_eq!(kind.points(), expected, "{kind}");
        }
    }

    #[test]
    fn wire_names_are_snake_case() {
        // strum and serde must agree on the wire name.
        assert_eq!(
            EventKind::FoulUnsportsmanlike.to_string(),
            "foul_unsportsmanlike"
        );
        assert_eq!(EventKind::OffensiveRebound.to_string(), "offensive_rebound");
        assert_eq!(EventKind::TwoMade.to_string(), "two_made");
    }

    #[test]
    fn every_kind_has_a_phrase() {
        for kind in EventKind::iter() {
            assert!(!kind.phrase().is_empty());
        }
    }
}
