//! Broadcast notifications emitted by a scoring session.

use serde::{Deserialize, Serialize};

use score_core::RecordId;

/// What a subscriber (scoreboard display, CLI) sees while a session runs.
///
/// Delivery is best-effort: a lagging receiver drops old notifications,
/// which is acceptable for display-only consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A confirm batch was committed.
    Committed {
        player_id: RecordId,
        event_count: usize,
        points: u32,
    },

    /// The running clock advanced one second.
    ClockTick {
        clock_seconds: u32,
        shot_clock_seconds: u32,
    },

    /// The shot clock was restored to its reset value.
    ShotClockReset,

    /// The scorekeeper moved the game to the next period.
    PeriodAdvanced { period: u8 },
}
