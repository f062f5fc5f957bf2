//! Session-local accumulator for a player's not-yet-committed actions.
//!
//! The buffer is exclusively owned by one stat-entry session. It is created
//! empty when a scorer opens a player's sheet, mutated by every button
//! press, consumed exactly once by [`crate::engine::derive`] on confirm,
//! and reset afterwards. Counters only ever increment, so invalid
//! (negative or out-of-range) states are unrepresentable; the single
//! enforced bound is the free-throw trip cap.

use serde::{Deserialize, Serialize};

/// Maximum free throws in one trip to the line (and-one after a made
/// three). Entries past the cap are ignored.
pub const FREE_THROW_TRIP_CAP: usize = 3;

/// Outcome of a single shot attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    Made,
    Missed,
}

impl ShotOutcome {
    #[inline]
    pub fn is_made(self) -> bool {
        matches!(self, ShotOutcome::Made)
    }
}

/// Foul sub-type. All sub-types count identically toward the player's
/// `fouls` counter; the distinction is recorded only on the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoulKind {
    Personal,
    Offensive,
    Technical,
    Unsportsmanlike,
}

/// One stat button press.
///
/// A closed tagged-variant type so the derivation engine is exhaustively
/// checked: adding a category without handling it everywhere is a compile
/// error, not a silently dropped stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatEntry {
    Two(ShotOutcome),
    Three(ShotOutcome),
    FreeThrow(ShotOutcome),
    Assist,
    Steal,
    Block,
    Turnover,
    OffensiveRebound,
    DefensiveRebound,
    Foul(FoulKind),
}

/// Structured accumulator of pending stats for the current session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingStatBuffer {
    two_made: u32,
    two_missed: u32,
    three_made: u32,
    three_missed: u32,
    free_throws: Vec<ShotOutcome>,
    assists: u32,
    steals: u32,
    blocks: u32,
    turnovers: u32,
    offensive_rebounds: u32,
    defensive_rebounds: u32,
    fouls: Vec<FoulKind>,
}

impl PendingStatBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one button press.
    ///
    /// Returns whether the entry was accepted. The only rejection is a
    /// free throw past the trip cap; every other category is an unbounded
    /// non-negative counter.
    pub fn record(&mut self, entry: StatEntry) -> bool {
        match entry {
            StatEntry::Two(ShotOutcome::Made) => self.two_made += 1,
            StatEntry::Two(ShotOutcome::Missed) => self.two_missed += 1,
            StatEntry::Three(ShotOutcome::Made) => self.three_made += 1,
            StatEntry::Three(ShotOutcome::Missed) => self.three_missed += 1,
            StatEntry::FreeThrow(outcome) => {
                if self.free_throws.len() >= FREE_THROW_TRIP_CAP {
                    return false;
                }
                self.free_throws.push(outcome);
            }
            StatEntry::Assist => self.assists += 1,
            StatEntry::Steal => self.steals += 1,
            StatEntry::Block => self.blocks += 1,
            StatEntry::Turnover => self.turnovers += 1,
            StatEntry::OffensiveRebound => self.offensive_rebounds += 1,
            StatEntry::DefensiveRebound => self.defensive_rebounds += 1,
            StatEntry::Foul(kind) => self.fouls.push(kind),
        }
        true
    }

    /// Removes the most recently recorded free throw of the current trip.
    pub fn undo_last_free_throw(&mut self) -> Option<ShotOutcome> {
        self.free_throws.pop()
    }

    /// Whether any field is non-zero/non-empty.
    pub fn has_pending(&self) -> bool {
        self.two_made != 0
            || self.two_missed != 0
            || self.three_made != 0
            || self.three_missed != 0
            || !self.free_throws.is_empty()
            || self.assists != 0
            || self.steals != 0
            || self.blocks != 0
            || self.turnovers != 0
            || self.offensive_rebounds != 0
            || self.defensive_rebounds != 0
            || !self.fouls.is_empty()
    }

    /// Clears every field; the trip at the line starts over.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn two_made(&self) -> u32 {
        self.two_made
    }

    pub fn two_missed(&self) -> u32 {
        self.two_missed
    }

    pub fn three_made(&self) -> u32 {
        self.three_made
    }

    pub fn three_missed(&self) -> u32 {
        self.three_missed
    }

    pub fn free_throws(&self) -> &[ShotOutcome] {
        &self.free_throws
    }

    pub fn assists(&self) -> u32 {
        self.assists
    }

    pub fn steals(&self) -> u32 {
        self.steals
    }

    pub fn blocks(&self) -> u32 {
        self.blocks
    }

    pub fn turnovers(&self) -> u32 {
        self.turnovers
    }

    pub fn offensive_rebounds(&self) -> u32 {
        self.offensive_rebounds
    }

    pub fn defensive_rebounds(&self) -> u32 {
        self.defensive_rebounds
    }

    pub fn fouls(&self) -> &[FoulKind] {
        &self.fouls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let buffer = PendingStatBuffer::new();
        assert!(!buffer.has_pending());
    }

    #[test]
    fn record_accumulates_counters() {
        let mut buffer = PendingStatBuffer::new();
        assert!(buffer.record(StatEntry::Two(ShotOutcome::Made)));
        assert!(buffer.record(StatEntry::Two(ShotOutcome::Made)));
        assert!(buffer.record(StatEntry::Three(ShotOutcome::Missed)));
        assert!(buffer.record(StatEntry::Assist));
        assert!(buffer.record(StatEntry::DefensiveRebound));

        assert_eq!(buffer.two_made(), 2);
        assert_eq!(buffer.three_missed(), 1);
        assert_eq!(buffer.assists(), 1);
        assert_eq!(buffer.defensive_rebounds(), 1);
        assert!(buffer.has_pending());
    }

    #[test]
    fn free_throw_trip_caps_at_three() {
        let mut buffer = PendingStatBuffer::new();
        assert!(buffer.record(StatEntry::FreeThrow(ShotOutcome::Made)));
        assert!(buffer.record(StatEntry::FreeThrow(ShotOutcome::Missed)));
        assert!(buffer.record(StatEntry::FreeThrow(ShotOutcome::Made)));
        // Fourth and later presses are no-ops.
        assert!(!buffer.record(StatEntry::FreeThrow(ShotOutcome::Made)));
        assert!(!buffer.record(StatEntry::FreeThrow(ShotOutcome::Missed)));

        assert_eq!(
            buffer.free_throws(),
            &[ShotOutcome::Made, ShotOutcome::Missed, ShotOutcome::Made]
        );
    }

    #[test]
    fn undo_removes_most_recent_free_throw() {
        let mut buffer = PendingStatBuffer::new();
        buffer.record(StatEntry::FreeThrow(ShotOutcome::Made));
        buffer.record(StatEntry::FreeThrow(ShotOutcome::Missed));

        assert_eq!(buffer.undo_last_free_throw(), Some(ShotOutcome::Missed));
        assert_eq!(buffer.free_throws(), &[ShotOutcome::Made]);

        // Undoing past the trip start is a no-op.
        buffer.undo_last_free_throw();
        assert_eq!(buffer.undo_last_free_throw(), None);
    }

    #[test]
    fn undo_reopens_a_full_trip() {
        let mut buffer = PendingStatBuffer::new();
        for _ in 0..FREE_THROW_TRIP_CAP {
            buffer.record(StatEntry::FreeThrow(ShotOutcome::Missed));
        }
        buffer.undo_last_free_throw();
        assert!(buffer.record(StatEntry::FreeThrow(ShotOutcome::Made)));
        assert_eq!(buffer.free_throws().len(), FREE_THROW_TRIP_CAP);
    }

    #[test]
    fn fouls_keep_recorded_order() {
        let mut buffer = PendingStatBuffer::new();
        buffer.record(StatEntry::Foul(FoulKind::Personal));
        buffer.record(StatEntry::Foul(FoulKind::Technical));
        buffer.record(StatEntry::Foul(FoulKind::Personal));

        assert_eq!(
            buffer.fouls(),
            &[FoulKind::Personal, FoulKind::Technical, FoulKind::Personal]
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut buffer = PendingStatBuffer::new();
        buffer.record(StatEntry::Two(ShotOutcome::Made));
        buffer.record(StatEntry::FreeThrow(ShotOutcome::Made));
        buffer.record(StatEntry::Foul(FoulKind::Offensive));

        buffer.reset();
        assert!(!buffer.has_pending());
        assert!(buffer.free_throws().is_empty());
        assert!(buffer.fouls().is_empty());
    }
}
