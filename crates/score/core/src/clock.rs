//! Game and shot clock state machine.
//!
//! A pure countdown pair with two states, `Running` and `Paused`. The
//! runtime's ticker worker drives [`GameClocks::tick`] on a one-second
//! schedule and persists the mirrors after each advance; this module knows
//! nothing about schedules or storage.

/// Shot clock value restored on any made field goal or manual reset.
pub const SHOT_CLOCK_SECONDS: u32 = 24;

/// Whether the countdown advances on tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    Running,
    #[default]
    Paused,
}

/// The scorekeeper's working copy of both countdown clocks.
///
/// Read once from the game record at session open and flushed back on every
/// tick; it is deliberately not re-synchronized from storage while ticking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameClocks {
    pub game_seconds: u32,
    pub shot_seconds: u32,
    run_state: RunState,
}

impl GameClocks {
    /// Starts paused with the given mirrors.
    pub fn new(game_seconds: u32, shot_seconds: u32) -> Self {
        Self {
            game_seconds,
            shot_seconds,
            run_state: RunState::Paused,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn resume(&mut self) {
        self.run_state = RunState::Running;
    }

    pub fn pause(&mut self) {
        self.run_state = RunState::Paused;
    }

    /// Advances one second while running; a no-op while paused.
    ///
    /// Both clocks floor at zero, never negative. Returns whether the
    /// mirrors advanced (callers persist only on `true`).
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.game_seconds = self.game_seconds.saturating_sub(1);
        self.shot_seconds = self.shot_seconds.saturating_sub(1);
        true
    }

    /// Restores the shot clock, independent of the run state.
    pub fn reset_shot_clock(&mut self) {
        self.shot_seconds = SHOT_CLOCK_SECONDS;
    }

    /// Scorekeeper correction of the game clock.
    pub fn set_game_clock(&mut self, seconds: u32) {
        self.game_seconds = seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_does_not_advance() {
        let mut clocks = GameClocks::new(480, 24);
        assert!(!clocks.tick());
        assert_eq!(clocks.game_seconds, 480);
        assert_eq!(clocks.shot_seconds, 24);
    }

    #[test]
    fn running_clock_counts_down_both_mirrors() {
        let mut clocks = GameClocks::new(480, 24);
        clocks.resume();
        assert!(clocks.tick());
        assert!(clocks.tick());
        assert_eq!(clocks.game_seconds, 478);
        assert_eq!(clocks.shot_seconds, 22);
    }

    #[test]
    fn clocks_are_monotonic_and_floor_at_zero() {
        let mut clocks = GameClocks::new(3, 2);
        clocks.resume();
        let mut previous = (clocks.game_seconds, clocks.shot_seconds);
        for _ in 0..10 {
            clocks.tick();
            let current = (clocks.game_seconds, clocks.shot_seconds);
            assert!(current.0 <= previous.0);
            assert!(current.1 <= previous.1);
            previous = current;
        }
        assert_eq!(clocks.game_seconds, 0);
        assert_eq!(clocks.shot_seconds, 0);
    }

    #[test]
    fn shot_clock_reset_works_while_paused() {
        let mut clocks = GameClocks::new(480, 7);
        clocks.reset_shot_clock();
        assert_eq!(clocks.shot_seconds, SHOT_CLOCK_SECONDS);
        assert!(!clocks.is_running());
    }

    #[test]
    fn pause_resume_round_trip() {
        let mut clocks = GameClocks::new(60, 24);
        clocks.resume();
        clocks.tick();
        clocks.pause();
        assert!(!clocks.tick());
        clocks.resume();
        assert!(clocks.tick());
        assert_eq!(clocks.game_seconds, 58);
    }

    #[test]
    fn set_game_clock_overrides_mirror() {
        let mut clocks = GameClocks::new(10, 24);
        clocks.set_game_clock(600);
        assert_eq!(clocks.game_seconds, 600);
    }
}
