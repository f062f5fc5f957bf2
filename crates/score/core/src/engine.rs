//! Event derivation: expands a pending buffer into discrete events plus the
//! aggregate deltas to apply to the player and game records.
//!
//! [`derive`] is the authoritative reducer for a confirm batch. It is a
//! deterministic fold over the buffer's fields: no branching on historical
//! state beyond the player/game snapshots read once at the start, and no
//! error conditions (the buffer cannot hold an invalid accumulation).

use crate::buffer::PendingStatBuffer;
use crate::clock::SHOT_CLOCK_SECONDS;
use crate::model::{EventKind, Game, GameEvent, Player, StatLine, TeamSide};

/// Snapshots read once at confirm time.
///
/// Every derived event stamps the context's period/clock pair: the moment
/// of confirmation, not of the original tap.
#[derive(Clone, Copy, Debug)]
pub struct DerivationContext<'a> {
    pub player: &'a Player,
    pub game: &'a Game,
}

/// Per-field increments to apply to a player's [`StatLine`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerDelta {
    pub points: u32,
    pub fgm: u32,
    pub fga: u32,
    pub tpm: u32,
    pub tpa: u32,
    pub ftm: u32,
    pub fta: u32,
    pub oreb: u32,
    pub dreb: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u32,
}

impl PlayerDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Adds the increments onto a stat line.
    pub fn apply_to(&self, stats: &mut StatLine) {
        stats.points += self.points;
        stats.fgm += self.fgm;
        stats.fga += self.fga;
        stats.tpm += self.tpm;
        stats.tpa += self.tpa;
        stats.ftm += self.ftm;
        stats.fta += self.fta;
        stats.oreb += self.oreb;
        stats.dreb += self.dreb;
        stats.assists += self.assists;
        stats.steals += self.steals;
        stats.blocks += self.blocks;
        stats.turnovers += self.turnovers;
        stats.fouls += self.fouls;
    }
}

/// Scoreboard impact of a confirm batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameDelta {
    /// Which score ledger the points credit.
    pub side: TeamSide,
    pub points: u32,
    /// True iff the batch contained at least one made field goal; the
    /// commit then restores the shot clock to [`SHOT_CLOCK_SECONDS`].
    pub shot_clock_reset: bool,
}

impl GameDelta {
    pub fn is_empty(&self) -> bool {
        self.points == 0 && !self.shot_clock_reset
    }

    pub fn shot_clock_value(&self) -> Option<u32> {
        self.shot_clock_reset.then_some(SHOT_CLOCK_SECONDS)
    }
}

/// Everything a confirm produces: the ordered event batch and both deltas.
#[derive(Clone, Debug, PartialEq)]
pub struct Derivation {
    pub events: Vec<GameEvent>,
    pub player: PlayerDelta,
    pub game: GameDelta,
}

/// Expands the buffer into events and aggregate deltas.
///
/// Event order is fixed by category: two-point makes, two-point misses,
/// three-point makes, three-point misses, free throws in recorded order,
/// assists, steals, blocks, turnovers, offensive rebounds, defensive
/// rebounds, fouls in recorded order. The order carries no wall-clock
/// significance (all events share one timestamp) but is stable so the
/// persisted feed reads consistently.
pub fn derive(buffer: &PendingStatBuffer, ctx: &DerivationContext<'_>) -> Derivation {
    let mut events = Vec::new();
    let mut delta = PlayerDelta::default();

    for _ in 0..buffer.two_made() {
        delta.fgm += 1;
        delta.fga += 1;
        delta.points += 2;
        events.push(draft_event(ctx, EventKind::TwoMade));
    }
    for _ in 0..buffer.two_missed() {
        delta.fga += 1;
        events.push(draft_event(ctx, EventKind::TwoMissed));
    }
    for _ in 0..buffer.three_made() {
        delta.fgm += 1;
        delta.fga += 1;
        delta.tpm += 1;
        delta.tpa += 1;
        delta.points += 3;
        events.push(draft_event(ctx, EventKind::ThreeMade));
    }
    for _ in 0..buffer.three_missed() {
        delta.fga += 1;
        delta.tpa += 1;
        events.push(draft_event(ctx, EventKind::ThreeMissed));
    }

    // Attempts are exactly the trip length, regardless of makes.
    for outcome in buffer.free_throws() {
        delta.fta += 1;
        if outcome.is_made() {
            delta.ftm += 1;
            delta.points += 1;
            events.push(draft_event(ctx, EventKind::FreeThrowMade));
        } else {
            events.push(draft_event(ctx, EventKind::FreeThrowMissed));
        }
    }

    for _ in 0..buffer.assists() {
        delta.assists += 1;
        events.push(draft_event(ctx, EventKind::Assist));
    }
    for _ in 0..buffer.steals() {
        delta.steals += 1;
        events.push(draft_event(ctx, EventKind::Steal));
    }
    for _ in 0..buffer.blocks() {
        delta.blocks += 1;
        events.push(draft_event(ctx, EventKind::Block));
    }
    for _ in 0..buffer.turnovers() {
        delta.turnovers += 1;
        events.push(draft_event(ctx, EventKind::Turnover));
    }
    for _ in 0..buffer.offensive_rebounds() {
        delta.oreb += 1;
        events.push(draft_event(ctx, EventKind::OffensiveRebound));
    }
    for _ in 0..buffer.defensive_rebounds() {
        delta.dreb += 1;
        events.push(draft_event(ctx, EventKind::DefensiveRebound));
    }

    // Every sub-type counts toward the same fouls counter.
    for kind in buffer.fouls() {
        delta.fouls += 1;
        events.push(draft_event(ctx, EventKind::from(*kind)));
    }

    let game = GameDelta {
        side: ctx.player.side,
        points: delta.points,
        shot_clock_reset: buffer.two_made() > 0 || buffer.three_made() > 0,
    };

    Derivation {
        events,
        player: delta,
        game,
    }
}

fn draft_event(ctx: &DerivationContext<'_>, kind: EventKind) -> GameEvent {
    let player = ctx.player;
    let game = ctx.game;
    GameEvent::draft(
        game.id.clone(),
        player.id.clone(),
        kind,
        game.period,
        game.clock_seconds,
        format!("{} (#{}) {}", player.name, player.jersey, kind.phrase()),
    )
}
