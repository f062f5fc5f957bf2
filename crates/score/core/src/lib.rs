//! Deterministic scorekeeping logic and data types shared across clients.
//!
//! `score-core` defines the canonical rules of live stat entry (the pending
//! buffer, the event-derivation engine, the clock state machine) and exposes
//! pure APIs that can be reused by both the runtime and offline tools. All
//! working-copy mutation flows through [`buffer::PendingStatBuffer`] and
//! [`engine::derive`]; nothing in this crate performs I/O.
pub mod buffer;
pub mod clock;
pub mod engine;
pub mod model;

pub use buffer::{FREE_THROW_TRIP_CAP, FoulKind, PendingStatBuffer, ShotOutcome, StatEntry};
pub use clock::{GameClocks, RunState, SHOT_CLOCK_SECONDS};
pub use engine::{Derivation, DerivationContext, GameDelta, PlayerDelta, derive};
pub use model::{
    EventKind, Game, GameEvent, Player, Position, RecordId, StatLine, TeamInfo, TeamSide,
};
