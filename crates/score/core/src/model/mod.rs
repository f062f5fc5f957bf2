//! Persisted record types consumed by the stat-entry core.
//!
//! These mirror the rows the persistence gateway stores: long-lived
//! [`Player`] and [`Game`] snapshots and append-only [`GameEvent`] records.
mod common;
mod event;
mod game;
mod player;

pub use common::{RecordId, TeamSide};
pub use event::{EventKind, GameEvent};
pub use game::{Game, TeamInfo};
pub use player::{Player, Position, StatLine};
