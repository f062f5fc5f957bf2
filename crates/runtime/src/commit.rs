//! Three-way commit of a confirm batch: events, player, game.
//!
//! The three writes carry no ordering dependency, so they are issued
//! concurrently and joined before the caller may reset its buffer. There
//! is no transaction and no rollback: a leg that fails after another
//! succeeded leaves persisted state inconsistent, and the error names the
//! failed legs so the scorekeeper can recover manually.

use std::fmt;

use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};

use score_core::{Derivation, Game, GameEvent, Player, TeamSide};

use crate::gateway::Gateway;
use crate::store::StoreError;

/// Which of the three coordinated writes is being reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitLeg {
    Events,
    Player,
    Game,
}

impl CommitLeg {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitLeg::Events => "events",
            CommitLeg::Player => "player",
            CommitLeg::Game => "game",
        }
    }
}

impl fmt::Display for CommitLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed write within a commit.
#[derive(Debug)]
pub struct LegFailure {
    pub leg: CommitLeg,
    pub error: StoreError,
}

/// Outcome of a commit that did not fully apply.
///
/// `applied` counts the legs that succeeded before the join observed the
/// failures; anything between 1 and 2 means the persisted records disagree
/// until the scorekeeper re-enters the lost writes.
#[derive(Debug, Error)]
#[error("commit applied {applied} of 3 writes; failed legs: {legs}", legs = failed_legs(.failures))]
pub struct CommitError {
    pub applied: usize,
    pub failures: Vec<LegFailure>,
}

fn failed_legs(failures: &[LegFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.leg.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything the commit persisted, as stored (ids and stamps assigned).
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    pub events: Vec<GameEvent>,
    pub player: Player,
    pub game: Game,
}

/// Persists a derivation against the player/game snapshots it was computed
/// from.
///
/// Both patches carry absolute values computed from the caller's last-read
/// snapshots; a concurrent writer's increments are overwritten, not merged
/// (documented last-write-wins semantics).
pub async fn commit(
    gateway: &Gateway,
    derivation: Derivation,
    player: &Player,
    game: &Game,
) -> Result<CommitReceipt, CommitError> {
    let Derivation {
        events,
        player: player_delta,
        game: game_delta,
    } = derivation;

    let mut stats = player.stats;
    player_delta.apply_to(&mut stats);
    let player_patch = json!({ "stats": stats });

    let mut game_patch = serde_json::Map::new();
    let score_field = match game_delta.side {
        TeamSide::Home => "home_score",
        TeamSide::Away => "away_score",
    };
    game_patch.insert(
        score_field.to_owned(),
        json!(game.score_for(game_delta.side) + game_delta.points),
    );
    if let Some(reset) = game_delta.shot_clock_value() {
        game_patch.insert("shot_clock_seconds".to_owned(), json!(reset));
    }

    debug!(
        player = %player.id,
        game = %game.id,
        events = events.len(),
        points = game_delta.points,
        "committing confirm batch"
    );

    let (events_result, player_result, game_result) = tokio::join!(
        gateway.events.bulk_create(events),
        gateway.players.update(&player.id, player_patch),
        gateway.games.update(&game.id, Value::Object(game_patch)),
    );

    let mut failures = Vec::new();
    let stored_events = events_result
        .map_err(|error| {
            failures.push(LegFailure {
                leg: CommitLeg::Events,
                error,
            });
        })
        .ok();
    let stored_player = player_result
        .map_err(|error| {
            failures.push(LegFailure {
                leg: CommitLeg::Player,
                error,
            });
        })
        .ok();
    let stored_game = game_result
        .map_err(|error| {
            failures.push(LegFailure {
                leg: CommitLeg::Game,
                error,
            });
        })
        .ok();

    match (stored_events, stored_player, stored_game) {
        (Some(events), Some(player), Some(game)) => {
            info!(
                player = %player.id,
                events = events.len(),
                points = game_delta.points,
                "confirm batch committed"
            );
            Ok(CommitReceipt {
                events,
                player,
                game,
            })
        }
        _ => {
            let applied = 3 - failures.len();
            for failure in &failures {
                warn!(leg = failure.leg.as_str(), error = %failure.error, "commit leg failed");
            }
            Err(CommitError { applied, failures })
        }
    }
}
