//! Scoring session: the explicit owner of one player's stat-entry flow.
//!
//! Lifecycle: `open(gateway, player_id, game_id)` → any number of
//! `record()`/`tick()` calls → `confirm()` → `close()`. The session owns
//! its pending buffer exclusively; nothing merges buffers across sessions,
//! and two sessions editing the same records race with last-write-wins
//! semantics at the store.

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use score_core::{
    Derivation, DerivationContext, Game, GameClocks, PendingStatBuffer, Player, RecordId,
    ShotOutcome, StatEntry, derive,
};

use crate::commit::{CommitError, CommitReceipt, commit};
use crate::events::SessionEvent;
use crate::gateway::Gateway;
use crate::store::StoreError;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors surfaced by the session lifecycle.
///
/// Every failure is terminal for the attempt that raised it: there is no
/// retry and no compensation, the scorekeeper re-enters what was lost.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("player {0} not found")]
    PlayerNotFound(RecordId),

    #[error("game {0} not found")]
    GameNotFound(RecordId),

    #[error("player {player} belongs to game {actual}, not {requested}")]
    PlayerNotInGame {
        player: RecordId,
        actual: RecordId,
        requested: RecordId,
    },

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One scorer's live view of a player sheet plus the game clock mirror.
pub struct ScoringSession {
    gateway: Gateway,
    player: Player,
    game: Game,
    buffer: PendingStatBuffer,
    clocks: GameClocks,
    events_tx: broadcast::Sender<SessionEvent>,
}

impl ScoringSession {
    /// Loads the player and game snapshots and activates an empty buffer.
    ///
    /// A missing record declines the session entirely; the caller renders
    /// a not-found state instead of a sheet.
    pub async fn open(
        gateway: Gateway,
        player_id: &RecordId,
        game_id: &RecordId,
    ) -> Result<Self, SessionError> {
        let player = gateway.players.get(player_id).await.map_err(|error| {
            if error.is_not_found() {
                SessionError::PlayerNotFound(player_id.clone())
            } else {
                SessionError::Store(error)
            }
        })?;
        let game = gateway.games.get(game_id).await.map_err(|error| {
            if error.is_not_found() {
                SessionError::GameNotFound(game_id.clone())
            } else {
                SessionError::Store(error)
            }
        })?;
        if player.game_id != game.id {
            return Err(SessionError::PlayerNotInGame {
                player: player.id.clone(),
                actual: player.game_id.clone(),
                requested: game.id.clone(),
            });
        }

        let clocks = GameClocks::new(game.clock_seconds, game.shot_clock_seconds);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        info!(player = %player.id, game = %game.id, "scoring session opened");
        Ok(Self {
            gateway,
            player,
            game,
            buffer: PendingStatBuffer::new(),
            clocks,
            events_tx,
        })
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn buffer(&self) -> &PendingStatBuffer {
        &self.buffer
    }

    pub fn clocks(&self) -> &GameClocks {
        &self.clocks
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    /// Records one button press into the pending buffer.
    ///
    /// Returns whether the entry was accepted (a free throw past the trip
    /// cap is ignored).
    pub fn record(&mut self, entry: StatEntry) -> bool {
        let accepted = self.buffer.record(entry);
        if !accepted {
            debug!(player = %self.player.id, "free-throw trip is full; entry ignored");
        }
        accepted
    }

    pub fn undo_last_free_throw(&mut self) -> Option<ShotOutcome> {
        self.buffer.undo_last_free_throw()
    }

    pub fn has_pending(&self) -> bool {
        self.buffer.has_pending()
    }

    /// Derives and commits the pending buffer.
    ///
    /// Confirming an empty buffer is a no-op: no events, no deltas, and no
    /// gateway calls. On success the local snapshots absorb the deltas and
    /// the buffer resets; on failure the buffer is left intact so nothing
    /// the scorer entered is silently lost.
    pub async fn confirm(&mut self) -> Result<Option<CommitReceipt>, SessionError> {
        if !self.buffer.has_pending() {
            debug!(player = %self.player.id, "confirm with empty buffer; nothing to commit");
            return Ok(None);
        }

        let derivation: Derivation = derive(
            &self.buffer,
            &DerivationContext {
                player: &self.player,
                game: &self.game,
            },
        );
        let shot_clock_reset = derivation.game.shot_clock_reset;
        let batch_points = derivation.game.points;
        let batch_len = derivation.events.len();

        let receipt = commit(&self.gateway, derivation, &self.player, &self.game).await?;

        self.player = receipt.player.clone();
        self.game.home_score = receipt.game.home_score;
        self.game.away_score = receipt.game.away_score;
        if shot_clock_reset {
            self.clocks.reset_shot_clock();
            self.game.shot_clock_seconds = self.clocks.shot_seconds;
        }
        self.buffer.reset();

        let _ = self.events_tx.send(SessionEvent::Committed {
            player_id: self.player.id.clone(),
            event_count: batch_len,
            points: batch_points,
        });
        Ok(Some(receipt))
    }

    pub fn clock_running(&self) -> bool {
        self.clocks.is_running()
    }

    pub fn resume_clock(&mut self) {
        self.clocks.resume();
        info!(game = %self.game.id, "game clock running");
    }

    pub fn pause_clock(&mut self) {
        self.clocks.pause();
        info!(game = %self.game.id, "game clock paused");
    }

    /// Advances the clock mirrors one second and flushes them to the game
    /// record. A paused clock neither ticks nor persists.
    pub async fn tick(&mut self) -> Result<bool, StoreError> {
        if !self.clocks.tick() {
            return Ok(false);
        }
        self.game.clock_seconds = self.clocks.game_seconds;
        self.game.shot_clock_seconds = self.clocks.shot_seconds;
        self.gateway
            .games
            .update(
                &self.game.id,
                serde_json::json!({
                    "clock_seconds": self.game.clock_seconds,
                    "shot_clock_seconds": self.game.shot_clock_seconds,
                }),
            )
            .await?;
        let _ = self.events_tx.send(SessionEvent::ClockTick {
            clock_seconds: self.game.clock_seconds,
            shot_clock_seconds: self.game.shot_clock_seconds,
        });
        Ok(true)
    }

    /// Restores the shot clock immediately, independent of the run state,
    /// and persists it.
    pub async fn reset_shot_clock(&mut self) -> Result<(), StoreError> {
        self.clocks.reset_shot_clock();
        self.game.shot_clock_seconds = self.clocks.shot_seconds;
        self.gateway
            .games
            .update(
                &self.game.id,
                serde_json::json!({ "shot_clock_seconds": self.game.shot_clock_seconds }),
            )
            .await?;
        let _ = self.events_tx.send(SessionEvent::ShotClockReset);
        Ok(())
    }

    /// Scorekeeper correction of the game clock between plays.
    pub async fn set_game_clock(&mut self, seconds: u32) -> Result<(), StoreError> {
        self.clocks.set_game_clock(seconds);
        self.game.clock_seconds = self.clocks.game_seconds;
        self.gateway
            .games
            .update(
                &self.game.id,
                serde_json::json!({ "clock_seconds": self.game.clock_seconds }),
            )
            .await?;
        Ok(())
    }

    /// Moves the game to the next period and restores the shot clock.
    pub async fn advance_period(&mut self) -> Result<u8, StoreError> {
        self.game.period += 1;
        self.clocks.reset_shot_clock();
        self.game.shot_clock_seconds = self.clocks.shot_seconds;
        self.gateway
            .games
            .update(
                &self.game.id,
                serde_json::json!({
                    "period": self.game.period,
                    "shot_clock_seconds": self.game.shot_clock_seconds,
                }),
            )
            .await?;
        let _ = self.events_tx.send(SessionEvent::PeriodAdvanced {
            period: self.game.period,
        });
        Ok(self.game.period)
    }

    /// Discards the session. Pending entries are dropped, matching the
    /// navigate-away behavior of the stat sheet.
    pub fn close(self) {
        if self.buffer.has_pending() {
            warn!(player = %self.player.id, "session closed with uncommitted entries; discarding");
        } else {
            debug!(player = %self.player.id, "scoring session closed");
        }
    }
}
