//! Background clock ticker.
//!
//! A tokio task that drives [`ScoringSession::tick`] on a fixed one-second
//! schedule and services clock commands from a [`ClockHandle`]. The
//! running flag is mirrored to a device-local prefs file so a reopened
//! scorer's table resumes in the same state; the server-side clock still
//! only advances while this task is alive.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::prefs::{ClockPrefs, PrefsStore};
use crate::session::ScoringSession;

const COMMAND_CHANNEL_CAPACITY: usize = 16;

/// Commands the handle can send to the ticker task.
pub enum Command {
    Resume,
    Pause,
    ResetShotClock,
    Shutdown,
}

/// Client-facing handle for clock control.
pub struct ClockHandle {
    command_tx: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl ClockHandle {
    /// Starts the clock; subsequent ticks advance and persist the mirrors.
    pub async fn resume(&self) {
        self.send(Command::Resume).await;
    }

    /// Stops the clock; no ticking or persistence until resumed.
    pub async fn pause(&self) {
        self.send(Command::Pause).await;
    }

    /// Restores the shot clock immediately, independent of the run state.
    pub async fn reset_shot_clock(&self) {
        self.send(Command::ResetShotClock).await;
    }

    /// Stops the ticker task and waits for it to finish.
    pub async fn shutdown(self) {
        self.send(Command::Shutdown).await;
        let _ = self.task.await;
    }

    async fn send(&self, command: Command) {
        if self.command_tx.send(command).await.is_err() {
            warn!("clock ticker is no longer running");
        }
    }
}

/// The ticker worker; constructed and spawned via [`ClockTicker::spawn`].
pub struct ClockTicker {
    session: Arc<Mutex<ScoringSession>>,
    command_rx: mpsc::Receiver<Command>,
    prefs: Option<PrefsStore>,
    period: Duration,
}

impl ClockTicker {
    /// Spawns the ticker task for a session.
    ///
    /// When a prefs store is given, the persisted running flag is restored
    /// before the first tick and updated on every pause/resume.
    pub fn spawn(
        session: Arc<Mutex<ScoringSession>>,
        prefs: Option<PrefsStore>,
        period: Duration,
    ) -> ClockHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let ticker = Self {
            session,
            command_rx,
            prefs,
            period,
        };
        let task = tokio::spawn(ticker.run());
        ClockHandle { command_tx, task }
    }

    async fn run(mut self) {
        self.restore_run_state().await;

        // First tick lands one full period after spawn, not immediately.
        let mut ticks = interval_at(Instant::now() + self.period, self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("clock ticker started");
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    let mut session = self.session.lock().await;
                    match session.tick().await {
                        Ok(advanced) => {
                            if advanced {
                                debug!(
                                    clock = session.clocks().game_seconds,
                                    shot = session.clocks().shot_seconds,
                                    "tick persisted"
                                );
                            }
                        }
                        // Local to this tick; the next tick tries again
                        // with fresh mirrors, no retry of the lost write.
                        Err(error) => warn!(%error, "tick persistence failed"),
                    }
                }

                command = self.command_rx.recv() => match command {
                    Some(Command::Resume) => {
                        let mut session = self.session.lock().await;
                        session.resume_clock();
                        let game_id = session.game().id.clone();
                        drop(session);
                        self.save_run_state(&game_id, true);
                    }
                    Some(Command::Pause) => {
                        let mut session = self.session.lock().await;
                        session.pause_clock();
                        let game_id = session.game().id.clone();
                        drop(session);
                        self.save_run_state(&game_id, false);
                    }
                    Some(Command::ResetShotClock) => {
                        let mut session = self.session.lock().await;
                        if let Err(error) = session.reset_shot_clock().await {
                            warn!(%error, "shot clock reset failed");
                        }
                    }
                    Some(Command::Shutdown) | None => break,
                },
            }
        }
        info!("clock ticker stopped");
    }

    async fn restore_run_state(&self) {
        let Some(prefs) = &self.prefs else {
            return;
        };
        let mut session = self.session.lock().await;
        let game_id = session.game().id.clone();
        if prefs.load(&game_id).running {
            info!(game = %game_id, "restoring persisted running state");
            session.resume_clock();
        }
    }

    fn save_run_state(&self, game_id: &score_core::RecordId, running: bool) {
        let Some(prefs) = &self.prefs else {
            return;
        };
        if let Err(error) = prefs.save(game_id, ClockPrefs { running }) {
            warn!(%error, "failed to persist clock run state");
        }
    }
}
