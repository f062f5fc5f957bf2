//! Device-local scorekeeper preferences.
//!
//! Holds the clock running flag per game so a reopened scorer's table
//! resumes where it left off. This is session-scoped local state, not part
//! of the shared game record.

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use score_core::RecordId;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClockPrefs {
    pub running: bool,
}

/// File-per-game prefs store under a local data directory.
pub struct PrefsStore {
    dir: PathBuf,
}

impl PrefsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform-default location; `None` when no home directory can be
    /// resolved.
    pub fn open_default() -> Option<Self> {
        ProjectDirs::from("", "", "courtside")
            .map(|dirs| Self::new(dirs.data_local_dir().join("clock")))
    }

    /// Missing or unreadable prefs fall back to the default (paused).
    pub fn load(&self, game_id: &RecordId) -> ClockPrefs {
        let raw = match fs::read_to_string(self.path(game_id)) {
            Ok(raw) => raw,
            Err(_) => return ClockPrefs::default(),
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    pub fn save(&self, game_id: &RecordId, prefs: ClockPrefs) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string(&prefs).map_err(io::Error::other)?;
        fs::write(self.path(game_id), raw)
    }

    fn path(&self, game_id: &RecordId) -> PathBuf {
        self.dir.join(format!("clock_{game_id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_prefs_default_to_paused() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::new(dir.path());
        assert!(!store.load(&RecordId::from("game-1")).running);
    }

    #[test]
    fn run_state_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::new(dir.path());
        let game = RecordId::from("game-1");

        store.save(&game, ClockPrefs { running: true }).unwrap();
        assert!(store.load(&game).running);

        store.save(&game, ClockPrefs { running: false }).unwrap();
        assert!(!store.load(&game).running);
    }

    #[test]
    fn prefs_are_scoped_per_game() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::new(dir.path());

        store
            .save(&RecordId::from("game-1"), ClockPrefs { running: true })
            .unwrap();
        assert!(!store.load(&RecordId::from("game-2")).running);
    }
}
