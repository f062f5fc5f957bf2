//! Collection bundle handed to sessions, plus the [`Entity`] impls binding
//! the core record types to their collections.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use score_core::{Game, GameEvent, Player, RecordId};

use crate::store::{Collection, Entity, JsonCollection, MemoryCollection, Result};

impl Entity for Player {
    const COLLECTION: &'static str = "players";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn assign_meta(&mut self, id: RecordId, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }
}

impl Entity for Game {
    const COLLECTION: &'static str = "games";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn assign_meta(&mut self, id: RecordId, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }
}

impl Entity for GameEvent {
    const COLLECTION: &'static str = "game_events";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn assign_meta(&mut self, id: RecordId, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }
}

/// The persistence surface the stat-entry core consumes: one collection per
/// entity, sharing a backend.
///
/// Cloning is cheap; clones share the underlying collections.
#[derive(Clone)]
pub struct Gateway {
    pub players: Arc<dyn Collection<Player>>,
    pub games: Arc<dyn Collection<Game>>,
    pub events: Arc<dyn Collection<GameEvent>>,
}

impl Gateway {
    /// Volatile in-memory backend for tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            players: Arc::new(MemoryCollection::new()),
            games: Arc::new(MemoryCollection::new()),
            events: Arc::new(MemoryCollection::new()),
        }
    }

    /// JSON-file backend rooted at `base_dir`.
    pub fn json(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        Ok(Self {
            players: Arc::new(JsonCollection::open(base_dir)?),
            games: Arc::new(JsonCollection::open(base_dir)?),
            events: Arc::new(JsonCollection::open(base_dir)?),
        })
    }
}
