//! JSON-file collection backend for durable local data.
//!
//! One file per collection under a base directory, holding the full record
//! array. Every operation is a load-modify-store cycle guarded by a mutex;
//! this store has no append-only log and no cross-process locking, which is
//! adequate for a single scorer's table.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use score_core::RecordId;

use super::query::{self, Predicate, SortSpec};
use super::{Collection, Entity, Result, StoreError};

/// File-backed implementation of [`Collection`].
pub struct JsonCollection<E: Entity> {
    path: PathBuf,
    guard: Mutex<()>,
    _marker: PhantomData<E>,
}

impl<E: Entity> JsonCollection<E> {
    /// Opens (or prepares) `{base_dir}/{collection}.json`.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;
        Ok(Self {
            path: base_dir.join(format!("{}.json", E::COLLECTION)),
            guard: Mutex::new(()),
            _marker: PhantomData,
        })
    }

    fn load(&self) -> Result<Vec<E>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn store(&self, records: &[E]) -> Result<()> {
        let raw = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> Collection<E> for JsonCollection<E> {
    async fn list(&self, sort: Option<SortSpec>, limit: Option<usize>) -> Result<Vec<E>> {
        let _guard = self.guard.lock().map_err(|_| StoreError::LockPoisoned)?;
        query::apply_query(self.load()?, None, sort.as_ref(), limit)
    }

    async fn filter(
        &self,
        predicate: &Predicate,
        sort: Option<SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<E>> {
        let _guard = self.guard.lock().map_err(|_| StoreError::LockPoisoned)?;
        query::apply_query(self.load()?, Some(predicate), sort.as_ref(), limit)
    }

    async fn get(&self, id: &RecordId) -> Result<E> {
        let _guard = self.guard.lock().map_err(|_| StoreError::LockPoisoned)?;
        self.load()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::not_found::<E>(id))
    }

    async fn create(&self, mut record: E) -> Result<E> {
        let _guard = self.guard.lock().map_err(|_| StoreError::LockPoisoned)?;
        record.assign_meta(RecordId::new(Uuid::new_v4().to_string()), Utc::now());
        let mut records = self.load()?;
        records.push(record.clone());
        self.store(&records)?;
        Ok(record)
    }

    async fn bulk_create(&self, drafts: Vec<E>) -> Result<Vec<E>> {
        let _guard = self.guard.lock().map_err(|_| StoreError::LockPoisoned)?;
        let now = Utc::now();
        let mut records = self.load()?;
        let mut stored = Vec::with_capacity(drafts.len());
        for mut record in drafts {
            record.assign_meta(RecordId::new(Uuid::new_v4().to_string()), now);
            records.push(record.clone());
            stored.push(record);
        }
        self.store(&records)?;
        Ok(stored)
    }

    async fn update(&self, id: &RecordId, patch: Value) -> Result<E> {
        let _guard = self.guard.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut records = self.load()?;
        let slot = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::not_found::<E>(id))?;
        let updated = query::merge_patch(slot, &patch)?;
        *slot = updated.clone();
        self.store(&records)?;
        Ok(updated)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let _guard = self.guard.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(StoreError::not_found::<E>(id));
        }
        self.store(&records)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use score_core::{Game, TeamInfo};

    use super::*;

    fn demo_game() -> Game {
        Game::new(
            TeamInfo::new("Hawks", "#1d4ed8"),
            TeamInfo::new("Tigers", "#b91c1c"),
            480,
        )
    }

    #[tokio::test]
    async fn records_survive_reopening_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let stored = {
            let store = JsonCollection::<Game>::open(dir.path()).unwrap();
            store.create(demo_game()).await.unwrap()
        };

        let reopened = JsonCollection::<Game>::open(dir.path()).unwrap();
        let loaded = reopened.get(&stored.id).await.unwrap();
        assert_eq!(loaded, stored);
    }

    #[tokio::test]
    async fn update_persists_the_merge() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCollection::<Game>::open(dir.path()).unwrap();
        let stored = store.create(demo_game()).await.unwrap();

        store
            .update(&stored.id, json!({"home_score": 12, "period": 3}))
            .await
            .unwrap();

        let reopened = JsonCollection::<Game>::open(dir.path()).unwrap();
        let loaded = reopened.get(&stored.id).await.unwrap();
        assert_eq!(loaded.home_score, 12);
        assert_eq!(loaded.period, 3);
        assert_eq!(loaded.away_score, 0);
    }

    #[tokio::test]
    async fn bulk_create_keeps_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCollection::<Game>::open(dir.path()).unwrap();
        let mut first = demo_game();
        first.period = 1;
        let mut second = demo_game();
        second.period = 2;

        store.bulk_create(vec![first, second]).await.unwrap();
        let listed = store.list(None, None).await.unwrap();
        let periods: Vec<u8> = listed.iter().map(|g| g.period).collect();
        assert_eq!(periods, vec![1, 2]);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCollection::<Game>::open(dir.path()).unwrap();
        let err = store.delete(&RecordId::from("missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
