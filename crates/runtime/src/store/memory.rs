//! In-memory collection backend for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use score_core::RecordId;

use super::query::{self, Predicate, SortSpec};
use super::{Collection, Entity, Result, StoreError};

/// In-memory implementation of [`Collection`].
///
/// Records are keyed by id; iteration order is the id order, so callers
/// wanting a meaningful order pass a sort spec.
pub struct MemoryCollection<E: Entity> {
    records: RwLock<BTreeMap<RecordId, E>>,
}

impl<E: Entity> MemoryCollection<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn snapshot(&self) -> Result<Vec<E>> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.values().cloned().collect())
    }
}

impl<E: Entity> Default for MemoryCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Collection<E> for MemoryCollection<E> {
    async fn list(&self, sort: Option<SortSpec>, limit: Option<usize>) -> Result<Vec<E>> {
        query::apply_query(self.snapshot()?, None, sort.as_ref(), limit)
    }

    async fn filter(
        &self,
        predicate: &Predicate,
        sort: Option<SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<E>> {
        query::apply_query(self.snapshot()?, Some(predicate), sort.as_ref(), limit)
    }

    async fn get(&self, id: &RecordId) -> Result<E> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<E>(id))
    }

    async fn create(&self, mut record: E) -> Result<E> {
        record.assign_meta(RecordId::new(Uuid::new_v4().to_string()), Utc::now());
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        records.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    async fn bulk_create(&self, records: Vec<E>) -> Result<Vec<E>> {
        let now = Utc::now();
        let mut stored = Vec::with_capacity(records.len());
        let mut map = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        for mut record in records {
            record.assign_meta(RecordId::new(Uuid::new_v4().to_string()), now);
            map.insert(record.id().clone(), record.clone());
            stored.push(record);
        }
        Ok(stored)
    }

    async fn update(&self, id: &RecordId, patch: Value) -> Result<E> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        let current = records
            .get(id)
            .ok_or_else(|| StoreError::not_found::<E>(id))?;
        let updated = query::merge_patch(current, &patch)?;
        records.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found::<E>(id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use score_core::{Player, Position, TeamSide};

    use super::*;

    fn roster_entry(name: &str, jersey: u8) -> Player {
        Player::new(
            RecordId::from("game-1"),
            name,
            jersey,
            Position::PointGuard,
            TeamSide::Home,
        )
    }

    #[tokio::test]
    async fn create_assigns_id_and_creation_stamp() {
        let store = MemoryCollection::<Player>::new();
        let stored = store.create(roster_entry("Sam Ito", 4)).await.unwrap();

        assert!(stored.id.is_assigned());
        assert!(stored.created_at > chrono::DateTime::UNIX_EPOCH);
        assert_eq!(store.get(&stored.id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = MemoryCollection::<Player>::new();
        let err = store.get(&RecordId::from("missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn filter_sort_and_limit() {
        let store = MemoryCollection::<Player>::new();
        store.create(roster_entry("A", 12)).await.unwrap();
        store.create(roster_entry("B", 7)).await.unwrap();
        let mut other = roster_entry("C", 3);
        other.game_id = RecordId::from("game-2");
        store.create(other).await.unwrap();

        let mut predicate = Predicate::new();
        predicate.insert("game_id".into(), json!("game-1"));
        let players = store
            .filter(&predicate, Some(SortSpec::ascending("jersey")), None)
            .await
            .unwrap();
        let jerseys: Vec<u8> = players.iter().map(|p| p.jersey).collect();
        assert_eq!(jerseys, vec![7, 12]);

        let top = store
            .list(Some(SortSpec::descending("jersey")), Some(1))
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].jersey, 12);
    }

    #[tokio::test]
    async fn update_merges_fields_and_protects_metadata() {
        let store = MemoryCollection::<Player>::new();
        let stored = store.create(roster_entry("Sam Ito", 4)).await.unwrap();

        let updated = store
            .update(
                &stored.id,
                json!({"jersey": 11, "id": "hijacked", "created_at": "2001-01-01T00:00:00Z"}),
            )
            .await
            .unwrap();

        assert_eq!(updated.jersey, 11);
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.name, "Sam Ito");
    }

    #[tokio::test]
    async fn update_rejects_non_object_patch() {
        let store = MemoryCollection::<Player>::new();
        let stored = store.create(roster_entry("Sam Ito", 4)).await.unwrap();
        let err = store.update(&stored.id, json!(42)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPatch(_)));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = MemoryCollection::<Player>::new();
        let stored = store.create(roster_entry("Sam Ito", 4)).await.unwrap();
        store.delete(&stored.id).await.unwrap();
        assert!(store.get(&stored.id).await.unwrap_err().is_not_found());
        assert!(store.delete(&stored.id).await.unwrap_err().is_not_found());
    }
}
