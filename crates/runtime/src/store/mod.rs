//! Persistence gateway contracts: the generic entity-store surface the
//! stat-entry core consumes.
//!
//! Each persisted collection is accessed through [`Collection`], a dyn-safe
//! async trait offering the full store vocabulary (`list`, `filter`, `get`,
//! `create`, `bulk_create`, `update`, `delete`). Backends: an in-memory
//! store for tests and local runs, and a JSON-file store for durable local
//! data.

mod error;
mod file;
mod memory;
mod query;

pub use error::{Result, StoreError};
pub use file::JsonCollection;
pub use memory::MemoryCollection;
pub use query::{Predicate, SortOrder, SortSpec};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use score_core::RecordId;

/// A record type persisted in a named collection.
///
/// The store owns the record's metadata: `create`/`bulk_create` stamp a
/// fresh id and creation time via [`Entity::assign_meta`], and `update`
/// refuses to patch either field.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Collection name the records live under.
    const COLLECTION: &'static str;

    fn id(&self) -> &RecordId;

    /// Called by the store when the record is first persisted.
    fn assign_meta(&mut self, id: RecordId, created_at: DateTime<Utc>);
}

/// Generic entity-store contract, one instance per collection.
///
/// Writes are whole-field overwrites from the caller's last-read snapshot:
/// two writers racing on the same record will not merge, the second write
/// wins. Concurrent-scorer conflict resolution is deliberately out of
/// scope.
#[async_trait]
pub trait Collection<E: Entity>: Send + Sync {
    /// All records, optionally sorted and truncated.
    async fn list(&self, sort: Option<SortSpec>, limit: Option<usize>) -> Result<Vec<E>>;

    /// Records whose serialized top-level fields equal every entry of the
    /// predicate map.
    async fn filter(
        &self,
        predicate: &Predicate,
        sort: Option<SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<E>>;

    /// A single record; [`StoreError::NotFound`] if absent.
    async fn get(&self, id: &RecordId) -> Result<E>;

    /// Persists a record, stamping id and creation time. Returns the
    /// stored record.
    async fn create(&self, record: E) -> Result<E>;

    /// Persists a batch in order; each record is stamped like `create`.
    async fn bulk_create(&self, records: Vec<E>) -> Result<Vec<E>>;

    /// Merges a partial JSON object into the stored record and returns the
    /// result. `id` and `created_at` are immutable and ignored if present
    /// in the patch.
    async fn update(&self, id: &RecordId, patch: Value) -> Result<E>;

    async fn delete(&self, id: &RecordId) -> Result<()>;
}
