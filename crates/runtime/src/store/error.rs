//! Error types raised by store implementations.

use thiserror::Error;

use score_core::RecordId;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    NotFound {
        collection: &'static str,
        id: RecordId,
    },

    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid patch: {0}")]
    InvalidPatch(String),
}

impl StoreError {
    pub fn not_found<E: super::Entity>(id: &RecordId) -> Self {
        Self::NotFound {
            collection: E::COLLECTION,
            id: id.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
