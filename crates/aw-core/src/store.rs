//! Snapshot storage abstraction.
//!
//! The engine itself is pure; callers load a snapshot from a store, run
//! the lookups and sweeps they need, and persist any replacement through
//! the same trait. The in-memory implementation backs the CLI and tests.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::snapshot::Snapshot;

/// Errors from snapshot storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing source could not be read.
    #[error("failed to load snapshot: {0}")]
    Load(String),

    /// The backing source could not be written.
    #[error("failed to persist snapshot: {0}")]
    Persist(String),

    /// The stored payload could not be decoded.
    #[error("snapshot deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend for inventory snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns a copy of the current snapshot.
    async fn current(&self) -> StoreResult<Snapshot>;

    /// Replaces the stored snapshot wholesale.
    async fn replace(&self, snapshot: Snapshot) -> StoreResult<()>;
}

/// In-memory store guarded by an async lock.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl InMemorySnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn current(&self) -> StoreResult<Snapshot> {
        let guard = self.inner.read().await;
        Ok(guard.clone())
    }

    async fn replace(&self, snapshot: Snapshot) -> StoreResult<()> {
        debug!(records = snapshot.record_count(), "replacing snapshot");
        let mut guard = self.inner.write().await;
        *guard = snapshot;
        Ok(())
    }
}
