// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installation persistence

use crate::{MaterializedState, Operation, Wal, WalError};
use async_trait::async_trait;
use isched_core::{Installation, InstallationId, InstallationQuery, NewInstallation};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors from the persistence collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("installation not found: {0}")]
    NotFound(InstallationId),
    #[error("write-ahead log error: {0}")]
    Wal(#[from] WalError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Transactional access to installation records.
///
/// Each write is atomic: it either lands completely or not at all.
#[async_trait]
pub trait InstallationStore: Clone + Send + Sync + 'static {
    async fn get(&self, id: InstallationId) -> Result<Option<Installation>, StoreError>;

    /// Matching records ordered by scheduled start ascending, then id
    async fn list(&self, query: &InstallationQuery) -> Result<Vec<Installation>, StoreError>;

    async fn count(&self, query: &InstallationQuery) -> Result<usize, StoreError>;

    /// Persist a new Planned installation and return it with its assigned id
    async fn insert(&self, new: NewInstallation) -> Result<Installation, StoreError>;

    /// Replace an existing record
    async fn update(&self, installation: &Installation) -> Result<(), StoreError>;
}

struct Inner {
    state: MaterializedState,
    wal: Option<Wal>,
}

impl Inner {
    /// Log first, then apply; a failed append leaves the state untouched
    fn commit(&mut self, op: Operation) -> Result<(), StoreError> {
        if let Some(wal) = self.wal.as_mut() {
            wal.append(&op)?;
        }
        self.state.apply(&op);
        Ok(())
    }
}

/// In-memory store with an optional write-ahead log for durability
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Volatile store with no log
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: MaterializedState::default(),
                wal: None,
            })),
        }
    }

    /// Open a durable store, replaying any existing log at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let (wal, ops) = Wal::open(path)?;
        let mut state = MaterializedState::default();
        for op in &ops {
            state.apply(op);
        }
        tracing::info!(
            path = %path.display(),
            replayed = ops.len(),
            installations = state.installations.len(),
            "opened installation store"
        );
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                wal: Some(wal),
            })),
        })
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.with_inner(|inner| {
            f.debug_struct("MemoryStore")
                .field("installations", &inner.state.installations.len())
                .field("wal", &inner.wal)
                .finish()
        })
    }
}

#[async_trait]
impl InstallationStore for MemoryStore {
    async fn get(&self, id: InstallationId) -> Result<Option<Installation>, StoreError> {
        Ok(self.with_inner(|inner| inner.state.get(id).cloned()))
    }

    async fn list(&self, query: &InstallationQuery) -> Result<Vec<Installation>, StoreError> {
        Ok(self.with_inner(|inner| inner.state.query(query)))
    }

    async fn count(&self, query: &InstallationQuery) -> Result<usize, StoreError> {
        Ok(self.with_inner(|inner| inner.state.count(query)))
    }

    async fn insert(&self, new: NewInstallation) -> Result<Installation, StoreError> {
        self.with_inner(|inner| {
            let installation = Installation::planned(inner.state.next_id(), new);
            inner.commit(Operation::InstallationCreate {
                installation: installation.clone(),
            })?;
            Ok(installation)
        })
    }

    async fn update(&self, installation: &Installation) -> Result<(), StoreError> {
        self.with_inner(|inner| {
            if inner.state.get(installation.id).is_none() {
                return Err(StoreError::NotFound(installation.id));
            }
            inner.commit(Operation::InstallationUpdate {
                installation: installation.clone(),
            })
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
