// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-installer exclusive sections
//!
//! Every check-then-write on an installer's calendar runs while holding that
//! installer's lock. Multiple installers are always locked in ascending id
//! order so two callers can never wait on each other.

use isched_core::InstallerId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of one async mutex per installer
#[derive(Clone, Default)]
pub struct InstallerLocks {
    slots: Arc<Mutex<HashMap<InstallerId, Arc<AsyncMutex<()>>>>>,
}

/// Held locks; released on drop
#[derive(Debug)]
pub struct InstallerGuard {
    installers: Vec<InstallerId>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl InstallerGuard {
    pub fn covers(&self, id: InstallerId) -> bool {
        self.installers.contains(&id)
    }
}

impl InstallerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: InstallerId) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.entry(id).or_default().clone()
    }

    pub async fn lock(&self, id: InstallerId) -> InstallerGuard {
        self.lock_all(&[id]).await
    }

    /// Lock several installers; duplicates are locked once
    pub async fn lock_all(&self, ids: &[InstallerId]) -> InstallerGuard {
        let mut installers = ids.to_vec();
        installers.sort();
        installers.dedup();

        let mut guards = Vec::with_capacity(installers.len());
        for id in &installers {
            guards.push(self.slot(*id).lock_owned().await);
        }
        InstallerGuard {
            installers,
            _guards: guards,
        }
    }

    /// Installers that have been locked at least once
    pub fn tracked(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl std::fmt::Debug for InstallerLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallerLocks")
            .field("tracked", &self.tracked())
            .finish()
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
