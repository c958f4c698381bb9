// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory installer directory

use super::{DirectoryError, InstallerDirectory};
use async_trait::async_trait;
use isched_core::{Installer, InstallerId};
use std::sync::{Arc, RwLock};

/// Directory backed by a list held in memory.
///
/// Used for tests and for deployments that sync installers in from elsewhere.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    installers: Arc<RwLock<Vec<Installer>>>,
}

impl StaticDirectory {
    pub fn new(installers: Vec<Installer>) -> Self {
        Self {
            installers: Arc::new(RwLock::new(installers)),
        }
    }

    /// Insert or replace an installer, keeping its original position
    pub fn upsert(&self, installer: Installer) {
        let mut installers = self.installers.write().unwrap_or_else(|e| e.into_inner());
        match installers.iter_mut().find(|i| i.id == installer.id) {
            Some(existing) => *existing = installer,
            None => installers.push(installer),
        }
    }
}

#[async_trait]
impl InstallerDirectory for StaticDirectory {
    async fn get(&self, id: InstallerId) -> Result<Option<Installer>, DirectoryError> {
        let installers = self.installers.read().unwrap_or_else(|e| e.into_inner());
        Ok(installers.iter().find(|i| i.id == id).cloned())
    }

    async fn list_assignable(&self) -> Result<Vec<Installer>, DirectoryError> {
        let installers = self.installers.read().unwrap_or_else(|e| e.into_inner());
        Ok(installers
            .iter()
            .filter(|i| i.is_assignable())
            .cloned()
            .collect())
    }
}
