// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use crate::Operation;
use isched_core::{Installation, InstallationId, InstallationQuery};
use std::collections::BTreeMap;

/// Installations built from WAL operations
#[derive(Debug, Default)]
pub struct MaterializedState {
    pub installations: BTreeMap<InstallationId, Installation>,
    last_id: u64,
}

impl MaterializedState {
    /// Id the next created installation will receive; ids start at 1
    pub fn next_id(&self) -> InstallationId {
        InstallationId(self.last_id + 1)
    }

    pub fn get(&self, id: InstallationId) -> Option<&Installation> {
        self.installations.get(&id)
    }

    /// Matching installations ordered by scheduled start, then id
    pub fn query(&self, query: &InstallationQuery) -> Vec<Installation> {
        let mut found: Vec<Installation> = self
            .installations
            .values()
            .filter(|inst| query.matches(inst))
            .cloned()
            .collect();
        found.sort_by_key(|inst| (inst.scheduled_at, inst.id));
        found
    }

    pub fn count(&self, query: &InstallationQuery) -> usize {
        self.installations
            .values()
            .filter(|inst| query.matches(inst))
            .count()
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::InstallationCreate { installation } => {
                self.last_id = self.last_id.max(installation.id.0);
                self.installations
                    .insert(installation.id, installation.clone());
            }

            Operation::InstallationUpdate { installation } => {
                if let Some(existing) = self.installations.get_mut(&installation.id) {
                    *existing = installation.clone();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
