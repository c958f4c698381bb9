// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conflict detection
//!
//! A candidate conflicts with an existing Planned or InProgress installation
//! of the same installer when their buffered windows overlap. Windows that
//! only touch at an edge do not conflict.

use crate::engine::Engine;
use crate::{OpContext, ScheduleError};
use chrono::{DateTime, Duration, Utc};
use isched_adapters::{InstallerDirectory, NotifyAdapter};
use isched_core::{
    Clock, Installation, InstallationId, InstallationQuery, InstallerId, TimeWindow,
};
use isched_storage::{InstallationStore, StoreError};

/// Active installations of `installer` whose buffered window overlaps the
/// buffered `candidate`, skipping `exclude`
pub async fn find_conflicts<S: InstallationStore>(
    store: &S,
    installer: InstallerId,
    candidate: TimeWindow,
    exclude: Option<InstallationId>,
    buffer: Duration,
) -> Result<Vec<Installation>, StoreError> {
    let probe = candidate.padded(buffer);
    // An existing job can only reach the probe if its padded start is before the probe's end
    let query = InstallationQuery::new()
        .installer(installer)
        .active()
        .scheduled_before(probe.end + buffer);

    let existing = store.list(&query).await?;
    Ok(existing
        .into_iter()
        .filter(|inst| Some(inst.id) != exclude)
        .filter(|inst| inst.buffered_window(buffer).overlaps(&probe))
        .collect())
}

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    /// Installations that a job at `start` lasting `duration_minutes` would
    /// collide with. Read-only.
    pub async fn find_conflicts(
        &self,
        installer: InstallerId,
        start: DateTime<Utc>,
        duration_minutes: u32,
        exclude: Option<InstallationId>,
        cx: &OpContext,
    ) -> Result<Vec<Installation>, ScheduleError> {
        let cx = self.context(cx);
        let window = TimeWindow::from_minutes(start, duration_minutes);
        cx.run(find_conflicts(
            &self.store,
            installer,
            window,
            exclude,
            self.config.buffer_duration(),
        ))
        .await
    }
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
