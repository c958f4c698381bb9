// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daily capacity guard

use crate::engine::Engine;
use crate::{OpContext, ScheduleError};
use chrono::NaiveDate;
use isched_adapters::{InstallerDirectory, NotifyAdapter};
use isched_core::{Clock, InstallationId, InstallationQuery, Installer, InstallerId};
use isched_storage::{InstallationStore, StoreError};

/// Planned or InProgress jobs of `installer` starting on its local `date`,
/// not counting `exclude`
pub async fn booked_on<S: InstallationStore>(
    store: &S,
    installer: &Installer,
    date: NaiveDate,
    exclude: Option<InstallationId>,
) -> Result<usize, StoreError> {
    let day = installer.day_window(date);
    let query = InstallationQuery::new()
        .installer(installer.id)
        .active()
        .scheduled_from(day.start)
        .scheduled_before(day.end);

    match exclude {
        None => store.count(&query).await,
        Some(excluded) => Ok(store
            .list(&query)
            .await?
            .iter()
            .filter(|inst| inst.id != excluded)
            .count()),
    }
}

/// Whether one more job fits on the installer's local `date`.
///
/// The count is taken before the candidate is added, so callers must hold the
/// installer's lock until their write lands.
pub async fn has_capacity<S: InstallationStore>(
    store: &S,
    installer: &Installer,
    date: NaiveDate,
    exclude: Option<InstallationId>,
) -> Result<bool, StoreError> {
    let booked = booked_on(store, installer, date, exclude).await?;
    Ok(booked < installer.max_daily() as usize)
}

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    pub async fn has_capacity(
        &self,
        installer: InstallerId,
        date: NaiveDate,
        cx: &OpContext,
    ) -> Result<bool, ScheduleError> {
        let cx = self.context(cx);
        let installer = self.load_installer(installer, &cx).await?;
        cx.run(has_capacity(&self.store, &installer, date, None)).await
    }
}
