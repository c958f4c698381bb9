// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling new installations

use crate::capacity::has_capacity;
use crate::conflict::find_conflicts;
use crate::engine::Engine;
use crate::{OpContext, ScheduleError};
use isched_adapters::{InstallerDirectory, Notice, NotifyAdapter};
use isched_core::{
    Clock, Installation, InstallationId, Installer, NewInstallation, TimeWindow,
    WorkingHoursPolicy,
};
use isched_storage::InstallationStore;
use tracing::Instrument;

/// Outcome of checking one installer for one time slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SlotCheck {
    Free,
    Unavailable,
    Conflict(Vec<InstallationId>),
    Full,
}

impl SlotCheck {
    /// Turn a rejection into its error; `Free` maps to `Ok`
    pub(crate) fn into_result(
        self,
        installer: &Installer,
        window: &TimeWindow,
    ) -> Result<(), ScheduleError> {
        match self {
            SlotCheck::Free => Ok(()),
            SlotCheck::Unavailable => Err(ScheduleError::InstallerUnavailable {
                installer: installer.id,
                at: window.start,
            }),
            SlotCheck::Conflict(conflicts) => Err(ScheduleError::ScheduleConflict {
                installer: installer.id,
                at: window.start,
                conflicts,
            }),
            SlotCheck::Full => Err(ScheduleError::DailyCapacityExceeded {
                installer: installer.id,
                date: installer.local_date(window.start),
                max: installer.max_daily(),
            }),
        }
    }
}

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    /// Availability, then conflicts, then capacity; first failure wins
    pub(crate) async fn evaluate_slot(
        &self,
        installer: &Installer,
        window: TimeWindow,
        exclude: Option<InstallationId>,
        cx: &OpContext,
    ) -> Result<SlotCheck, ScheduleError> {
        if !installer.is_available_on_date(window.start) {
            return Ok(SlotCheck::Unavailable);
        }
        if self.config.working_hours == WorkingHoursPolicy::Enforce
            && !installer.within_working_hours(&window)
        {
            return Ok(SlotCheck::Unavailable);
        }

        let conflicts = cx
            .run(find_conflicts(
                &self.store,
                installer.id,
                window,
                exclude,
                self.config.buffer_duration(),
            ))
            .await?;
        if !conflicts.is_empty() {
            return Ok(SlotCheck::Conflict(
                conflicts.iter().map(|inst| inst.id).collect(),
            ));
        }

        let date = installer.local_date(window.start);
        if !cx
            .run(has_capacity(&self.store, installer, date, exclude))
            .await?
        {
            return Ok(SlotCheck::Full);
        }

        Ok(SlotCheck::Free)
    }

    /// Validate and persist a new Planned installation, then notify in the
    /// background.
    pub async fn schedule(
        &self,
        new: NewInstallation,
        cx: &OpContext,
    ) -> Result<Installation, ScheduleError> {
        let cx = self.context(cx);
        let span = tracing::info_span!(
            "schedule",
            installer = %new.installer_id,
            at = %new.scheduled_at,
            minutes = new.estimated_minutes,
        );

        async move {
            if new.estimated_minutes == 0 {
                return Err(ScheduleError::InvalidDuration);
            }

            let _guard = cx
                .run(async { Ok::<_, ScheduleError>(self.locks.lock(new.installer_id).await) })
                .await?;

            let installer = self.load_installer(new.installer_id, &cx).await?;
            let window = new.window();
            let check = self.evaluate_slot(&installer, window, None, &cx).await?;
            if let Err(e) = check.into_result(&installer, &window) {
                tracing::debug!(error = %e, "schedule rejected");
                return Err(e);
            }

            cx.check()?;
            let installation = self.store.insert(new).await?;
            tracing::info!(installation = %installation.id, "installation scheduled");

            self.notices.dispatch(Notice::created(installation.clone()));
            Ok(installation)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
