// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status changes outside of scheduling: start, complete, cancel, postpone

use crate::engine::Engine;
use crate::{OpContext, ScheduleError};
use isched_adapters::{InstallerDirectory, Notice, NotifyAdapter};
use isched_core::{Clock, Installation, InstallationId, InstallationStatus, TransitionError};
use isched_storage::InstallationStore;

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    /// Planned → InProgress
    pub async fn start(
        &self,
        id: InstallationId,
        cx: &OpContext,
    ) -> Result<Installation, ScheduleError> {
        self.change_status(
            id,
            cx,
            |inst| inst.transition(InstallationStatus::InProgress),
            Notice::updated,
        )
        .await
    }

    /// InProgress → Completed, recording how long the work really took
    pub async fn complete(
        &self,
        id: InstallationId,
        actual_minutes: u32,
        cx: &OpContext,
    ) -> Result<Installation, ScheduleError> {
        if actual_minutes == 0 {
            return Err(ScheduleError::InvalidDuration);
        }
        self.change_status(
            id,
            cx,
            |inst| inst.completed(actual_minutes),
            Notice::completed,
        )
        .await
    }

    /// Planned or InProgress → Cancelled
    pub async fn cancel(
        &self,
        id: InstallationId,
        cx: &OpContext,
    ) -> Result<Installation, ScheduleError> {
        self.change_status(
            id,
            cx,
            |inst| inst.transition(InstallationStatus::Cancelled),
            Notice::cancelled,
        )
        .await
    }

    /// Planned → Postponed; only [`Engine::reschedule`] brings it back
    pub async fn postpone(
        &self,
        id: InstallationId,
        cx: &OpContext,
    ) -> Result<Installation, ScheduleError> {
        self.change_status(
            id,
            cx,
            |inst| inst.transition(InstallationStatus::Postponed),
            Notice::updated,
        )
        .await
    }

    async fn change_status(
        &self,
        id: InstallationId,
        cx: &OpContext,
        apply: impl FnOnce(&Installation) -> Result<Installation, TransitionError>,
        notice: fn(Installation) -> Notice,
    ) -> Result<Installation, ScheduleError> {
        let cx = self.context(cx);
        let (_guard, current) = self.lock_installation(id, None, &cx).await?;
        let updated = apply(&current)?;

        cx.check()?;
        self.store.update(&updated).await?;
        tracing::info!(
            installation = %id,
            from = %current.status,
            to = %updated.status,
            "installation status changed"
        );

        self.notices.dispatch(notice(updated.clone()));
        Ok(updated)
    }
}
