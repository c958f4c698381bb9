// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Moving an existing installation to a new time or installer

use crate::engine::Engine;
use crate::{OpContext, ScheduleError};
use chrono::{DateTime, Utc};
use isched_adapters::{InstallerDirectory, Notice, NotifyAdapter};
use isched_core::{Clock, Installation, InstallationId, InstallerId};
use isched_storage::InstallationStore;
use tracing::Instrument;

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    /// Move installation `id` to `scheduled_at`, optionally handing it to
    /// `new_installer`. The same checks as [`Engine::schedule`] run against the
    /// target installer, ignoring the installation itself. The result is
    /// always Planned, which also resolves a Postponed installation.
    pub async fn reschedule(
        &self,
        id: InstallationId,
        scheduled_at: DateTime<Utc>,
        new_installer: Option<InstallerId>,
        cx: &OpContext,
    ) -> Result<Installation, ScheduleError> {
        let cx = self.context(cx);
        let span = tracing::info_span!("reschedule", installation = %id, at = %scheduled_at);

        async move {
            let (_guard, current) = self.lock_installation(id, new_installer, &cx).await?;
            let target = new_installer.unwrap_or(current.installer_id);
            let moved = current.rescheduled(scheduled_at, target)?;

            let installer = self.load_installer(target, &cx).await?;
            let window = moved.window();
            let check = self.evaluate_slot(&installer, window, Some(id), &cx).await?;
            if let Err(e) = check.into_result(&installer, &window) {
                tracing::debug!(error = %e, "reschedule rejected");
                return Err(e);
            }

            cx.check()?;
            self.store.update(&moved).await?;
            tracing::info!(
                from = %current.scheduled_at,
                installer = %target,
                "installation rescheduled"
            );

            self.notices
                .dispatch(Notice::rescheduled(moved.clone(), current.scheduled_at));
            Ok(moved)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "reschedule_tests.rs"]
mod tests;
