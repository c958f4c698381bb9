// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overdue and reminder selection
//!
//! Both scans are read-only filters over the store. `send_reminders` drives
//! the reminder flow and marks each delivered reminder on its own, so a
//! partial failure leaves exactly the delivered subset marked.

use crate::engine::Engine;
use crate::{OpContext, ScheduleError};
use chrono::{DateTime, Days, Duration, NaiveTime, Utc};
use isched_adapters::{InstallerDirectory, Notice, NotifyAdapter};
use isched_core::{
    Clock, Installation, InstallationId, InstallationQuery, InstallationStatus, Installer,
    InstallerId, TimeWindow,
};
use isched_storage::InstallationStore;
use std::collections::HashMap;
use tracing::Instrument;

/// Outcome of one reminder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderReport {
    /// Delivered and marked
    pub sent: Vec<InstallationId>,
    /// Left unmarked, with the reason
    pub failed: Vec<(InstallationId, String)>,
}

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    /// Planned or InProgress installations that should already have started,
    /// earliest first
    pub async fn overdue(&self, cx: &OpContext) -> Result<Vec<Installation>, ScheduleError> {
        let cx = self.context(cx);
        let query = InstallationQuery::new()
            .active()
            .scheduled_before(self.clock.now());
        cx.run(self.store.list(&query)).await
    }

    /// Planned installations without a reminder that start during their
    /// installer's next local calendar day.
    ///
    /// An installer missing from the directory falls back to UTC days.
    pub async fn reminder_candidates(
        &self,
        cx: &OpContext,
    ) -> Result<Vec<Installation>, ScheduleError> {
        let cx = self.context(cx);
        let now = self.clock.now();

        // Any local "tomorrow" lies within the next 48 hours
        let query = InstallationQuery::new()
            .statuses(&[InstallationStatus::Planned])
            .reminder_sent(false)
            .scheduled_from(now)
            .scheduled_before(now + Duration::days(2));
        let upcoming = cx.run(self.store.list(&query)).await?;

        let mut tomorrow: HashMap<InstallerId, Option<TimeWindow>> = HashMap::new();
        let mut candidates = Vec::new();
        for inst in upcoming {
            let window = match tomorrow.get(&inst.installer_id) {
                Some(window) => *window,
                None => {
                    let installer = match self.load_installer(inst.installer_id, &cx).await {
                        Ok(installer) => Some(installer),
                        Err(ScheduleError::InstallerNotFound(_)) => None,
                        Err(e) => return Err(e),
                    };
                    let window = next_day(installer.as_ref(), now);
                    tomorrow.insert(inst.installer_id, window);
                    window
                }
            };
            if window.is_some_and(|w| w.contains(inst.scheduled_at)) {
                candidates.push(inst);
            }
        }
        Ok(candidates)
    }

    /// Send a reminder for every candidate and mark the ones delivered.
    ///
    /// Delivery and marking failures are reported per installation and do
    /// not stop the run; cancellation and the deadline do.
    pub async fn send_reminders(&self, cx: &OpContext) -> Result<ReminderReport, ScheduleError> {
        let cx = self.context(cx);
        let span = tracing::info_span!("send_reminders");

        async move {
            let candidates = self.reminder_candidates(&cx).await?;
            let mut report = ReminderReport::default();

            for inst in candidates {
                cx.check()?;
                let id = inst.id;
                let delivered = cx
                    .run(async {
                        let notice = Notice::reminder(inst.clone());
                        Ok::<_, ScheduleError>(self.notices.deliver(&notice).await)
                    })
                    .await?;
                if let Err(e) = delivered {
                    tracing::warn!(installation = %id, error = %e, "reminder not delivered");
                    report.failed.push((id, e.to_string()));
                    continue;
                }

                match self.mark_reminded(&inst, &cx).await {
                    Ok(true) => report.sent.push(id),
                    Ok(false) => {
                        tracing::debug!(installation = %id, "changed before it could be marked");
                    }
                    Err(e @ (ScheduleError::Cancelled | ScheduleError::DeadlineExceeded)) => {
                        return Err(e);
                    }
                    Err(e) => {
                        tracing::warn!(installation = %id, error = %e, "reminder not marked");
                        report.failed.push((id, e.to_string()));
                    }
                }
            }

            tracing::info!(
                sent = report.sent.len(),
                failed = report.failed.len(),
                "reminders processed"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Set the reminder flag if the installation is still the visit the
    /// reminder described: planned, unreminded, same installer and start
    async fn mark_reminded(
        &self,
        delivered: &Installation,
        cx: &OpContext,
    ) -> Result<bool, ScheduleError> {
        let (_guard, current) = self.lock_installation(delivered.id, None, cx).await?;
        if current.status != InstallationStatus::Planned
            || current.reminder_sent
            || current.scheduled_at != delivered.scheduled_at
            || current.installer_id != delivered.installer_id
        {
            return Ok(false);
        }

        let marked = Installation {
            reminder_sent: true,
            reminder_sent_at: Some(self.clock.now()),
            ..current
        };
        cx.check()?;
        self.store.update(&marked).await?;
        Ok(true)
    }
}

/// The calendar day after `now`, local to `installer` or else UTC
fn next_day(installer: Option<&Installer>, now: DateTime<Utc>) -> Option<TimeWindow> {
    match installer {
        Some(installer) => {
            let date = installer.local_date(now).checked_add_days(Days::new(1))?;
            Some(installer.day_window(date))
        }
        None => {
            let start = now.date_naive().checked_add_days(Days::new(1))?;
            let start = start.and_time(NaiveTime::MIN).and_utc();
            Some(TimeWindow::new(start, start + Duration::days(1)))
        }
    }
}

#[cfg(test)]
#[path = "due_tests.rs"]
mod tests;
