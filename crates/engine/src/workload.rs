// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-day workload reports

use crate::engine::Engine;
use crate::{OpContext, ScheduleError};
use chrono::{Days, NaiveDate};
use isched_adapters::{InstallerDirectory, NotifyAdapter};
use isched_core::{
    Clock, Installation, InstallationQuery, InstallationStatus, Installer, InstallerId,
};
use isched_storage::InstallationStore;
use std::collections::BTreeMap;
use tracing::Instrument;

/// Installations per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub planned: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub postponed: usize,
}

impl StatusCounts {
    fn record(&mut self, status: InstallationStatus) {
        match status {
            InstallationStatus::Planned => self.planned += 1,
            InstallationStatus::InProgress => self.in_progress += 1,
            InstallationStatus::Completed => self.completed += 1,
            InstallationStatus::Cancelled => self.cancelled += 1,
            InstallationStatus::Postponed => self.postponed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.planned + self.in_progress + self.completed + self.cancelled + self.postponed
    }
}

/// One local calendar day of an installer's workload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayLoad {
    pub date: NaiveDate,
    pub count: usize,
    pub estimated_minutes: u64,
    /// Only jobs with a recorded duration contribute
    pub actual_minutes: u64,
    pub overloaded: bool,
}

impl DayLoad {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            estimated_minutes: 0,
            actual_minutes: 0,
            overloaded: false,
        }
    }
}

/// Workload of one installer over an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub installer_id: InstallerId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub counts: StatusCounts,
    pub total_estimated_minutes: u64,
    pub total_actual_minutes: u64,
    /// One entry per day in `from..=to`, in order, empty days included
    pub days: Vec<DayLoad>,
}

/// Bucket `installations` into the installer's local days of `from..=to`.
///
/// Jobs outside the range are ignored. A day is overloaded when its estimated
/// minutes exceed `threshold_minutes`.
pub fn aggregate(
    installer: &Installer,
    from: NaiveDate,
    to: NaiveDate,
    installations: &[Installation],
    threshold_minutes: u32,
) -> Workload {
    let mut days: BTreeMap<NaiveDate, DayLoad> = BTreeMap::new();
    let mut date = from;
    while date <= to {
        days.insert(date, DayLoad::empty(date));
        match date.checked_add_days(Days::new(1)) {
            Some(next) => date = next,
            None => break,
        }
    }

    let mut counts = StatusCounts::default();
    let mut total_estimated_minutes = 0;
    let mut total_actual_minutes = 0;

    for inst in installations {
        let Some(day) = days.get_mut(&installer.local_date(inst.scheduled_at)) else {
            continue;
        };
        let estimated = u64::from(inst.estimated_minutes);
        let actual = u64::from(inst.actual_minutes);

        day.count += 1;
        day.estimated_minutes += estimated;
        day.actual_minutes += actual;

        counts.record(inst.status);
        total_estimated_minutes += estimated;
        total_actual_minutes += actual;
    }

    let threshold = u64::from(threshold_minutes);
    let days = days
        .into_values()
        .map(|mut day| {
            day.overloaded = day.estimated_minutes > threshold;
            day
        })
        .collect();

    Workload {
        installer_id: installer.id,
        from,
        to,
        counts,
        total_estimated_minutes,
        total_actual_minutes,
        days,
    }
}

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    /// Workload of `installer` for the local days `from..=to`
    pub async fn workload(
        &self,
        installer: InstallerId,
        from: NaiveDate,
        to: NaiveDate,
        cx: &OpContext,
    ) -> Result<Workload, ScheduleError> {
        let cx = self.context(cx);
        let span = tracing::info_span!("workload", %installer, %from, %to);

        async move {
            if to < from {
                return Err(ScheduleError::InvalidRange { from, to });
            }
            let installer = self.load_installer(installer, &cx).await?;

            let query = InstallationQuery::new()
                .installer(installer.id)
                .scheduled_from(installer.day_window(from).start)
                .scheduled_before(installer.day_window(to).end);
            let installations = cx.run(self.store.list(&query)).await?;

            let workload = aggregate(
                &installer,
                from,
                to,
                &installations,
                self.config.overload_threshold_minutes,
            );
            tracing::debug!(
                installations = workload.counts.total(),
                estimated = workload.total_estimated_minutes,
                "workload aggregated"
            );
            Ok(workload)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
