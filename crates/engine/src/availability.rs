// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finding installers free for a slot

use crate::engine::Engine;
use crate::scheduler::SlotCheck;
use crate::{OpContext, ScheduleError};
use chrono::{DateTime, Utc};
use isched_adapters::{InstallerDirectory, NotifyAdapter};
use isched_core::{Clock, Installer, LocationId, TimeWindow};
use isched_storage::InstallationStore;
use tracing::Instrument;

/// What a caller is looking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub location: Option<LocationId>,
    pub specialization: Option<String>,
}

impl SlotRequest {
    pub fn new(at: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            at,
            duration_minutes,
            location: None,
            specialization: None,
        }
    }

    pub fn at_location(mut self, location: LocationId) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_specialization(mut self, tag: impl Into<String>) -> Self {
        self.specialization = Some(tag.into());
        self
    }
}

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    /// Assignable installers serving the request's location and
    /// specialization that could take the slot right now, in directory order.
    ///
    /// Nothing is reserved: a later `schedule` re-checks under the lock.
    pub async fn find_available(
        &self,
        request: &SlotRequest,
        cx: &OpContext,
    ) -> Result<Vec<Installer>, ScheduleError> {
        let cx = self.context(cx);
        let span = tracing::info_span!(
            "find_available",
            at = %request.at,
            minutes = request.duration_minutes,
        );

        async move {
            if request.duration_minutes == 0 {
                return Err(ScheduleError::InvalidDuration);
            }

            let window = TimeWindow::from_minutes(request.at, request.duration_minutes);
            let candidates = cx.run(self.directory.list_assignable()).await?;

            let mut available = Vec::new();
            for installer in candidates {
                if !installer.serves(request.location, request.specialization.as_deref()) {
                    continue;
                }
                match self.evaluate_slot(&installer, window, None, &cx).await? {
                    SlotCheck::Free => available.push(installer),
                    check => tracing::trace!(installer = %installer.id, ?check, "skipped"),
                }
            }

            tracing::debug!(found = available.len(), "availability search done");
            Ok(available)
        }
        .instrument(span)
        .await
    }
}
