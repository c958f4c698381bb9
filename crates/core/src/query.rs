// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filters over installations, evaluated by the persistence collaborator

use crate::id::InstallerId;
use crate::installation::{Installation, InstallationStatus};
use chrono::{DateTime, Utc};

/// Conjunctive filter; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallationQuery {
    pub installer_id: Option<InstallerId>,
    pub statuses: Option<Vec<InstallationStatus>>,
    /// Inclusive lower bound on scheduled start
    pub scheduled_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on scheduled start
    pub scheduled_before: Option<DateTime<Utc>>,
    pub reminder_sent: Option<bool>,
}

impl InstallationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installer(mut self, id: InstallerId) -> Self {
        self.installer_id = Some(id);
        self
    }

    pub fn statuses(mut self, statuses: &[InstallationStatus]) -> Self {
        self.statuses = Some(statuses.to_vec());
        self
    }

    /// Planned or InProgress only
    pub fn active(self) -> Self {
        self.statuses(&InstallationStatus::ACTIVE)
    }

    pub fn scheduled_from(mut self, from: DateTime<Utc>) -> Self {
        self.scheduled_from = Some(from);
        self
    }

    pub fn scheduled_before(mut self, before: DateTime<Utc>) -> Self {
        self.scheduled_before = Some(before);
        self
    }

    pub fn reminder_sent(mut self, sent: bool) -> Self {
        self.reminder_sent = Some(sent);
        self
    }

    pub fn matches(&self, inst: &Installation) -> bool {
        self.installer_id.is_none_or(|id| inst.installer_id == id)
            && self
                .statuses
                .as_ref()
                .is_none_or(|s| s.contains(&inst.status))
            && self.scheduled_from.is_none_or(|from| inst.scheduled_at >= from)
            && self
                .scheduled_before
                .is_none_or(|before| inst.scheduled_at < before)
            && self.reminder_sent.is_none_or(|sent| inst.reminder_sent == sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::InstallationId;
    use crate::installation::NewInstallation;
    use chrono::TimeZone;

    fn inst(installer: u64, hour: u32, status: InstallationStatus) -> Installation {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap();
        let mut i = Installation::planned(
            InstallationId(1),
            NewInstallation::new("obj", InstallerId(installer), at, 60),
        );
        i.status = status;
        i
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(InstallationQuery::new().matches(&inst(1, 9, InstallationStatus::Cancelled)));
    }

    #[test]
    fn active_excludes_terminal_and_postponed() {
        let q = InstallationQuery::new().active();
        assert!(q.matches(&inst(1, 9, InstallationStatus::Planned)));
        assert!(q.matches(&inst(1, 9, InstallationStatus::InProgress)));
        assert!(!q.matches(&inst(1, 9, InstallationStatus::Completed)));
        assert!(!q.matches(&inst(1, 9, InstallationStatus::Postponed)));
    }

    #[test]
    fn time_bounds_are_half_open() {
        let from = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let q = InstallationQuery::new()
            .installer(InstallerId(1))
            .scheduled_from(from)
            .scheduled_before(before);
        assert!(q.matches(&inst(1, 9, InstallationStatus::Planned)));
        assert!(!q.matches(&inst(1, 12, InstallationStatus::Planned)));
        assert!(!q.matches(&inst(2, 10, InstallationStatus::Planned)));
    }
}
