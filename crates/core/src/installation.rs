// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installation state machine
//!
//! An installation is one unit of field work assigned to an installer.
//!
//! ```text
//! Planned ──► InProgress ──► Completed
//!    │  │          │
//!    │  └──────────┴──► Cancelled
//!    ▼
//! Postponed ──(reschedule)──► Planned
//! ```
//!
//! Completed and Cancelled are terminal.

use crate::id::{InstallationId, InstallerId, LocationId};
use crate::window::TimeWindow;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status of an installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

impl InstallationStatus {
    /// Statuses that occupy an installer's calendar
    pub const ACTIVE: [InstallationStatus; 2] =
        [InstallationStatus::Planned, InstallationStatus::InProgress];

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstallationStatus::Completed | InstallationStatus::Cancelled
        )
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            InstallationStatus::Planned | InstallationStatus::InProgress
        )
    }

    /// Whether a direct status change to `next` is allowed.
    ///
    /// Postponed → Planned is not listed: only a reschedule resolves it.
    pub fn can_transition_to(&self, next: InstallationStatus) -> bool {
        use InstallationStatus::*;
        matches!(
            (self, next),
            (Planned, InProgress)
                | (InProgress, Completed)
                | (Planned, Cancelled)
                | (InProgress, Cancelled)
                | (Planned, Postponed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstallationStatus::Planned => "planned",
            InstallationStatus::InProgress => "in_progress",
            InstallationStatus::Completed => "completed",
            InstallationStatus::Cancelled => "cancelled",
            InstallationStatus::Postponed => "postponed",
        }
    }
}

impl std::fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("installation {id} cannot go from {from} to {to}")]
    NotAllowed {
        id: InstallationId,
        from: InstallationStatus,
        to: InstallationStatus,
    },
    #[error("installation {id} is {status} and can no longer be rescheduled")]
    Terminal {
        id: InstallationId,
        status: InstallationStatus,
    },
}

/// Request to schedule a new installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstallation {
    /// Reference to the monitored object being worked on
    pub object_ref: String,
    pub installer_id: InstallerId,
    pub location_id: Option<LocationId>,
    pub scheduled_at: DateTime<Utc>,
    pub estimated_minutes: u32,
    pub address: String,
    pub contact: String,
}

impl NewInstallation {
    pub fn new(
        object_ref: impl Into<String>,
        installer_id: InstallerId,
        scheduled_at: DateTime<Utc>,
        estimated_minutes: u32,
    ) -> Self {
        Self {
            object_ref: object_ref.into(),
            installer_id,
            location_id: None,
            scheduled_at,
            estimated_minutes,
            address: String::new(),
            contact: String::new(),
        }
    }

    pub fn with_location(mut self, location: LocationId) -> Self {
        self.location_id = Some(location);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_minutes(self.scheduled_at, self.estimated_minutes)
    }
}

/// A scheduled unit of field work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub id: InstallationId,
    pub object_ref: String,
    pub installer_id: InstallerId,
    pub location_id: Option<LocationId>,
    pub scheduled_at: DateTime<Utc>,
    pub estimated_minutes: u32,
    /// Zero until the work is completed
    pub actual_minutes: u32,
    pub status: InstallationStatus,
    pub address: String,
    pub contact: String,
    pub reminder_sent: bool,
    pub reminder_sent_at: Option<DateTime<Utc>>,
}

impl Installation {
    /// Materialize a request as a Planned installation
    pub fn planned(id: InstallationId, new: NewInstallation) -> Self {
        Self {
            id,
            object_ref: new.object_ref,
            installer_id: new.installer_id,
            location_id: new.location_id,
            scheduled_at: new.scheduled_at,
            estimated_minutes: new.estimated_minutes,
            actual_minutes: 0,
            status: InstallationStatus::Planned,
            address: new.address,
            contact: new.contact,
            reminder_sent: false,
            reminder_sent_at: None,
        }
    }

    /// Nominal, unbuffered work window
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_minutes(self.scheduled_at, self.estimated_minutes)
    }

    pub fn buffered_window(&self, buffer: Duration) -> TimeWindow {
        self.window().padded(buffer)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Apply a direct status change, returning the updated record
    pub fn transition(&self, to: InstallationStatus) -> Result<Installation, TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError::NotAllowed {
                id: self.id,
                from: self.status,
                to,
            });
        }
        Ok(Installation {
            status: to,
            ..self.clone()
        })
    }

    /// Move to a new slot and installer. Any non-terminal status, Postponed
    /// included, comes back as Planned. A moved job needs a fresh reminder.
    pub fn rescheduled(
        &self,
        scheduled_at: DateTime<Utc>,
        installer_id: InstallerId,
    ) -> Result<Installation, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal {
                id: self.id,
                status: self.status,
            });
        }
        Ok(Installation {
            scheduled_at,
            installer_id,
            status: InstallationStatus::Planned,
            reminder_sent: false,
            reminder_sent_at: None,
            ..self.clone()
        })
    }

    /// Complete with a recorded actual duration
    pub fn completed(&self, actual_minutes: u32) -> Result<Installation, TransitionError> {
        let mut done = self.transition(InstallationStatus::Completed)?;
        done.actual_minutes = actual_minutes;
        Ok(done)
    }
}

#[cfg(test)]
#[path = "installation_tests.rs"]
mod tests;
