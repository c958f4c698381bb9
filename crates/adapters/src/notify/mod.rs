// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification adapters

mod noop;

pub use noop::NoOpNotifyAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use isched_core::Installation;
use thiserror::Error;

/// Errors from notification delivery
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Failed(String),
}

/// What happened to the installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Created,
    Updated,
    Completed,
    Cancelled,
    Rescheduled { previous_at: DateTime<Utc> },
    Reminder,
}

impl NoticeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NoticeKind::Created => "created",
            NoticeKind::Updated => "updated",
            NoticeKind::Completed => "completed",
            NoticeKind::Cancelled => "cancelled",
            NoticeKind::Rescheduled { .. } => "rescheduled",
            NoticeKind::Reminder => "reminder",
        }
    }
}

/// A notification about one installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub installation: Installation,
}

impl Notice {
    pub fn new(kind: NoticeKind, installation: Installation) -> Self {
        Self { kind, installation }
    }

    pub fn created(installation: Installation) -> Self {
        Self::new(NoticeKind::Created, installation)
    }

    pub fn updated(installation: Installation) -> Self {
        Self::new(NoticeKind::Updated, installation)
    }

    pub fn completed(installation: Installation) -> Self {
        Self::new(NoticeKind::Completed, installation)
    }

    pub fn cancelled(installation: Installation) -> Self {
        Self::new(NoticeKind::Cancelled, installation)
    }

    pub fn rescheduled(installation: Installation, previous_at: DateTime<Utc>) -> Self {
        Self::new(NoticeKind::Rescheduled { previous_at }, installation)
    }

    pub fn reminder(installation: Installation) -> Self {
        Self::new(NoticeKind::Reminder, installation)
    }
}

/// Adapter for notification delivery (email, SMS, push, ...)
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError>;
}
