// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the scheduling engine

use chrono::{DateTime, NaiveDate, Utc};
use isched_adapters::DirectoryError;
use isched_core::{InstallationId, InstallationStatus, InstallerId, TransitionError};
use isched_storage::StoreError;
use thiserror::Error;

/// Errors returned by engine operations.
///
/// Validation failures are detected before any write. Store and directory
/// failures are infrastructure errors; neither kind leaves partial state.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("installer not found: {0}")]
    InstallerNotFound(InstallerId),
    #[error("installer {installer} is not available at {at}")]
    InstallerUnavailable {
        installer: InstallerId,
        at: DateTime<Utc>,
    },
    #[error("installer {installer} has overlapping work at {at} (installations {conflicts:?})")]
    ScheduleConflict {
        installer: InstallerId,
        at: DateTime<Utc>,
        conflicts: Vec<InstallationId>,
    },
    #[error("installer {installer} already has {max} installations on {date}")]
    DailyCapacityExceeded {
        installer: InstallerId,
        date: NaiveDate,
        max: u32,
    },
    #[error("installation not found: {0}")]
    InstallationNotFound(InstallationId),
    #[error("installation {id} is {status} and can no longer be changed")]
    InstallationTerminalState {
        id: InstallationId,
        status: InstallationStatus,
    },
    #[error("{0}")]
    InvalidTransition(TransitionError),
    #[error("duration must be a positive number of minutes")]
    InvalidDuration,
    #[error("invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
    #[error("operation deadline exceeded")]
    DeadlineExceeded,
    #[error("operation cancelled")]
    Cancelled,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl ScheduleError {
    /// True for rejections of the request itself; false for infrastructure
    /// failures, deadlines and cancellation
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ScheduleError::DeadlineExceeded
                | ScheduleError::Cancelled
                | ScheduleError::Store(_)
                | ScheduleError::Directory(_)
        )
    }
}

impl From<TransitionError> for ScheduleError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Terminal { id, status } => {
                ScheduleError::InstallationTerminalState { id, status }
            }
            TransitionError::NotAllowed { .. } => ScheduleError::InvalidTransition(err),
        }
    }
}
