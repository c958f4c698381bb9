// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Installation scheduling engine
//!
//! Assigns installation jobs to installers without double-booking them,
//! enforces daily capacity, and reports workload, overdue jobs and reminder
//! candidates. Every write to one installer's calendar is serialized, and the
//! checks that guard it are re-run under that lock.

mod availability;
mod capacity;
mod conflict;
mod context;
mod dispatch;
mod due;
mod engine;
mod error;
mod lifecycle;
mod locks;
mod reschedule;
mod scheduler;
mod workload;

#[cfg(test)]
mod test_support;

pub use availability::SlotRequest;
pub use capacity::{booked_on, has_capacity};
pub use conflict::find_conflicts;
pub use context::OpContext;
pub use due::ReminderReport;
pub use engine::{Engine, EngineDeps};
pub use error::ScheduleError;
pub use locks::{InstallerGuard, InstallerLocks};
pub use workload::{aggregate, DayLoad, StatusCounts, Workload};
