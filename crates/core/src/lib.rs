// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! isched-core: domain model for installation scheduling
//!
//! This crate provides:
//! - Typed identifiers and the installer capability model
//! - The installation status state machine
//! - Time windows with the interval-overlap predicate
//! - Query filters, a clock abstraction and scheduling configuration

pub mod clock;
pub mod config;
pub mod id;
pub mod installation;
pub mod installer;
pub mod query;
pub mod window;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, SchedulingConfig, WorkingHoursPolicy};
pub use id::{InstallationId, InstallerId, LocationId};
pub use installation::{Installation, InstallationStatus, NewInstallation, TransitionError};
pub use installer::{Installer, InstallerStatus, InvalidWeekday, WorkingDays, WorkingHours};
pub use query::InstallationQuery;
pub use window::TimeWindow;
