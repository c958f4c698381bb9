// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the scheduling engine's collaborators

pub mod directory;
pub mod notify;
pub mod traced;

pub use directory::{DirectoryError, InstallerDirectory, StaticDirectory};
pub use notify::{NoOpNotifyAdapter, Notice, NoticeKind, NotifyAdapter, NotifyError};
pub use traced::{TracedDirectory, TracedNotifyAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
