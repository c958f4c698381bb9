// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for installation records

mod operation;
mod state;
mod store;
mod wal;

pub use operation::Operation;
pub use state::MaterializedState;
pub use store::{InstallationStore, MemoryStore, StoreError};
pub use wal::{Wal, WalError};
