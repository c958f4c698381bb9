// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations recorded in the write-ahead log

use isched_core::Installation;
use serde::{Deserialize, Serialize};

/// Mutations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// A newly scheduled installation, id already assigned
    InstallationCreate { installation: Installation },

    /// Full replacement of an existing installation record
    InstallationUpdate { installation: Installation },
}
