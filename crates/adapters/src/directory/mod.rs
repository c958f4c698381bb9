// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installer directory adapters

mod memory;

pub use memory::StaticDirectory;

use async_trait::async_trait;
use isched_core::{Installer, InstallerId};
use thiserror::Error;

/// Errors from directory lookups
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of installer capability facts
#[async_trait]
pub trait InstallerDirectory: Clone + Send + Sync + 'static {
    /// Look up an installer regardless of its active flag or status
    async fn get(&self, id: InstallerId) -> Result<Option<Installer>, DirectoryError>;

    /// Installers that are active and operationally available, in directory order
    async fn list_assignable(&self) -> Result<Vec<Installer>, DirectoryError>;
}
