// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::directory::{DirectoryError, InstallerDirectory};
use crate::notify::{Notice, NotifyAdapter, NotifyError};
use async_trait::async_trait;
use isched_core::{Installer, InstallerId};
use tracing::Instrument;

/// Wrapper that adds tracing to any InstallerDirectory
#[derive(Clone, Debug)]
pub struct TracedDirectory<D> {
    inner: D,
}

impl<D> TracedDirectory<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<D: InstallerDirectory> InstallerDirectory for TracedDirectory<D> {
    async fn get(&self, id: InstallerId) -> Result<Option<Installer>, DirectoryError> {
        let result = self.inner.get(id).await;
        match &result {
            Ok(found) => tracing::trace!(%id, found = found.is_some(), "directory lookup"),
            Err(e) => tracing::error!(%id, error = %e, "directory lookup failed"),
        }
        result
    }

    async fn list_assignable(&self) -> Result<Vec<Installer>, DirectoryError> {
        let start = std::time::Instant::now();
        let result = self.inner.list_assignable().await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(list) => tracing::debug!(count = list.len(), elapsed_ms, "listed installers"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "listing installers failed"),
        }
        result
    }
}

/// Wrapper that adds tracing to any NotifyAdapter
#[derive(Clone, Debug)]
pub struct TracedNotifyAdapter<N> {
    inner: N,
}

impl<N> TracedNotifyAdapter<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<N: NotifyAdapter> NotifyAdapter for TracedNotifyAdapter<N> {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let span = tracing::info_span!(
            "notify.send",
            kind = notice.kind.name(),
            installation = %notice.installation.id,
        );
        async move {
            let start = std::time::Instant::now();
            let result = self.inner.send(notice).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "notice delivered"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "notice failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
