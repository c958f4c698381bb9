// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The installation scheduling engine

use crate::dispatch::NoticeDispatcher;
use crate::locks::{InstallerGuard, InstallerLocks};
use crate::{OpContext, ScheduleError};
use isched_adapters::{InstallerDirectory, NotifyAdapter};
use isched_core::{
    Clock, Installation, InstallationId, Installer, InstallerId, SchedulingConfig,
};
use isched_storage::InstallationStore;

/// Collaborators the engine is wired to
pub struct EngineDeps<D, S, N> {
    pub directory: D,
    pub store: S,
    pub notify: N,
}

/// Scheduling engine.
///
/// Reads installers from the directory, reads and writes installations
/// through the store, and sends notices through the notifier. Writes to one
/// installer's calendar are serialized by a per-installer lock.
pub struct Engine<D, S, N, C: Clock> {
    pub(crate) directory: D,
    pub(crate) store: S,
    pub(crate) notices: NoticeDispatcher<N>,
    pub(crate) clock: C,
    pub(crate) config: SchedulingConfig,
    pub(crate) locks: InstallerLocks,
}

impl<D, S, N, C> Engine<D, S, N, C>
where
    D: InstallerDirectory,
    S: InstallationStore,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(deps: EngineDeps<D, S, N>, clock: C, config: SchedulingConfig) -> Self {
        Self {
            directory: deps.directory,
            store: deps.store,
            notices: NoticeDispatcher::new(deps.notify),
            clock,
            config,
            locks: InstallerLocks::new(),
        }
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load one installation
    pub async fn get(
        &self,
        id: InstallationId,
        cx: &OpContext,
    ) -> Result<Installation, ScheduleError> {
        let cx = self.context(cx);
        self.load_installation(id, &cx).await
    }

    /// Caller context with the configured default timeout applied
    pub(crate) fn context(&self, cx: &OpContext) -> OpContext {
        cx.or_timeout(self.config.operation_timeout)
    }

    pub(crate) async fn load_installer(
        &self,
        id: InstallerId,
        cx: &OpContext,
    ) -> Result<Installer, ScheduleError> {
        cx.run(self.directory.get(id))
            .await?
            .ok_or(ScheduleError::InstallerNotFound(id))
    }

    pub(crate) async fn load_installation(
        &self,
        id: InstallationId,
        cx: &OpContext,
    ) -> Result<Installation, ScheduleError> {
        cx.run(self.store.get(id))
            .await?
            .ok_or(ScheduleError::InstallationNotFound(id))
    }

    /// Lock the installer currently holding `id` (plus `also`, if given) and
    /// return the installation as read under the lock.
    ///
    /// The holder can change between the unlocked read and acquiring the
    /// lock, so the read is repeated until the lock covers the holder.
    pub(crate) async fn lock_installation(
        &self,
        id: InstallationId,
        also: Option<InstallerId>,
        cx: &OpContext,
    ) -> Result<(InstallerGuard, Installation), ScheduleError> {
        let mut holder = self.load_installation(id, cx).await?.installer_id;
        loop {
            let mut ids = vec![holder];
            ids.extend(also);
            let guard = cx
                .run(async { Ok::<_, ScheduleError>(self.locks.lock_all(&ids).await) })
                .await?;
            let current = self.load_installation(id, cx).await?;
            if guard.covers(current.installer_id) {
                return Ok((guard, current));
            }
            holder = current.installer_id;
        }
    }
}
