// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use isched_adapters::{FakeNotifyAdapter, StaticDirectory};
use isched_core::{
    FakeClock, Installation, InstallationId, InstallationQuery, Installer, InstallerId,
    NewInstallation, SchedulingConfig,
};
use isched_engine::{Engine, EngineDeps};
use isched_storage::{InstallationStore, MemoryStore, StoreError};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 2026-03-02 is a Monday
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
}

pub fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    at(2, hour, minute)
}

/// Monday-to-Friday installer in UTC
pub fn installer(id: u64, max_daily: u32) -> Installer {
    Installer::new(
        InstallerId(id),
        format!("installer-{id}"),
        NonZeroU32::new(max_daily).unwrap(),
    )
}

pub fn job(installer: u64, when: DateTime<Utc>, minutes: u32) -> NewInstallation {
    NewInstallation::new("tracker", InstallerId(installer), when, minutes)
        .with_address("1 Depot Road")
        .with_contact("dispatch@example.com")
}

pub type TestEngine<S> = Engine<StaticDirectory, S, FakeNotifyAdapter, FakeClock>;

pub struct Setup<S: InstallationStore> {
    pub engine: Arc<TestEngine<S>>,
    pub store: S,
    pub notify: FakeNotifyAdapter,
    pub clock: FakeClock,
}

pub fn setup(installers: Vec<Installer>) -> Setup<MemoryStore> {
    setup_with_store(installers, MemoryStore::new())
}

pub fn setup_with_store<S: InstallationStore>(installers: Vec<Installer>, store: S) -> Setup<S> {
    let notify = FakeNotifyAdapter::new();
    // Sunday evening before the test week
    let clock = FakeClock::at(at(1, 18, 0));
    let engine = Engine::new(
        EngineDeps {
            directory: StaticDirectory::new(installers),
            store: store.clone(),
            notify: notify.clone(),
        },
        clock.clone(),
        SchedulingConfig::default(),
    );
    Setup {
        engine: Arc::new(engine),
        store,
        notify,
        clock,
    }
}

/// Every active installation of `installer`, earliest first
pub async fn active_jobs<S: InstallationStore>(store: &S, installer: u64) -> Vec<Installation> {
    store
        .list(&InstallationQuery::new().installer(InstallerId(installer)).active())
        .await
        .unwrap()
}

/// Store whose writes can be switched off to simulate an outage
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    down: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InstallationStore for FlakyStore {
    async fn get(&self, id: InstallationId) -> Result<Option<Installation>, StoreError> {
        self.inner.get(id).await
    }

    async fn list(&self, query: &InstallationQuery) -> Result<Vec<Installation>, StoreError> {
        self.inner.list(query).await
    }

    async fn count(&self, query: &InstallationQuery) -> Result<usize, StoreError> {
        self.inner.count(query).await
    }

    async fn insert(&self, new: NewInstallation) -> Result<Installation, StoreError> {
        self.check()?;
        self.inner.insert(new).await
    }

    async fn update(&self, installation: &Installation) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update(installation).await
    }
}
