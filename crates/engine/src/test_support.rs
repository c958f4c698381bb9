// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine unit tests

use crate::{Engine, EngineDeps};
use chrono::{DateTime, TimeZone, Utc};
use isched_adapters::{FakeNotifyAdapter, StaticDirectory};
use isched_core::{FakeClock, Installer, InstallerId, NewInstallation, SchedulingConfig};
use isched_storage::MemoryStore;
use std::num::NonZeroU32;

pub(crate) type TestEngine = Engine<StaticDirectory, MemoryStore, FakeNotifyAdapter, FakeClock>;

pub(crate) struct Harness {
    pub engine: TestEngine,
    pub directory: StaticDirectory,
    pub store: MemoryStore,
    pub notify: FakeNotifyAdapter,
    pub clock: FakeClock,
}

/// 2026-03-02 is a Monday
pub(crate) fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
}

pub(crate) fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    at(2, hour, minute)
}

/// Monday-to-Friday installer in UTC
pub(crate) fn installer(id: u64, max_daily: u32) -> Installer {
    Installer::new(
        InstallerId(id),
        format!("installer-{id}"),
        NonZeroU32::new(max_daily).unwrap(),
    )
}

pub(crate) fn job(installer: u64, when: DateTime<Utc>, minutes: u32) -> NewInstallation {
    NewInstallation::new("tracker", InstallerId(installer), when, minutes)
}

pub(crate) fn harness(installers: Vec<Installer>) -> Harness {
    harness_with(installers, SchedulingConfig::default())
}

pub(crate) fn harness_with(installers: Vec<Installer>, config: SchedulingConfig) -> Harness {
    let directory = StaticDirectory::new(installers);
    let store = MemoryStore::new();
    let notify = FakeNotifyAdapter::new();
    // Sunday evening before the test week
    let clock = FakeClock::at(at(1, 18, 0));
    let engine = Engine::new(
        EngineDeps {
            directory: directory.clone(),
            store: store.clone(),
            notify: notify.clone(),
        },
        clock.clone(),
        config,
    );
    Harness {
        engine,
        directory,
        store,
        notify,
        clock,
    }
}
