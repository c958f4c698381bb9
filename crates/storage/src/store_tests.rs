// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use isched_core::{InstallationStatus, InstallerId};

fn request(installer: u64, hour: u32) -> NewInstallation {
    let at = Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap();
    NewInstallation::new("tracker", InstallerId(installer), at, 60)
}

#[tokio::test]
async fn insert_assigns_sequential_ids() {
    let store = MemoryStore::new();
    let a = store.insert(request(1, 9)).await.unwrap();
    let b = store.insert(request(1, 12)).await.unwrap();
    assert_eq!(a.id, InstallationId(1));
    assert_eq!(b.id, InstallationId(2));
    assert_eq!(a.status, InstallationStatus::Planned);
}

#[tokio::test]
async fn list_and_count_apply_query() {
    let store = MemoryStore::new();
    store.insert(request(1, 12)).await.unwrap();
    store.insert(request(2, 9)).await.unwrap();
    store.insert(request(1, 8)).await.unwrap();

    let query = InstallationQuery::new().installer(InstallerId(1));
    let found = store.list(&query).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found[0].scheduled_at < found[1].scheduled_at);
    assert_eq!(store.count(&query).await.unwrap(), 2);
}

#[tokio::test]
async fn update_requires_existing_record() {
    let store = MemoryStore::new();
    let mut inst = store.insert(request(1, 9)).await.unwrap();
    inst.status = InstallationStatus::InProgress;
    store.update(&inst).await.unwrap();
    assert_eq!(
        store.get(inst.id).await.unwrap().map(|i| i.status),
        Some(InstallationStatus::InProgress)
    );

    inst.id = InstallationId(99);
    let err = store.update(&inst).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(InstallationId(99))));
}

#[tokio::test]
async fn durable_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("installations.wal");

    {
        let store = MemoryStore::open(&path).unwrap();
        let mut inst = store.insert(request(1, 9)).await.unwrap();
        store.insert(request(1, 13)).await.unwrap();
        inst.status = InstallationStatus::Cancelled;
        store.update(&inst).await.unwrap();
    }

    let store = MemoryStore::open(&path).unwrap();
    let all = store.list(&InstallationQuery::new()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].status, InstallationStatus::Cancelled);

    let next = store.insert(request(1, 16)).await.unwrap();
    assert_eq!(next.id, InstallationId(3));
}
