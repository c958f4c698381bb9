// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use isched_core::{InstallationStatus, NewInstallation};
use isched_storage::MemoryStore;
use yare::parameterized;

fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

async fn store_with(jobs: &[(u64, u32, u32, u32)]) -> MemoryStore {
    let store = MemoryStore::new();
    for &(installer, hour, minute, minutes) in jobs {
        store
            .insert(NewInstallation::new(
                "tracker",
                InstallerId(installer),
                monday(hour, minute),
                minutes,
            ))
            .await
            .unwrap();
    }
    store
}

async fn conflicts_at(
    store: &MemoryStore,
    hour: u32,
    minute: u32,
    minutes: u32,
    exclude: Option<InstallationId>,
) -> Vec<InstallationId> {
    find_conflicts(
        store,
        InstallerId(1),
        TimeWindow::from_minutes(monday(hour, minute), minutes),
        exclude,
        Duration::minutes(30),
    )
    .await
    .unwrap()
    .iter()
    .map(|i| i.id)
    .collect()
}

// Existing job Monday 10:00-11:00, buffered 09:30-11:30
#[parameterized(
    overlapping_start = { 10, 30, 60, true },
    inside_buffer_before = { 8, 30, 60, true },
    inside_buffer_after = { 11, 30, 60, true },
    long_job_contains_existing = { 6, 0, 600, true },
    short_job_inside_existing = { 10, 15, 10, true },
    touching_buffers_before = { 8, 0, 60, false },
    touching_buffers_after = { 12, 0, 60, false },
    afternoon = { 13, 0, 60, false },
)]
fn candidate_against_ten_oclock(hour: u32, minute: u32, minutes: u32, expected: bool) {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(async {
            let store = store_with(&[(1, 10, 0, 60)]).await;
            let found = conflicts_at(&store, hour, minute, minutes, None).await;
            assert_eq!(!found.is_empty(), expected, "found {found:?}");
        });
}

#[tokio::test]
async fn long_existing_job_is_found_even_when_it_started_long_before() {
    let store = store_with(&[(1, 6, 0, 600)]).await;
    let found = conflicts_at(&store, 14, 0, 30, None).await;
    assert_eq!(found, vec![InstallationId(1)]);
}

#[tokio::test]
async fn excluded_installation_never_conflicts_with_itself() {
    let store = store_with(&[(1, 10, 0, 60)]).await;
    assert!(conflicts_at(&store, 10, 0, 60, Some(InstallationId(1)))
        .await
        .is_empty());
}

#[tokio::test]
async fn other_installers_and_inactive_jobs_are_ignored() {
    let store = store_with(&[(2, 10, 0, 60), (1, 10, 0, 60), (1, 14, 0, 60)]).await;
    for (id, status) in [
        (InstallationId(2), InstallationStatus::Cancelled),
        (InstallationId(3), InstallationStatus::Postponed),
    ] {
        let mut inst = store.get(id).await.unwrap().unwrap();
        inst.status = status;
        store.update(&inst).await.unwrap();
    }

    assert!(conflicts_at(&store, 10, 0, 60, None).await.is_empty());
    assert!(conflicts_at(&store, 14, 0, 60, None).await.is_empty());
}

#[tokio::test]
async fn in_progress_jobs_still_conflict() {
    let store = store_with(&[(1, 10, 0, 60)]).await;
    let mut inst = store.get(InstallationId(1)).await.unwrap().unwrap();
    inst.status = InstallationStatus::InProgress;
    store.update(&inst).await.unwrap();

    assert_eq!(
        conflicts_at(&store, 10, 30, 30, None).await,
        vec![InstallationId(1)]
    );
}
