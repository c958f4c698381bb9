// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent writers against one installer's calendar
//!
//! Whatever the interleaving, the stored calendar must never hold two
//! overlapping buffered windows or more jobs per day than the installer allows.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use chrono::{DateTime, Duration, Utc};
use common::{active_jobs, installer, job, monday, setup};
use isched_core::{Installation, InstallerId, SchedulingConfig};
use isched_engine::{OpContext, ScheduleError};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn assert_calendar_is_sound(jobs: &[Installation], max_daily: usize) {
    let buffer = SchedulingConfig::default().buffer_duration();
    for (i, a) in jobs.iter().enumerate() {
        for b in &jobs[i + 1..] {
            assert!(
                !a.buffered_window(buffer).overlaps(&b.buffered_window(buffer)),
                "installations {} and {} overlap",
                a.id,
                b.id
            );
        }
    }

    let mut per_day: BTreeMap<_, usize> = BTreeMap::new();
    for inst in jobs {
        *per_day.entry(inst.scheduled_at.date_naive()).or_default() += 1;
    }
    assert!(per_day.values().all(|count| *count <= max_daily));
}

fn is_slot_rejection(err: &ScheduleError) -> bool {
    matches!(
        err,
        ScheduleError::ScheduleConflict { .. } | ScheduleError::DailyCapacityExceeded { .. }
    )
}

/// Schedule every slot at once on a multi-threaded runtime and return how
/// many were accepted
async fn schedule_all(
    slots: Vec<(DateTime<Utc>, u32)>,
    max_daily: u32,
) -> (usize, Vec<Installation>) {
    let s = setup(vec![installer(1, max_daily)]);
    let mut tasks = Vec::new();
    for (when, minutes) in slots {
        let engine = s.engine.clone();
        tasks.push(tokio::spawn(async move {
            engine.schedule(job(1, when, minutes), &OpContext::new()).await
        }));
    }

    let mut accepted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert!(is_slot_rejection(&e), "unexpected error: {e}"),
        }
    }
    (accepted, active_jobs(&s.store, 1).await)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_slot_is_granted_once() {
    let slots = vec![(monday(10, 0), 60); 16];
    let (accepted, jobs) = schedule_all(slots, 10).await;

    assert_eq!(accepted, 1);
    assert_eq!(jobs.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn capacity_holds_under_contention() {
    // Non-overlapping slots, more of them than the daily limit
    let slots: Vec<_> = (0..8)
        .map(|i| (monday(6, 0) + Duration::hours(2 * i), 60))
        .collect();
    let (accepted, jobs) = schedule_all(slots, 3).await;

    assert_eq!(accepted, 3);
    assert_calendar_is_sound(&jobs, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_reschedules_into_one_slot() {
    let s = setup(vec![installer(1, 5)]);
    let cx = OpContext::new();
    let a = s.engine.schedule(job(1, monday(8, 0), 60), &cx).await.unwrap();
    let b = s.engine.schedule(job(1, monday(16, 0), 60), &cx).await.unwrap();

    let mut tasks = Vec::new();
    for id in [a.id, b.id] {
        let engine = s.engine.clone();
        tasks.push(tokio::spawn(async move {
            engine
                .reschedule(id, monday(12, 0), None, &OpContext::new())
                .await
        }));
    }

    let mut accepted = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
    assert_calendar_is_sound(&active_jobs(&s.store, 1).await, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn crossing_handovers_do_not_deadlock() {
    let s = setup(vec![installer(1, 10), installer(2, 10)]);
    let cx = OpContext::new();
    let a = s.engine.schedule(job(1, monday(8, 0), 30), &cx).await.unwrap();
    let b = s.engine.schedule(job(2, monday(8, 0), 30), &cx).await.unwrap();

    let mut tasks = Vec::new();
    for round in 0..10 {
        let when = monday(9, 0) + Duration::hours(round);
        for (id, to) in [(a.id, 2), (b.id, 1)] {
            let engine = s.engine.clone();
            tasks.push(tokio::spawn(async move {
                engine
                    .reschedule(id, when, Some(InstallerId(to)), &OpContext::new())
                    .await
            }));
        }
    }

    let all = async {
        for task in tasks {
            let _ = task.await.unwrap();
        }
    };
    tokio::time::timeout(std::time::Duration::from_secs(10), all)
        .await
        .expect("reschedules deadlocked");

    for installer in [1, 2] {
        assert_calendar_is_sound(&active_jobs(&s.store, installer).await, 10);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn concurrent_schedules_keep_the_calendar_sound(
        slots in prop::collection::vec((0u32..48, 15u32..240), 1..24),
        max_daily in 1u32..6,
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        let slots: Vec<_> = slots
            .into_iter()
            .map(|(quarter, minutes)| {
                (monday(6, 0) + Duration::minutes(15 * i64::from(quarter)), minutes)
            })
            .collect();
        let (accepted, jobs) = runtime.block_on(schedule_all(slots, max_daily));

        prop_assert_eq!(accepted, jobs.len());
        assert_calendar_is_sound(&jobs, max_daily as usize);
    }
}
