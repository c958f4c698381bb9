// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Notice, NotifyAdapter, NotifyError};
use async_trait::async_trait;
use isched_core::InstallationId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeNotifyState {
    calls: Vec<Notice>,
    fail_all: bool,
    fail_ids: HashSet<InstallationId>,
}

/// Fake notification adapter that records notices and can inject failures
#[derive(Clone, Default)]
pub struct FakeNotifyAdapter {
    state: Arc<Mutex<FakeNotifyState>>,
}

impl FakeNotifyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send
    pub fn fail_all(&self, fail: bool) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fail_all = fail;
    }

    /// Fail sends about one installation
    pub fn fail_for(&self, id: InstallationId) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_ids
            .insert(id);
    }

    /// Notices delivered successfully, in order
    pub fn calls(&self) -> Vec<Notice> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Wait until at least `count` notices arrived or `timeout` elapses
    pub async fn wait_for_calls(&self, count: usize, timeout: Duration) -> Vec<Notice> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let calls = self.calls();
            if calls.len() >= count || tokio::time::Instant::now() >= deadline {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotifyAdapter {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.fail_all || state.fail_ids.contains(&notice.installation.id) {
            return Err(NotifyError::Failed(format!(
                "injected failure for installation {}",
                notice.installation.id
            )));
        }
        state.calls.push(notice.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
