// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source of "now" for overdue, reminder and day-boundary decisions

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Current wall-clock time in UTC
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable wall clock shared between clones, for tests and replays
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    /// Frozen at `instant` until moved
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(instant)),
        }
    }

    /// Frozen at the current system time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn advance(&self, by: Duration) {
        self.update(|current| *current += by);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.update(|current| *current = instant);
    }

    fn update(&self, f: impl FnOnce(&mut DateTime<Utc>)) {
        f(&mut self.current.lock().unwrap_or_else(|e| e.into_inner()));
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
