// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time windows and the interval-overlap predicate
//!
//! A window is half-open: it includes `start` and excludes `end`. Two windows
//! that merely touch (one ends exactly where the other starts) do not overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window starting at `start` lasting `minutes`
    pub fn from_minutes(start: DateTime<Utc>, minutes: u32) -> Self {
        Self::new(start, start + Duration::minutes(i64::from(minutes)))
    }

    /// Widen the window by `padding` on both sides
    pub fn padded(&self, padding: Duration) -> Self {
        Self::new(self.start - padding, self.end + padding)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// General overlap test. Catches containment in either direction, not
    /// just an endpoint of one window falling inside the other.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        !(other.end <= self.start || other.start >= self.end)
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
