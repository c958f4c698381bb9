// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installer capability facts
//!
//! Installers are owned by the directory collaborator. The engine only reads
//! them: which weekdays they work, how many jobs fit in one of their days,
//! what they are qualified for and where they can go.

use crate::id::{InstallerId, LocationId};
use crate::window::TimeWindow;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
    Weekday,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroU32;

/// Operational status reported by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallerStatus {
    Available,
    Unavailable,
}

/// Set of working weekdays, indexed 0 = Sunday .. 6 = Saturday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WorkingDays(u8);

impl WorkingDays {
    pub const NONE: WorkingDays = WorkingDays(0);
    /// Monday through Friday
    pub const WEEKDAYS: WorkingDays = WorkingDays(0b0011_1110);
    pub const ALL: WorkingDays = WorkingDays(0b0111_1111);

    /// Build from day indices; indices above 6 are rejected
    pub fn from_indices(days: &[u8]) -> Result<Self, InvalidWeekday> {
        let mut bits = 0u8;
        for &day in days {
            if day > 6 {
                return Err(InvalidWeekday(day));
            }
            bits |= 1 << day;
        }
        Ok(WorkingDays(bits))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|d| self.0 & (1 << d) != 0).collect()
    }
}

impl TryFrom<Vec<u8>> for WorkingDays {
    type Error = InvalidWeekday;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        WorkingDays::from_indices(&days)
    }
}

impl From<WorkingDays> for Vec<u8> {
    fn from(days: WorkingDays) -> Self {
        days.indices()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("weekday index out of range (0-6): {0}")]
pub struct InvalidWeekday(pub u8);

/// Daily working hours in the installer's local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// An installer as seen by the scheduling engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installer {
    pub id: InstallerId,
    pub name: String,
    pub active: bool,
    pub status: InstallerStatus,
    pub working_days: WorkingDays,
    pub working_hours: WorkingHours,
    pub max_daily_installations: NonZeroU32,
    pub specializations: BTreeSet<String>,
    pub location_ids: BTreeSet<LocationId>,
    /// Offset of the installer's local day from UTC, in minutes
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Installer {
    /// Active, available installer working Monday to Friday in UTC
    pub fn new(id: InstallerId, name: impl Into<String>, max_daily: NonZeroU32) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            status: InstallerStatus::Available,
            working_days: WorkingDays::WEEKDAYS,
            working_hours: WorkingHours::default(),
            max_daily_installations: max_daily,
            specializations: BTreeSet::new(),
            location_ids: BTreeSet::new(),
            utc_offset_minutes: 0,
        }
    }

    pub fn with_working_days(mut self, days: WorkingDays) -> Self {
        self.working_days = days;
        self
    }

    pub fn with_working_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.working_hours = WorkingHours { start, end };
        self
    }

    pub fn with_specialization(mut self, tag: impl Into<String>) -> Self {
        self.specializations.insert(tag.into());
        self
    }

    pub fn with_location(mut self, location: LocationId) -> Self {
        self.location_ids.insert(location);
        self
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn with_status(mut self, status: InstallerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Active and operationally available
    pub fn is_assignable(&self) -> bool {
        self.active && self.status == InstallerStatus::Available
    }

    /// Whether the installer serves the optional location and specialization
    pub fn serves(&self, location: Option<LocationId>, specialization: Option<&str>) -> bool {
        location.is_none_or(|l| self.location_ids.contains(&l))
            && specialization.is_none_or(|s| self.specializations.contains(s))
    }

    pub fn max_daily(&self) -> u32 {
        self.max_daily_installations.get()
    }

    /// Local offset; out-of-range values fall back to UTC
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix())
    }

    /// Calendar day of `at` in the installer's local time
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset()).date_naive()
    }

    /// The installer's local calendar day as a UTC window
    pub fn day_window(&self, date: NaiveDate) -> TimeWindow {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let offset = Duration::seconds(i64::from(self.offset().local_minus_utc()));
        let start = Utc.from_utc_datetime(&(local_midnight - offset));
        TimeWindow::new(start, start + Duration::days(1))
    }

    /// Weekday-only availability check
    pub fn is_available_on_date(&self, at: DateTime<Utc>) -> bool {
        self.working_days.contains(self.local_date(at).weekday())
    }

    /// Whether `window` lies within one local working day's hours
    pub fn within_working_hours(&self, window: &TimeWindow) -> bool {
        let offset = self.offset();
        let start = window.start.with_timezone(&offset);
        let end = window.end.with_timezone(&offset);
        start.date_naive() == end.date_naive()
            && start.time() >= self.working_hours.start
            && end.time() <= self.working_hours.end
    }
}

#[cfg(test)]
#[path = "installer_tests.rs"]
mod tests;
