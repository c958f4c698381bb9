// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling policy configuration
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! buffer = "30m"
//! overload_threshold_minutes = 480
//! working_hours = "enforce"
//! operation_timeout = "5s"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Whether job windows must fit inside the installer's working hours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingHoursPolicy {
    /// Only working weekdays gate scheduling
    #[default]
    Ignore,
    Enforce,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Travel/setup padding applied before and after every job window
    #[serde(with = "humantime_serde")]
    pub buffer: Duration,
    /// A day is overloaded when its estimated minutes exceed this
    pub overload_threshold_minutes: u32,
    pub working_hours: WorkingHoursPolicy,
    /// Deadline applied to operations whose caller did not set one
    #[serde(with = "humantime_serde")]
    pub operation_timeout: Option<Duration>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            buffer: Duration::from_secs(30 * 60),
            overload_threshold_minutes: 480,
            working_hours: WorkingHoursPolicy::Ignore,
            operation_timeout: None,
        }
    }
}

impl SchedulingConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SchedulingConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overload_threshold_minutes == 0 {
            return Err(ConfigError::Invalid(
                "overload_threshold_minutes must be positive".to_string(),
            ));
        }
        if self.operation_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Invalid(
                "operation_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Buffer as a chrono duration for timestamp arithmetic
    pub fn buffer_duration(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.buffer).unwrap_or(chrono::Duration::zero())
    }

    pub fn with_buffer(mut self, buffer: Duration) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_working_hours(mut self, policy: WorkingHoursPolicy) -> Self {
        self.working_hours = policy;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
