//! Conversion options
//!
//! [`TemporalOptions`] bundles the session settings that steer temporal
//! conversion. It deserializes from JSON with every field optional:
//!
//! ```json
//! { "round_mode": "round", "decimals": 3, "date_mode": { "no_zero_date": false } }
//! ```

use crate::limits::{MAX_DECIMALS, TIME_MAX_HOUR};
use serde::{Deserialize, Serialize};
use sqlscalar_diagnostics::ScalarError;
use std::fmt;
use std::str::FromStr;

/// How digits beyond the requested precision are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundMode {
    /// Caller guarantees there is nothing beyond the precision; value kept as is
    None,
    /// Drop the extra digits
    #[default]
    Truncate,
    /// Half-up at the last kept digit, carrying into larger units
    Round,
}

/// How a DATETIME becomes a TIME
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatetimeToTimeMode {
    /// Any non-zero date part fails the conversion
    Disallow,
    /// With zero year and month, days become hours; otherwise the date is dropped
    #[default]
    MixDaysIntoHours,
    /// The date part is dropped
    Truncate,
    /// Fails unless the date part is `0000-00-00`
    RequireZeroDate,
    /// Elapsed time since midnight of the session's current date
    SubtractCurrentDate,
}

/// Which zero dates are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateMode {
    /// Reject `0000-00-00`
    pub no_zero_date: bool,
    /// Reject a zero month or day in an otherwise non-zero date
    pub no_zero_in_date: bool,
}

impl DateMode {
    pub const STRICT: Self = Self {
        no_zero_date: true,
        no_zero_in_date: true,
    };

    pub const LENIENT: Self = Self {
        no_zero_date: false,
        no_zero_in_date: false,
    };
}

impl Default for DateMode {
    fn default() -> Self {
        Self::STRICT
    }
}

/// Session settings for temporal conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalOptions {
    pub round_mode: RoundMode,
    pub datetime_to_time: DatetimeToTimeMode,
    pub date_mode: DateMode,
    max_hour: u32,
    decimals: u8,
}

impl Default for TemporalOptions {
    fn default() -> Self {
        Self {
            round_mode: RoundMode::default(),
            datetime_to_time: DatetimeToTimeMode::default(),
            date_mode: DateMode::default(),
            max_hour: TIME_MAX_HOUR,
            decimals: MAX_DECIMALS,
        }
    }
}

impl TemporalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ScalarError> {
        serde_json::from_str(json)
            .map_err(|e| ScalarError::configuration(format!("invalid temporal options: {e}")))
    }

    pub fn with_round_mode(mut self, mode: RoundMode) -> Self {
        self.round_mode = mode;
        self
    }

    pub fn with_datetime_to_time(mut self, mode: DatetimeToTimeMode) -> Self {
        self.datetime_to_time = mode;
        self
    }

    pub fn with_date_mode(mut self, mode: DateMode) -> Self {
        self.date_mode = mode;
        self
    }

    pub fn with_max_hour(mut self, max_hour: u32) -> Self {
        self.max_hour = max_hour;
        self
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Largest TIME hour, never above 838
    pub fn max_hour(&self) -> u32 {
        self.max_hour.min(TIME_MAX_HOUR)
    }

    /// Fractional digits kept, never above 6
    pub fn decimals(&self) -> u8 {
        self.decimals.min(MAX_DECIMALS)
    }
}

impl RoundMode {
    /// The mode to apply to converted input
    ///
    /// Converted input carries no caller guarantee, so `None` falls back to
    /// `Truncate` when digits beyond the precision are present.
    pub(crate) fn for_input(self, exact: bool) -> Self {
        if self == RoundMode::None && !exact { RoundMode::Truncate } else { self }
    }
}

impl fmt::Display for RoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundMode::None => write!(f, "none"),
            RoundMode::Truncate => write!(f, "truncate"),
            RoundMode::Round => write!(f, "round"),
        }
    }
}

impl FromStr for RoundMode {
    type Err = ScalarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(RoundMode::None),
            "truncate" => Ok(RoundMode::Truncate),
            "round" => Ok(RoundMode::Round),
            other => Err(ScalarError::configuration(format!("unknown round mode '{other}'"))),
        }
    }
}

impl FromStr for DatetimeToTimeMode {
    type Err = ScalarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "disallow" => Ok(Self::Disallow),
            "mix_days_into_hours" => Ok(Self::MixDaysIntoHours),
            "truncate" => Ok(Self::Truncate),
            "require_zero_date" => Ok(Self::RequireZeroDate),
            "subtract_current_date" => Ok(Self::SubtractCurrentDate),
            other => Err(ScalarError::configuration(format!(
                "unknown datetime to time mode '{other}'"
            ))),
        }
    }
}
