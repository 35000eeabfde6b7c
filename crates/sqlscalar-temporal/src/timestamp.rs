//! TIMESTAMP values
//!
//! A TIMESTAMP is an instant: Unix seconds in `[0, 2^31-1]` plus
//! microseconds. Second 0 with no microseconds stands for the zero
//! datetime. Wall-clock views go through a [`SessionTimeZone`].

use crate::datetime::Datetime;
use crate::frac::{format_fraction, is_exact, round_usec};
use crate::limits::{max_sec_part, MAX_DECIMALS, TIMESTAMP_MAX_SECONDS, USEC_PER_SEC};
use crate::options::RoundMode;
use crate::sec::Sec6;
use crate::session::{LocalToUnix, SessionTimeZone};
use sqlscalar_diagnostics::{ConversionDiagnostics, TimeWarnings};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    sec: u32,
    usec: u32,
}

impl Timestamp {
    pub fn new(sec: i64, usec: u32) -> Option<Self> {
        let sec = u32::try_from(sec).ok()?;
        if sec > TIMESTAMP_MAX_SECONDS || usec as u64 >= USEC_PER_SEC {
            return None;
        }
        Some(Self { sec, usec })
    }

    pub const fn zero() -> Self {
        Self { sec: 0, usec: 0 }
    }

    pub fn max_at(dec: u8) -> Self {
        Self {
            sec: TIMESTAMP_MAX_SECONDS,
            usec: max_sec_part(dec),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.sec == 0 && self.usec == 0
    }

    pub fn unix_seconds(&self) -> i64 {
        self.sec as i64
    }

    pub fn usec(&self) -> u32 {
        self.usec
    }

    /// From fixed-point Unix seconds; negatives and values past 2038 are out of range
    pub fn from_unix(sec: &Sec6, diag: &mut ConversionDiagnostics) -> Option<Self> {
        if sec.truncated() {
            diag.add(TimeWarnings::TRUNCATED);
        }
        if sec.is_negative() {
            diag.add(TimeWarnings::OUT_OF_RANGE);
            return None;
        }
        let value = i64::try_from(sec.sec()).ok().and_then(|s| Self::new(s, sec.usec()));
        if value.is_none() {
            diag.add(TimeWarnings::OUT_OF_RANGE);
        }
        value
    }

    /// Wall-clock view in a time zone
    pub fn to_datetime(&self, zone: &dyn SessionTimeZone) -> Option<Datetime> {
        if self.is_zero() {
            return Some(Datetime::zero());
        }
        let local = zone.unix_to_local(self.sec as i64)?;
        Datetime::from_naive(local, self.usec)
    }

    /// The instant a wall-clock time denotes in a time zone
    ///
    /// A time inside a DST gap moves to the end of the gap and raises
    /// `INVALID_TIMESTAMP`.
    pub fn from_datetime(
        dt: &Datetime,
        zone: &dyn SessionTimeZone,
        diag: &mut ConversionDiagnostics,
    ) -> Option<Self> {
        if dt.date().is_zero() && dt.time_of_day_usec() == 0 {
            return Some(Self::zero());
        }
        let Some(local) = dt.to_naive() else {
            diag.add(TimeWarnings::INVALID_VALUE);
            return None;
        };
        let unix = match zone.local_to_unix(local) {
            LocalToUnix::Exact(unix) => unix,
            LocalToUnix::Gap(unix) => {
                diag.add(TimeWarnings::INVALID_TIMESTAMP);
                unix
            }
            LocalToUnix::OutOfRange => {
                diag.add(TimeWarnings::OUT_OF_RANGE);
                return None;
            }
        };
        // second 0 is reserved for the zero value
        let value = Self::new(unix, dt.usec()).filter(|ts| !ts.is_zero());
        if value.is_none() {
            diag.add(TimeWarnings::OUT_OF_RANGE);
        }
        value
    }

    pub fn round(&self, dec: u8, mode: RoundMode, diag: &mut ConversionDiagnostics) -> Self {
        let mut warn = TimeWarnings::NONE;
        let out = self.round_nanos(dec, mode, 0, &mut warn);
        diag.add(warn);
        out
    }

    pub(crate) fn round_nanos(&self, dec: u8, mode: RoundMode, nanos: u32, warn: &mut TimeWarnings) -> Self {
        let dec = dec.min(MAX_DECIMALS);
        if mode == RoundMode::None {
            debug_assert!(is_exact(self.usec as u64, nanos, dec), "{self} has digits beyond {dec}");
            return *self;
        }
        let total = self.sec as u64 * USEC_PER_SEC + self.usec as u64;
        let rounded = round_usec(total, nanos, dec, mode);
        let max = Self::max_at(dec);
        if rounded > max.sec as u64 * USEC_PER_SEC + max.usec as u64 {
            *warn |= TimeWarnings::OUT_OF_RANGE;
            return max;
        }
        Self {
            sec: (rounded / USEC_PER_SEC) as u32,
            usec: (rounded % USEC_PER_SEC) as u32,
        }
    }

    /// `sec * 1_000_000 + usec`
    pub fn to_packed(&self) -> i64 {
        self.sec as i64 * USEC_PER_SEC as i64 + self.usec as i64
    }

    pub fn from_packed(packed: i64) -> Option<Self> {
        if packed < 0 {
            return None;
        }
        Self::new(packed / USEC_PER_SEC as i64, (packed % USEC_PER_SEC as i64) as u32)
    }

    pub fn to_string_with(&self, dec: u8) -> String {
        format!("{}{}", self.sec, format_fraction(self.usec, dec))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dec = if self.usec == 0 { 0 } else { MAX_DECIMALS };
        write!(f, "{}", self.to_string_with(dec))
    }
}
