//! DATETIME values

use crate::date::Date;
use crate::frac::{format_fraction, is_exact, round_usec};
use crate::limits::{max_sec_part, MAX_DECIMALS, USEC_PER_DAY, USEC_PER_SEC};
use crate::options::{DateMode, RoundMode};
use crate::packed::{pack, unpack, PackedFields};
use crate::session::SessionClock;
use crate::time::Time;
use chrono::Timelike;
use rust_decimal::Decimal;
use sqlscalar_diagnostics::{ConversionDiagnostics, TimeWarnings};
use std::fmt;

/// A date plus a time of day, up to `9999-12-31 23:59:59.999999`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Datetime {
    date: Date,
    hour: u8,
    minute: u8,
    second: u8,
    usec: u32,
}

impl Datetime {
    pub fn new(date: Date, hour: u32, minute: u32, second: u32, usec: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 || usec as u64 >= USEC_PER_SEC {
            return None;
        }
        Some(Self {
            date,
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
            usec,
        })
    }

    pub fn from_ymd_hms(year: u32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Option<Self> {
        Self::new(Date::from_ymd(year, month, day)?, hour, minute, second, 0)
    }

    /// `0000-00-00 00:00:00`
    pub const fn zero() -> Self {
        Self {
            date: Date::zero(),
            hour: 0,
            minute: 0,
            second: 0,
            usec: 0,
        }
    }

    /// Midnight of `date`
    pub fn from_date(date: Date) -> Self {
        Self {
            date,
            hour: 0,
            minute: 0,
            second: 0,
            usec: 0,
        }
    }

    fn from_tod_usec(date: Date, tod: u64) -> Option<Self> {
        let sec = tod / USEC_PER_SEC;
        Self::new(
            date,
            (sec / 3600) as u32,
            ((sec % 3600) / 60) as u32,
            (sec % 60) as u32,
            (tod % USEC_PER_SEC) as u32,
        )
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    pub fn second(&self) -> u32 {
        self.second as u32
    }

    pub fn usec(&self) -> u32 {
        self.usec
    }

    /// Microseconds since midnight
    pub fn time_of_day_usec(&self) -> u64 {
        (self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64) * USEC_PER_SEC
            + self.usec as u64
    }

    /// Round to `dec` fractional digits, carrying into the date
    pub fn round(&self, dec: u8, mode: RoundMode, diag: &mut ConversionDiagnostics) -> Self {
        let mut warn = TimeWarnings::NONE;
        let out = self.round_nanos(dec, mode, 0, &mut warn);
        diag.add(warn);
        out
    }

    pub(crate) fn is_exact(&self, dec: u8, nanos: u32) -> bool {
        is_exact(self.usec as u64, nanos, dec)
    }

    pub(crate) fn round_nanos(&self, dec: u8, mode: RoundMode, nanos: u32, warn: &mut TimeWarnings) -> Self {
        let dec = dec.min(MAX_DECIMALS);
        if mode == RoundMode::None {
            debug_assert!(self.is_exact(dec, nanos), "{self} has digits beyond {dec}");
            return *self;
        }
        let tod = round_usec(self.time_of_day_usec(), nanos, dec, mode);
        if tod < USEC_PER_DAY {
            return Self::from_tod_usec(self.date, tod).unwrap_or(*self);
        }
        match self.date.next_day() {
            Some(next) => Self::from_date(next),
            None => {
                // 9999-12-31 or a date with zero parts: no next day to carry into
                *warn |= TimeWarnings::OUT_OF_RANGE;
                Self {
                    date: self.date,
                    hour: 23,
                    minute: 59,
                    second: 59,
                    usec: max_sec_part(dec),
                }
            }
        }
    }

    /// Put a TIME on the session's current date
    ///
    /// Times within `[00:00:00, 24:00:00)` keep the current date; others
    /// move the date by whole days.
    pub fn from_time(time: &Time, clock: &dyn SessionClock, diag: &mut ConversionDiagnostics) -> Option<Self> {
        let today = clock.current_date();
        if !time.is_negative() && time.hour() < 24 {
            return Self::new(today, time.hour(), time.minute(), time.second(), time.usec());
        }
        let Some(daynr) = today.daynr() else {
            diag.add(TimeWarnings::INVALID_VALUE);
            return None;
        };
        let total = daynr as i128 * USEC_PER_DAY as i128 + time.signed_usec() as i128;
        let mixed = u64::try_from(total).ok().and_then(|total| {
            let date = Date::from_daynr((total / USEC_PER_DAY) as i64)?;
            Self::from_tod_usec(date, total % USEC_PER_DAY)
        });
        if mixed.is_none() {
            diag.add(TimeWarnings::OUT_OF_RANGE);
        }
        mixed
    }

    pub(crate) fn from_naive(naive: chrono::NaiveDateTime, usec: u32) -> Option<Self> {
        let date = Date::from_naive(naive.date())?;
        Self::new(date, naive.hour(), naive.minute(), naive.second(), usec)
    }

    pub(crate) fn to_naive(self) -> Option<chrono::NaiveDateTime> {
        self.date
            .to_naive()?
            .and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
    }

    pub(crate) fn packed_fields(&self) -> PackedFields {
        PackedFields {
            year: self.date.year(),
            month: self.date.month(),
            day: self.date.day(),
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            usec: self.usec,
            neg: false,
        }
    }

    pub fn to_packed(&self) -> i64 {
        pack(&self.packed_fields())
    }

    pub fn from_packed(packed: i64) -> Option<Self> {
        let f = unpack(packed);
        if f.neg {
            return None;
        }
        let date = Date::checked(f.year, f.month, f.day, DateMode::LENIENT).ok()?;
        Self::new(date, f.hour, f.minute, f.second, f.usec)
    }

    /// `YYYYMMDDHHMMSS`
    pub fn to_longlong(&self) -> i64 {
        self.date.to_longlong() * 1_000_000
            + self.hour as i64 * 10_000
            + self.minute as i64 * 100
            + self.second as i64
    }

    pub fn to_double(&self) -> f64 {
        self.to_longlong() as f64 + self.usec as f64 / USEC_PER_SEC as f64
    }

    pub fn to_decimal(&self) -> Decimal {
        let scaled = self.to_longlong() as i128 * USEC_PER_SEC as i128 + self.usec as i128;
        Decimal::from_i128_with_scale(scaled, MAX_DECIMALS as u32).normalize()
    }

    /// Text form with exactly `dec` fractional digits
    pub fn to_string_with(&self, dec: u8) -> String {
        format!(
            "{} {:02}:{:02}:{:02}{}",
            self.date,
            self.hour,
            self.minute,
            self.second,
            format_fraction(self.usec, dec)
        )
    }
}

impl From<Date> for Datetime {
    fn from(date: Date) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dec = if self.usec == 0 { 0 } else { MAX_DECIMALS };
        write!(f, "{}", self.to_string_with(dec))
    }
}
