//! TIME values
//!
//! A TIME is a signed duration in `[-838:59:59.999999, 838:59:59.999999]`,
//! not a time of day. Hours above 23 are normal.

use crate::datetime::Datetime;
use crate::frac::{format_fraction, is_exact, round_usec};
use crate::limits::{
    max_sec_part, MAX_DECIMALS, TIME_MAX_HOUR, TIME_MAX_MINUTE, TIME_MAX_SECOND, USEC_PER_DAY,
    USEC_PER_SEC,
};
use crate::options::{DatetimeToTimeMode, RoundMode};
use crate::packed::{pack, unpack_time, PackedFields};
use crate::session::SessionClock;
use rust_decimal::Decimal;
use sqlscalar_diagnostics::{ConversionDiagnostics, TimeWarnings};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    neg: bool,
    hour: u16,
    minute: u8,
    second: u8,
    usec: u32,
}

impl Time {
    pub fn new(neg: bool, hour: u32, minute: u32, second: u32, usec: u32) -> Option<Self> {
        if hour > TIME_MAX_HOUR || minute > TIME_MAX_MINUTE || second > TIME_MAX_SECOND {
            return None;
        }
        if usec as u64 >= USEC_PER_SEC {
            return None;
        }
        let zero = hour == 0 && minute == 0 && second == 0 && usec == 0;
        Some(Self {
            neg: neg && !zero,
            hour: hour as u16,
            minute: minute as u8,
            second: second as u8,
            usec,
        })
    }

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        Self::new(false, hour, minute, second, 0)
    }

    /// Largest TIME representable with `dec` fractional digits
    pub fn max_at(dec: u8) -> Self {
        Self::max_with_hour(TIME_MAX_HOUR, dec, false)
    }

    fn max_with_hour(max_hour: u32, dec: u8, neg: bool) -> Self {
        Self {
            neg,
            hour: max_hour.min(TIME_MAX_HOUR) as u16,
            minute: TIME_MAX_MINUTE as u8,
            second: TIME_MAX_SECOND as u8,
            usec: max_sec_part(dec),
        }
    }

    /// Build from loose fields, saturating past `max_hour:59:59` at `dec` digits
    ///
    /// Minutes or seconds of 60 and more are invalid.
    pub(crate) fn from_fields_saturating(
        neg: bool,
        hour: u64,
        minute: u32,
        second: u32,
        usec: u32,
        dec: u8,
        max_hour: u32,
        warn: &mut TimeWarnings,
    ) -> Result<Self, TimeWarnings> {
        if minute > TIME_MAX_MINUTE || second > TIME_MAX_SECOND || usec as u64 >= USEC_PER_SEC {
            return Err(TimeWarnings::INVALID_VALUE);
        }
        let max_hour = max_hour.min(TIME_MAX_HOUR);
        let within = hour < max_hour as u64
            || (hour == max_hour as u64
                && (minute != TIME_MAX_MINUTE
                    || second != TIME_MAX_SECOND
                    || usec <= max_sec_part(dec)));
        if within {
            return Self::new(neg, hour as u32, minute, second, usec).ok_or(TimeWarnings::INVALID_VALUE);
        }
        *warn |= TimeWarnings::OUT_OF_RANGE;
        Ok(Self::max_with_hour(max_hour, dec, neg))
    }

    /// Elapsed seconds as a TIME, saturating past `max_hour:59:59`
    pub(crate) fn from_seconds_saturating(
        neg: bool,
        sec: u64,
        usec: u32,
        dec: u8,
        max_hour: u32,
        warn: &mut TimeWarnings,
    ) -> Self {
        let max_hour = max_hour.min(TIME_MAX_HOUR);
        let max_seconds = max_hour as u64 * 3600 + 59 * 60 + 59;
        if sec > max_seconds {
            *warn |= TimeWarnings::OUT_OF_RANGE;
            return Self::max_with_hour(max_hour, dec, neg);
        }
        let zero = sec == 0 && usec == 0;
        Self {
            neg: neg && !zero,
            hour: (sec / 3600) as u16,
            minute: ((sec % 3600) / 60) as u8,
            second: (sec % 60) as u8,
            usec: usec.min(999_999),
        }
    }

    pub(crate) fn from_total_usec(neg: bool, total: u64) -> Option<Self> {
        let sec = total / USEC_PER_SEC;
        Self::new(
            neg,
            u32::try_from(sec / 3600).ok()?,
            ((sec % 3600) / 60) as u32,
            (sec % 60) as u32,
            (total % USEC_PER_SEC) as u32,
        )
    }

    pub(crate) fn total_usec(&self) -> u64 {
        let sec = self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64;
        sec * USEC_PER_SEC + self.usec as u64
    }

    pub(crate) fn signed_usec(&self) -> i64 {
        let total = self.total_usec() as i64;
        if self.neg { -total } else { total }
    }

    pub fn is_negative(&self) -> bool {
        self.neg
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

    /// Round to `dec` fractional digits
    pub fn round(&self, dec: u8, mode: RoundMode, diag: &mut ConversionDiagnostics) -> Self {
        self.round_within(dec, mode, TIME_MAX_HOUR, diag)
    }

    /// Round to `dec` fractional digits, saturating past `max_hour:59:59`
    pub fn round_within(&self, dec: u8, mode: RoundMode, max_hour: u32, diag: &mut ConversionDiagnostics) -> Self {
        let mut warn = TimeWarnings::NONE;
        let out = self.round_nanos(dec, mode, 0, max_hour, &mut warn);
        diag.add(warn);
        out
    }

    pub(crate) fn is_exact(&self, dec: u8, nanos: u32) -> bool {
        is_exact(self.total_usec(), nanos, dec)
    }

    pub(crate) fn round_nanos(
        &self,
        dec: u8,
        mode: RoundMode,
        nanos: u32,
        max_hour: u32,
        warn: &mut TimeWarnings,
    ) -> Self {
        let dec = dec.min(MAX_DECIMALS);
        if mode == RoundMode::None {
            debug_assert!(self.is_exact(dec, nanos), "{self} has digits beyond {dec}");
            return *self;
        }
        let rounded = round_usec(self.total_usec(), nanos, dec, mode);
        let max = Self::max_with_hour(max_hour, dec, self.neg);
        if rounded > max.total_usec() {
            *warn |= TimeWarnings::OUT_OF_RANGE;
            return max;
        }
        // rounded never exceeds the maximum here, so the value is constructible
        Self::from_total_usec(self.neg, rounded).unwrap_or(*self)
    }

    /// Convert a DATETIME under a conversion mode
    pub fn from_datetime(
        dt: &Datetime,
        mode: DatetimeToTimeMode,
        clock: &dyn SessionClock,
        diag: &mut ConversionDiagnostics,
    ) -> Option<Self> {
        let mut warn = TimeWarnings::NONE;
        let result = Self::from_datetime_inner(dt, mode, clock, &mut warn);
        match result {
            Ok(time) => {
                diag.add(warn);
                Some(time)
            }
            Err(err) => {
                diag.add(warn | err);
                None
            }
        }
    }

    fn from_datetime_inner(
        dt: &Datetime,
        mode: DatetimeToTimeMode,
        clock: &dyn SessionClock,
        warn: &mut TimeWarnings,
    ) -> Result<Self, TimeWarnings> {
        let date = dt.date();
        let time_part = || {
            Self::new(false, dt.hour(), dt.minute(), dt.second(), dt.usec())
                .ok_or(TimeWarnings::INVALID_VALUE)
        };
        match mode {
            DatetimeToTimeMode::Truncate => time_part(),
            DatetimeToTimeMode::Disallow | DatetimeToTimeMode::RequireZeroDate => {
                if date.is_zero() {
                    time_part()
                } else {
                    Err(TimeWarnings::INVALID_VALUE)
                }
            }
            DatetimeToTimeMode::MixDaysIntoHours => {
                if date.year() == 0 && date.month() == 0 {
                    let hour = date.day() as u64 * 24 + dt.hour() as u64;
                    Self::from_fields_saturating(
                        false,
                        hour,
                        dt.minute(),
                        dt.second(),
                        dt.usec(),
                        MAX_DECIMALS,
                        TIME_MAX_HOUR,
                        warn,
                    )
                } else {
                    time_part()
                }
            }
            DatetimeToTimeMode::SubtractCurrentDate => {
                let day = date.daynr().ok_or(TimeWarnings::INVALID_VALUE)?;
                let today = clock
                    .current_date()
                    .daynr()
                    .ok_or(TimeWarnings::INVALID_VALUE)?;
                let diff = (day - today) as i128 * USEC_PER_DAY as i128 + dt.time_of_day_usec() as i128;
                let total = diff.unsigned_abs();
                let sec = u64::try_from(total / USEC_PER_SEC as u128).unwrap_or(u64::MAX);
                let usec = (total % USEC_PER_SEC as u128) as u32;
                Ok(Self::from_seconds_saturating(
                    diff < 0,
                    sec,
                    usec,
                    MAX_DECIMALS,
                    TIME_MAX_HOUR,
                    warn,
                ))
            }
        }
    }

    pub(crate) fn packed_fields(&self) -> PackedFields {
        PackedFields {
            neg: self.neg,
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            usec: self.usec,
            ..PackedFields::default()
        }
    }

    pub fn to_packed(&self) -> i64 {
        pack(&self.packed_fields())
    }

    pub fn from_packed(packed: i64) -> Option<Self> {
        let f = unpack_time(packed);
        if f.year != 0 {
            return None;
        }
        Self::new(f.neg, f.hour, f.minute, f.second, f.usec)
    }

    /// `[-]HHMMSS`
    pub fn to_longlong(&self) -> i64 {
        let value = self.hour as i64 * 10_000 + self.minute as i64 * 100 + self.second as i64;
        if self.neg { -value } else { value }
    }

    pub fn to_double(&self) -> f64 {
        let value = (self.hour as i64 * 10_000 + self.minute as i64 * 100 + self.second as i64) as f64
            + self.usec as f64 / USEC_PER_SEC as f64;
        if self.neg { -value } else { value }
    }

    pub fn to_decimal(&self) -> Decimal {
        let scaled = self.to_longlong().unsigned_abs() as i128 * USEC_PER_SEC as i128 + self.usec as i128;
        let scaled = if self.neg { -scaled } else { scaled };
        Decimal::from_i128_with_scale(scaled, MAX_DECIMALS as u32).normalize()
    }

    /// Text form with exactly `dec` fractional digits
    pub fn to_string_with(&self, dec: u8) -> String {
        format!(
            "{}{:02}:{:02}:{:02}{}",
            if self.neg { "-" } else { "" },
            self.hour,
            self.minute,
            self.second,
            format_fraction(self.usec, dec)
        )
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dec = if self.usec == 0 { 0 } else { MAX_DECIMALS };
        write!(f, "{}", self.to_string_with(dec))
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.signed_usec().cmp(&other.signed_usec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::Date;
    use crate::session::FixedClock;
    use pretty_assertions::assert_eq;

    fn time(neg: bool, h: u32, m: u32, s: u32, us: u32) -> Time {
        Time::new(neg, h, m, s, us).unwrap()
    }

    #[test]
    fn test_display() {
        assert_eq!(time(false, 12, 30, 45, 0).to_string(), "12:30:45");
        assert_eq!(time(true, 838, 59, 59, 999_999).to_string(), "-838:59:59.999999");
        assert_eq!(time(false, 1, 2, 3, 450_000).to_string_with(2), "01:02:03.45");
    }

    #[test]
    fn test_negative_zero_normalized() {
        assert!(!time(true, 0, 0, 0, 0).is_negative());
    }

    #[test]
    fn test_range() {
        assert!(Time::new(false, 839, 0, 0, 0).is_none());
        assert!(Time::new(false, 1, 60, 0, 0).is_none());
        assert!(Time::new(false, 1, 0, 0, 1_000_000).is_none());
    }

    #[test]
    fn test_none_keeps_exact_value() {
        let mut diag = ConversionDiagnostics::new();
        let value = time(false, 1, 2, 3, 450_000);
        assert_eq!(value.round(2, RoundMode::None, &mut diag), value);
        assert!(diag.is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "digits beyond")]
    fn test_none_with_extra_digits_panics() {
        let mut diag = ConversionDiagnostics::new();
        time(false, 1, 2, 3, 456_789).round(2, RoundMode::None, &mut diag);
    }

    #[test]
    fn test_round_saturates_at_configured_hour() {
        let mut warn = TimeWarnings::NONE;
        let out = time(true, 24, 59, 59, 999_999).round_nanos(6, RoundMode::Round, 500, 24, &mut warn);
        assert_eq!(out.to_string(), "-24:59:59.999999");
        assert!(warn.contains(TimeWarnings::OUT_OF_RANGE));
    }

    #[test]
    fn test_round_saturates_at_max() {
        let mut warn = TimeWarnings::NONE;
        let max = Time::max_at(6);
        let out = max.round_nanos(6, RoundMode::Round, 500, TIME_MAX_HOUR, &mut warn);
        assert_eq!(out, max);
        assert!(warn.contains(TimeWarnings::OUT_OF_RANGE));

        let mut diag = ConversionDiagnostics::new();
        let out = time(false, 838, 59, 59, 500_000).round(0, RoundMode::Round, &mut diag);
        assert_eq!(out, Time::max_at(0));
        assert_eq!(out.to_string(), "838:59:59");
        assert!(diag.has(TimeWarnings::OUT_OF_RANGE));
    }

    #[test]
    fn test_round_carries_into_hours() {
        let mut diag = ConversionDiagnostics::new();
        let out = time(true, 10, 59, 59, 999_500).round(3, RoundMode::Round, &mut diag);
        assert_eq!(out, time(true, 11, 0, 0, 0));
        assert!(diag.is_empty());

        let out = time(false, 10, 59, 59, 999_500).round(3, RoundMode::Truncate, &mut diag);
        assert_eq!(out, time(false, 10, 59, 59, 999_000));
    }

    #[test]
    fn test_saturating_fields() {
        let mut warn = TimeWarnings::NONE;
        let out = Time::from_fields_saturating(false, 900, 10, 0, 0, 2, 838, &mut warn).unwrap();
        assert_eq!(out, time(false, 838, 59, 59, 990_000));
        assert!(warn.contains(TimeWarnings::OUT_OF_RANGE));

        let mut warn = TimeWarnings::NONE;
        let out = Time::from_fields_saturating(true, 100, 0, 0, 0, 6, 99, &mut warn).unwrap();
        assert_eq!(out, time(true, 99, 59, 59, 999_999));

        let mut warn = TimeWarnings::NONE;
        assert_eq!(
            Time::from_fields_saturating(false, 1, 61, 0, 0, 6, 838, &mut warn),
            Err(TimeWarnings::INVALID_VALUE)
        );
    }

    #[test]
    fn test_packed_and_numbers() {
        let t = time(true, 100, 2, 3, 40);
        assert_eq!(Time::from_packed(t.to_packed()), Some(t));
        assert_eq!(t.to_longlong(), -1_000_203);
        assert_eq!(t.to_decimal().to_string(), "-1000203.00004");
    }

    #[test]
    fn test_from_datetime_modes() {
        let clock = FixedClock::new(Date::from_ymd(2023, 1, 15).unwrap());
        let dt = Datetime::from_ymd_hms(2023, 1, 16, 1, 0, 0).unwrap();
        let mut diag = ConversionDiagnostics::new();

        assert_eq!(
            Time::from_datetime(&dt, DatetimeToTimeMode::Truncate, &clock, &mut diag),
            Some(time(false, 1, 0, 0, 0))
        );
        assert_eq!(
            Time::from_datetime(&dt, DatetimeToTimeMode::MixDaysIntoHours, &clock, &mut diag),
            Some(time(false, 1, 0, 0, 0))
        );
        assert_eq!(
            Time::from_datetime(&dt, DatetimeToTimeMode::SubtractCurrentDate, &clock, &mut diag),
            Some(time(false, 25, 0, 0, 0))
        );
        assert!(diag.is_empty());

        assert_eq!(
            Time::from_datetime(&dt, DatetimeToTimeMode::Disallow, &clock, &mut diag),
            None
        );
        assert!(diag.has(TimeWarnings::INVALID_VALUE));
    }

    #[test]
    fn test_from_datetime_subtract_saturates() {
        let clock = FixedClock::new(Date::from_ymd(2023, 1, 15).unwrap());
        let dt = Datetime::from_ymd_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let mut diag = ConversionDiagnostics::new();
        let out = Time::from_datetime(&dt, DatetimeToTimeMode::SubtractCurrentDate, &clock, &mut diag);
        assert_eq!(out, Some(time(true, 838, 59, 59, 999_999)));
        assert!(diag.has(TimeWarnings::OUT_OF_RANGE));
    }
}
