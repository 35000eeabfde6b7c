//! Fixed-point seconds
//!
//! [`Sec6`] is a numeric SQL literal split into sign, whole seconds and
//! microseconds. [`Sec9`] additionally keeps the nanosecond remainder so the
//! final rounding can look past the sixth digit. Both interpret their digits
//! the SQL way:
//!
//! - `[-]HHHMMSS[.ffffff]` as a TIME
//! - `YYMMDD`, `YYYYMMDD` as a DATE
//! - `YYMMDDHHMMSS`, `YYYYMMDDHHMMSS` as a DATETIME
//!
//! or as plain elapsed seconds with [`Sec6::sec_to_time`].

use crate::date::Date;
use crate::datetime::Datetime;
use crate::limits::{
    DATETIME_MAX_NUMBER, TIME_MAX_MINUTE, TIME_MAX_NUMBER, TIME_MAX_SECOND, TIME_MAX_SECOND_PART,
    USEC_PER_SEC, YY_PART_YEAR,
};
use crate::options::{DateMode, TemporalOptions};
use crate::temporal::Temporal;
use crate::time::Time;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlscalar_diagnostics::{ConversionDiagnostics, TimeWarnings};
use std::fmt;

const SEC_MAX: u64 = i64::MAX as u64;

/// Seconds with microsecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sec6 {
    neg: bool,
    sec: u64,
    usec: u32,
    truncated: bool,
}

/// The fixed-point seconds type used by numeric temporal conversion
pub type FixedPointSeconds = Sec6;

impl Sec6 {
    pub fn new(neg: bool, sec: u64, usec: u32) -> Option<Self> {
        if sec > SEC_MAX || usec as u64 >= USEC_PER_SEC {
            return None;
        }
        Some(Self::normalized(neg, sec, usec, false))
    }

    fn normalized(neg: bool, sec: u64, usec: u32, truncated: bool) -> Self {
        Self {
            neg: neg && (sec != 0 || usec != 0),
            sec,
            usec,
            truncated,
        }
    }

    pub fn from_i64(value: i64) -> Self {
        let sec = value.unsigned_abs();
        if sec > SEC_MAX {
            return Self::normalized(true, SEC_MAX, 0, true);
        }
        Self::normalized(value < 0, sec, 0, false)
    }

    pub fn from_u64(value: u64) -> Self {
        if value > SEC_MAX {
            return Self::normalized(false, SEC_MAX, 0, true);
        }
        Self::normalized(false, value, 0, false)
    }

    /// Rounds to the nearest microsecond
    ///
    /// NaN and infinities are not meaningful inputs; they come out flagged
    /// as truncated (NaN as zero, infinities saturated).
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::normalized(false, 0, 0, true);
        }
        let neg = value < 0.0;
        let abs = value.abs();
        if abs >= SEC_MAX as f64 {
            return Self::normalized(neg, SEC_MAX, 0, true);
        }
        let mut sec = abs.trunc() as u64;
        let mut usec = ((abs - abs.trunc()) * USEC_PER_SEC as f64).round() as u32;
        if usec as u64 >= USEC_PER_SEC {
            sec += 1;
            usec = 0;
        }
        Self::normalized(neg, sec, usec, false)
    }

    /// Digits past the sixth fractional digit are dropped
    pub fn from_decimal(value: Decimal) -> Self {
        Sec9::from_decimal(value).sec6
    }

    pub fn is_negative(&self) -> bool {
        self.neg
    }

    pub fn sec(&self) -> u64 {
        self.sec
    }

    pub fn usec(&self) -> u32 {
        self.usec
    }

    /// Whether the input did not fit and was saturated
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// `[-]HHHMMSS` as TIME, `YYYYMMDD[HHMMSS]` as DATE or DATETIME
    pub fn to_datetime_or_time(&self, opts: &TemporalOptions, diag: &mut ConversionDiagnostics) -> Temporal {
        let mut warn = TimeWarnings::NONE;
        let result = self.datetime_or_time(opts, &mut warn);
        Temporal::finish(result, warn, 0, opts, diag)
    }

    /// `YYYYMMDD[HHMMSS]` as DATE or DATETIME; negative values are out of range
    pub fn to_datetime_or_date(&self, opts: &TemporalOptions, diag: &mut ConversionDiagnostics) -> Temporal {
        let mut warn = TimeWarnings::NONE;
        let result = self.datetime_or_date(opts, &mut warn);
        Temporal::finish(result, warn, 0, opts, diag)
    }

    /// `[-]HHHMMSS` as TIME only
    pub fn to_time(&self, opts: &TemporalOptions, diag: &mut ConversionDiagnostics) -> Option<Time> {
        let mut warn = self.truncation();
        let result = number_to_time(self.neg, self.sec, self.usec, opts.max_hour(), &mut warn).map(Temporal::Time);
        match Temporal::finish(result, warn, 0, opts, diag) {
            Temporal::Time(time) => Some(time),
            _ => None,
        }
    }

    /// Elapsed seconds as TIME, saturated at `838:59:59` with `dec` digits
    pub fn sec_to_time(&self, dec: u8, diag: &mut ConversionDiagnostics) -> Time {
        let mut warn = self.truncation();
        let time = Time::from_seconds_saturating(
            self.neg,
            self.sec,
            self.usec,
            dec,
            crate::limits::TIME_MAX_HOUR,
            &mut warn,
        );
        diag.add(warn);
        time
    }

    fn truncation(&self) -> TimeWarnings {
        if self.truncated {
            TimeWarnings::TRUNCATED
        } else {
            TimeWarnings::NONE
        }
    }

    pub(crate) fn datetime_or_time(
        &self,
        opts: &TemporalOptions,
        warn: &mut TimeWarnings,
    ) -> Result<Temporal, TimeWarnings> {
        *warn |= self.truncation();
        if !self.neg && self.sec > TIME_MAX_NUMBER && self.sec <= DATETIME_MAX_NUMBER {
            number_to_datetime(self.sec, self.usec, opts.date_mode, warn)
        } else {
            number_to_time(self.neg, self.sec, self.usec, opts.max_hour(), warn).map(Temporal::Time)
        }
    }

    pub(crate) fn datetime_or_date(
        &self,
        opts: &TemporalOptions,
        warn: &mut TimeWarnings,
    ) -> Result<Temporal, TimeWarnings> {
        *warn |= self.truncation();
        if self.neg {
            return Err(TimeWarnings::OUT_OF_RANGE);
        }
        number_to_datetime(self.sec, self.usec, opts.date_mode, warn)
    }
}

impl fmt::Display for Sec6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.neg {
            write!(f, "-")?;
        }
        write!(f, "{}", self.sec)?;
        if self.usec != 0 {
            write!(f, ".{:06}", self.usec)?;
        }
        Ok(())
    }
}

/// Seconds with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sec9 {
    sec6: Sec6,
    nsec: u32,
}

impl Sec9 {
    pub fn new(sec6: Sec6, nsec: u32) -> Option<Self> {
        (nsec < 1000).then_some(Self { sec6, nsec })
    }

    /// Exact to the nanosecond; further digits are dropped
    pub fn from_decimal(value: Decimal) -> Self {
        let neg = value.is_sign_negative() && !value.is_zero();
        let abs = value.abs();
        let Some(sec) = abs.trunc().to_u64().filter(|sec| *sec <= SEC_MAX) else {
            return Self {
                sec6: Sec6::normalized(neg, SEC_MAX, 0, true),
                nsec: 0,
            };
        };
        let nanos = (abs.fract() * Decimal::from(1_000_000_000u32))
            .trunc()
            .to_u32()
            .unwrap_or(0);
        let sec6 = Sec6 {
            // -0.0000004 has only nanoseconds and keeps its sign
            neg: neg && (sec != 0 || nanos != 0),
            sec,
            usec: nanos / 1000,
            truncated: false,
        };
        Self {
            sec6,
            nsec: nanos % 1000,
        }
    }

    pub fn sec6(&self) -> &Sec6 {
        &self.sec6
    }

    pub fn nsec(&self) -> u32 {
        self.nsec
    }

    pub fn to_datetime_or_time(&self, opts: &TemporalOptions, diag: &mut ConversionDiagnostics) -> Temporal {
        let mut warn = TimeWarnings::NONE;
        let result = self.sec6.datetime_or_time(opts, &mut warn);
        Temporal::finish(result, warn, self.nsec, opts, diag)
    }

    pub fn to_datetime_or_date(&self, opts: &TemporalOptions, diag: &mut ConversionDiagnostics) -> Temporal {
        let mut warn = TimeWarnings::NONE;
        let result = self.sec6.datetime_or_date(opts, &mut warn);
        Temporal::finish(result, warn, self.nsec, opts, diag)
    }

    /// Elapsed seconds as TIME, rounded per the options
    pub fn sec_to_time(&self, opts: &TemporalOptions, diag: &mut ConversionDiagnostics) -> Time {
        let mut warn = self.sec6.truncation();
        let time = Time::from_seconds_saturating(
            self.sec6.neg,
            self.sec6.sec,
            self.sec6.usec,
            opts.decimals(),
            opts.max_hour(),
            &mut warn,
        );
        let dec = opts.decimals();
        let mode = opts.round_mode.for_input(time.is_exact(dec, self.nsec));
        let time = time.round_nanos(dec, mode, self.nsec, opts.max_hour(), &mut warn);
        diag.add(warn);
        time
    }
}

impl From<Sec6> for Sec9 {
    fn from(sec6: Sec6) -> Self {
        Self { sec6, nsec: 0 }
    }
}

/// Read `YYMMDD`, `YYYYMMDD`, `YYMMDDHHMMSS` or `YYYYMMDDHHMMSS`
pub(crate) fn number_to_datetime(
    nr: u64,
    usec: u32,
    mode: DateMode,
    warn: &mut TimeWarnings,
) -> Result<Temporal, TimeWarnings> {
    let yy = YY_PART_YEAR as u64;
    let mut is_date = true;

    let nr = if nr == 0 || nr >= 10_000_101_000_000 {
        is_date = false;
        nr
    } else if nr < 101 {
        return Err(TimeWarnings::INVALID_VALUE);
    } else if nr <= (yy - 1) * 10_000 + 1231 {
        (nr + 20_000_000) * 1_000_000
    } else if nr < yy * 10_000 + 101 {
        return Err(TimeWarnings::INVALID_VALUE);
    } else if nr <= 991_231 {
        (nr + 19_000_000) * 1_000_000
    } else if nr < 10_000_101 {
        return Err(TimeWarnings::INVALID_VALUE);
    } else if nr <= 99_991_231 {
        nr * 1_000_000
    } else if nr < 101_000_000 {
        return Err(TimeWarnings::INVALID_VALUE);
    } else {
        is_date = false;
        if nr <= (yy - 1) * 10_000_000_000 + 1_231_235_959 {
            nr + 20_000_000_000_000
        } else if nr < yy * 10_000_000_000 + 101_000_000 {
            return Err(TimeWarnings::INVALID_VALUE);
        } else if nr <= 991_231_235_959 {
            nr + 19_000_000_000_000
        } else {
            nr
        }
    };

    let date_part = nr / 1_000_000;
    let time_part = nr % 1_000_000;
    let (year, month, day) = (date_part / 10_000, (date_part % 10_000) / 100, date_part % 100);
    let (hour, minute, second) = (time_part / 10_000, (time_part % 10_000) / 100, time_part % 100);

    if year > 9999
        || hour > 23
        || minute > TIME_MAX_MINUTE as u64
        || second > TIME_MAX_SECOND as u64
        || usec > TIME_MAX_SECOND_PART
    {
        return Err(TimeWarnings::INVALID_VALUE);
    }
    let date = Date::checked(year as u32, month as u32, day as u32, mode)?;

    if is_date {
        if usec != 0 {
            *warn |= TimeWarnings::NOTE_TRUNCATED;
        }
        return Ok(Temporal::Date(date));
    }
    Datetime::new(date, hour as u32, minute as u32, second as u32, usec)
        .map(Temporal::Datetime)
        .ok_or(TimeWarnings::INVALID_VALUE)
}

/// Read `[-]HHHMMSS`, saturating past `max_hour:59:59`
pub(crate) fn number_to_time(
    neg: bool,
    nr: u64,
    usec: u32,
    max_hour: u32,
    warn: &mut TimeWarnings,
) -> Result<Time, TimeWarnings> {
    let max_value = max_hour as u64 * 10_000 + 5959;
    let (nr, usec) = if nr > max_value {
        *warn |= TimeWarnings::OUT_OF_RANGE;
        (max_value, TIME_MAX_SECOND_PART)
    } else {
        (nr, usec)
    };
    let hour = nr / 10_000;
    let minute = (nr / 100 % 100) as u32;
    let second = (nr % 100) as u32;
    if minute > TIME_MAX_MINUTE || second > TIME_MAX_SECOND || usec > TIME_MAX_SECOND_PART {
        return Err(TimeWarnings::INVALID_VALUE);
    }
    Time::new(neg, hour as u32, minute, second, usec).ok_or(TimeWarnings::INVALID_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::str::FromStr;

    fn opts() -> TemporalOptions {
        TemporalOptions::default()
    }

    #[test]
    fn test_from_f64_rounds_to_microseconds() {
        let s = Sec6::from_f64(-12.3456789);
        assert!(s.is_negative());
        assert_eq!((s.sec(), s.usec()), (12, 345_679));

        let s = Sec6::from_f64(0.9999996);
        assert_eq!((s.sec(), s.usec()), (1, 0));
    }

    #[test]
    fn test_from_f64_non_finite() {
        assert!(Sec6::from_f64(f64::NAN).truncated());
        let inf = Sec6::from_f64(f64::NEG_INFINITY);
        assert!(inf.truncated());
        assert!(inf.is_negative());
        assert_eq!(inf.sec(), i64::MAX as u64);
    }

    #[test]
    fn test_from_integers() {
        let s = Sec6::from_i64(i64::MIN);
        assert!(s.truncated());
        assert_eq!(s.sec(), i64::MAX as u64);
        assert!(Sec6::from_u64(u64::MAX).truncated());
        assert!(!Sec6::from_i64(-5).truncated());
    }

    #[test]
    fn test_sec9_from_decimal() {
        let s = Sec9::from_decimal(Decimal::from_str("-838.1234567891").unwrap());
        assert!(s.sec6().is_negative());
        assert_eq!(s.sec6().sec(), 838);
        assert_eq!(s.sec6().usec(), 123_456);
        assert_eq!(s.nsec(), 789);
    }

    #[test]
    fn test_datetime_number() {
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_i64(20230115123045).to_datetime_or_time(&opts(), &mut diag);
        assert_eq!(
            value,
            Temporal::Datetime(Datetime::from_ymd_hms(2023, 1, 15, 12, 30, 45).unwrap())
        );
        assert!(diag.is_empty());
    }

    #[test]
    fn test_invalid_time_number() {
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_i64(999999).to_datetime_or_time(&opts(), &mut diag);
        assert_eq!(value, Temporal::None);
        assert!(diag.has(TimeWarnings::INVALID_VALUE));
    }

    #[rstest]
    #[case(101, "2000-01-01")]
    #[case(691231, "2069-12-31")]
    #[case(700101, "1970-01-01")]
    #[case(991231, "1999-12-31")]
    #[case(20230115, "2023-01-15")]
    #[case(230115123045, "2023-01-15 12:30:45")]
    #[case(991231235959, "1999-12-31 23:59:59")]
    #[case(99991231235959, "9999-12-31 23:59:59")]
    fn test_datetime_or_date_shapes(#[case] number: i64, #[case] expected: &str) {
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_i64(number).to_datetime_or_date(&opts(), &mut diag);
        assert_eq!(value.to_string(), expected);
        assert!(diag.is_empty());
    }

    #[rstest]
    #[case(100)]
    #[case(691232)]
    #[case(700100)]
    #[case(9_999_999)]
    #[case(100_000_000)]
    fn test_datetime_or_date_invalid(#[case] number: i64) {
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_i64(number).to_datetime_or_date(&opts(), &mut diag);
        assert_eq!(value, Temporal::None);
        assert!(!diag.is_empty());
    }

    #[test]
    fn test_datetime_or_date_negative() {
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_i64(-20230115).to_datetime_or_date(&opts(), &mut diag);
        assert_eq!(value, Temporal::None);
        assert_eq!(diag.warnings(), TimeWarnings::OUT_OF_RANGE);
    }

    #[test]
    fn test_date_fraction_is_noted() {
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_f64(20230115.5).to_datetime_or_time(&opts(), &mut diag);
        assert_eq!(value, Temporal::Date(Date::from_ymd(2023, 1, 15).unwrap()));
        assert_eq!(diag.warnings(), TimeWarnings::NOTE_TRUNCATED);
    }

    #[test]
    fn test_zero_date_number() {
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_i64(0).to_datetime_or_date(&opts(), &mut diag);
        assert_eq!(value, Temporal::None);
        assert!(diag.has(TimeWarnings::ZERO_DATE));

        let lenient = opts().with_date_mode(DateMode::LENIENT);
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_i64(0).to_datetime_or_date(&lenient, &mut diag);
        assert_eq!(value, Temporal::Datetime(Datetime::zero()));
    }

    #[rstest]
    #[case(123045, false, "12:30:45")]
    #[case(-123045, false, "-12:30:45")]
    #[case(8385959, false, "838:59:59")]
    #[case(8400000, true, "838:59:59.999999")]
    #[case(-99999999999, true, "-838:59:59.999999")]
    fn test_time_numbers(#[case] number: i64, #[case] out_of_range: bool, #[case] expected: &str) {
        let mut diag = ConversionDiagnostics::new();
        let value = Sec6::from_i64(number).to_datetime_or_time(&opts(), &mut diag);
        assert_eq!(value.to_string(), expected);
        assert_eq!(diag.has(TimeWarnings::OUT_OF_RANGE), out_of_range);
    }

    #[test]
    fn test_time_numbers_respect_max_hour() {
        let mut diag = ConversionDiagnostics::new();
        let capped = opts().with_max_hour(24);
        let value = Sec6::from_i64(250000).to_time(&capped, &mut diag);
        assert_eq!(value.map(|t| t.to_string()), Some("24:59:59.999999".to_string()));
        assert!(diag.has(TimeWarnings::OUT_OF_RANGE));
    }

    #[test]
    fn test_sec_to_time() {
        let mut diag = ConversionDiagnostics::new();
        let t = Sec6::from_f64(3661.25).sec_to_time(6, &mut diag);
        assert_eq!(t.to_string(), "01:01:01.250000");
        assert!(diag.is_empty());

        let t = Sec6::from_i64(3_020_400).sec_to_time(0, &mut diag);
        assert_eq!(t, Time::max_at(0));
        assert!(diag.has(TimeWarnings::OUT_OF_RANGE));

        let mut diag = ConversionDiagnostics::new();
        let t = Sec6::from_i64(-3_020_400).sec_to_time(3, &mut diag);
        assert_eq!(t.to_string(), "-838:59:59.999000");
    }

    #[test]
    fn test_sec9_rounds_with_nanoseconds() {
        let opts = opts().with_round_mode(crate::RoundMode::Round);
        let mut diag = ConversionDiagnostics::new();
        let s = Sec9::from_decimal(Decimal::from_str("8385959.9999995").unwrap());
        let value = s.to_datetime_or_time(&opts, &mut diag);
        assert_eq!(value, Temporal::Time(Time::max_at(6)));
        assert!(diag.has(TimeWarnings::OUT_OF_RANGE));

        let mut diag = ConversionDiagnostics::new();
        let s = Sec9::from_decimal(Decimal::from_str("123045.0000004").unwrap());
        let value = s.to_datetime_or_time(&opts, &mut diag);
        assert_eq!(value.to_string(), "12:30:45");
        assert!(diag.is_empty());
    }
}
