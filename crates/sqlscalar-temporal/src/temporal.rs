//! The hybrid temporal value
//!
//! [`Temporal`] holds whatever kind a conversion produced: a DATE, a TIME, a
//! DATETIME, or nothing. Conversion failures never escape as a half-built
//! value; they become [`Temporal::None`] plus at least one warning flag.

use crate::date::Date;
use crate::limits::{MAX_DECIMALS, TIME_MAX_HOUR};
use crate::datetime::Datetime;
use crate::options::{RoundMode, TemporalOptions};
use crate::session::{SessionClock, SessionTimeZone};
use crate::text::{RawFields, RawTemporal, TemporalTextParser};
use crate::time::Time;
use crate::timestamp::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlscalar_diagnostics::{ConversionDiagnostics, TimeWarnings};
use std::fmt;

/// Kind tag of a temporal value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    Date,
    Time,
    Datetime,
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalKind::Date => write!(f, "date"),
            TemporalKind::Time => write!(f, "time"),
            TemporalKind::Datetime => write!(f, "datetime"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Temporal {
    /// No value (SQL NULL)
    #[default]
    None,
    Date(Date),
    Time(Time),
    Datetime(Datetime),
}

impl Temporal {
    pub fn kind(&self) -> Option<TemporalKind> {
        match self {
            Temporal::None => None,
            Temporal::Date(_) => Some(TemporalKind::Date),
            Temporal::Time(_) => Some(TemporalKind::Time),
            Temporal::Datetime(_) => Some(TemporalKind::Datetime),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Temporal::None)
    }

    /// Parse a literal with `parser` and validate the result
    pub fn from_text(
        text: &str,
        parser: &dyn TemporalTextParser,
        opts: &TemporalOptions,
        diag: &mut ConversionDiagnostics,
    ) -> Self {
        if diag.original().is_none() {
            diag.set_original(text);
        }
        match parser.parse(text) {
            Ok(RawTemporal::Number(sec)) => sec.to_datetime_or_time(opts, diag),
            Ok(RawTemporal::Fields(fields)) => Self::from_raw(&fields, opts, diag),
            Err(warn) => {
                diag.add(warn);
                Temporal::None
            }
        }
    }

    /// Validate parser output
    pub fn from_raw(raw: &RawFields, opts: &TemporalOptions, diag: &mut ConversionDiagnostics) -> Self {
        let mut warn = raw.warnings;
        let result = match raw.kind {
            TemporalKind::Date => Date::checked(raw.year, raw.month, raw.day, opts.date_mode).map(Temporal::Date),
            TemporalKind::Datetime => Date::checked(raw.year, raw.month, raw.day, opts.date_mode).and_then(|date| {
                let hour = u32::try_from(raw.hour).map_err(|_| TimeWarnings::INVALID_VALUE)?;
                Datetime::new(date, hour, raw.minute, raw.second, raw.usec)
                    .map(Temporal::Datetime)
                    .ok_or(TimeWarnings::INVALID_VALUE)
            }),
            TemporalKind::Time => Time::from_fields_saturating(
                raw.neg,
                raw.hour,
                raw.minute,
                raw.second,
                raw.usec,
                MAX_DECIMALS,
                opts.max_hour(),
                &mut warn,
            )
            .map(Temporal::Time),
        };
        Self::finish(result, warn, raw.nsec, opts, diag)
    }

    /// Round a successful conversion per the options and report
    pub(crate) fn finish(
        result: Result<Temporal, TimeWarnings>,
        mut warn: TimeWarnings,
        nanos: u32,
        opts: &TemporalOptions,
        diag: &mut ConversionDiagnostics,
    ) -> Self {
        match result {
            Ok(value) => {
                let dec = opts.decimals();
                let mode = opts.round_mode.for_input(value.is_exact(dec, nanos));
                let value = value.round_nanos(dec, mode, nanos, opts.max_hour(), &mut warn);
                diag.add(warn);
                value
            }
            Err(err) => {
                log::trace!("temporal conversion failed: {}", warn | err);
                diag.add(warn | err);
                Temporal::None
            }
        }
    }

    pub fn round(&self, dec: u8, mode: RoundMode, diag: &mut ConversionDiagnostics) -> Self {
        self.round_within(dec, mode, TIME_MAX_HOUR, diag)
    }

    /// Round, saturating a TIME past `max_hour:59:59`
    pub fn round_within(&self, dec: u8, mode: RoundMode, max_hour: u32, diag: &mut ConversionDiagnostics) -> Self {
        let mut warn = TimeWarnings::NONE;
        let out = self.round_nanos(dec, mode, 0, max_hour, &mut warn);
        diag.add(warn);
        out
    }

    pub(crate) fn is_exact(&self, dec: u8, nanos: u32) -> bool {
        match self {
            Temporal::None | Temporal::Date(_) => true,
            Temporal::Time(t) => t.is_exact(dec, nanos),
            Temporal::Datetime(dt) => dt.is_exact(dec, nanos),
        }
    }

    pub(crate) fn round_nanos(
        &self,
        dec: u8,
        mode: RoundMode,
        nanos: u32,
        max_hour: u32,
        warn: &mut TimeWarnings,
    ) -> Self {
        match self {
            Temporal::None | Temporal::Date(_) => *self,
            Temporal::Time(t) => Temporal::Time(t.round_nanos(dec, mode, nanos, max_hour, warn)),
            Temporal::Datetime(dt) => Temporal::Datetime(dt.round_nanos(dec, mode, nanos, warn)),
        }
    }

    pub fn to_packed(&self) -> Option<i64> {
        match self {
            Temporal::None => None,
            Temporal::Date(d) => Some(d.to_packed()),
            Temporal::Time(t) => Some(t.to_packed()),
            Temporal::Datetime(dt) => Some(dt.to_packed()),
        }
    }

    /// Unpack a stored value of a known kind; corrupt input yields `None`
    pub fn from_packed(kind: TemporalKind, packed: i64) -> Self {
        let value = match kind {
            TemporalKind::Date => Date::from_packed(packed).map(Temporal::Date),
            TemporalKind::Time => Time::from_packed(packed).map(Temporal::Time),
            TemporalKind::Datetime => Datetime::from_packed(packed).map(Temporal::Datetime),
        };
        value.unwrap_or(Temporal::None)
    }

    pub fn to_longlong(&self) -> Option<i64> {
        match self {
            Temporal::None => None,
            Temporal::Date(d) => Some(d.to_longlong()),
            Temporal::Time(t) => Some(t.to_longlong()),
            Temporal::Datetime(dt) => Some(dt.to_longlong()),
        }
    }

    pub fn to_double(&self) -> Option<f64> {
        match self {
            Temporal::None => None,
            Temporal::Date(d) => Some(d.to_double()),
            Temporal::Time(t) => Some(t.to_double()),
            Temporal::Datetime(dt) => Some(dt.to_double()),
        }
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Temporal::None => None,
            Temporal::Date(d) => Some(d.to_decimal()),
            Temporal::Time(t) => Some(t.to_decimal()),
            Temporal::Datetime(dt) => Some(dt.to_decimal()),
        }
    }

    pub fn to_string_with(&self, dec: u8) -> Option<String> {
        match self {
            Temporal::None => None,
            Temporal::Date(d) => Some(d.to_string()),
            Temporal::Time(t) => Some(t.to_string_with(dec)),
            Temporal::Datetime(dt) => Some(dt.to_string_with(dec)),
        }
    }

    /// TIME view; DATETIME goes through the configured conversion mode
    pub fn to_time(
        &self,
        opts: &TemporalOptions,
        clock: &dyn SessionClock,
        diag: &mut ConversionDiagnostics,
    ) -> Option<Time> {
        match self {
            Temporal::None => None,
            Temporal::Time(t) => Some(*t),
            Temporal::Date(d) => Time::from_datetime(&Datetime::from_date(*d), opts.datetime_to_time, clock, diag),
            Temporal::Datetime(dt) => Time::from_datetime(dt, opts.datetime_to_time, clock, diag),
        }
    }

    /// DATETIME view; TIME is placed on the session's current date
    pub fn to_datetime(&self, clock: &dyn SessionClock, diag: &mut ConversionDiagnostics) -> Option<Datetime> {
        match self {
            Temporal::None => None,
            Temporal::Date(d) => Some(Datetime::from_date(*d)),
            Temporal::Time(t) => Datetime::from_time(t, clock, diag),
            Temporal::Datetime(dt) => Some(*dt),
        }
    }

    /// DATE view; the time of day is dropped
    pub fn to_date(&self, clock: &dyn SessionClock, diag: &mut ConversionDiagnostics) -> Option<Date> {
        match self {
            Temporal::Date(d) => Some(*d),
            other => other.to_datetime(clock, diag).map(|dt| dt.date()),
        }
    }

    pub fn to_timestamp(
        &self,
        zone: &dyn SessionTimeZone,
        clock: &dyn SessionClock,
        diag: &mut ConversionDiagnostics,
    ) -> Option<Timestamp> {
        let dt = self.to_datetime(clock, diag)?;
        Timestamp::from_datetime(&dt, zone, diag)
    }
}

impl From<Date> for Temporal {
    fn from(value: Date) -> Self {
        Temporal::Date(value)
    }
}

impl From<Time> for Temporal {
    fn from(value: Time) -> Self {
        Temporal::Time(value)
    }
}

impl From<Datetime> for Temporal {
    fn from(value: Datetime) -> Self {
        Temporal::Datetime(value)
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::None => write!(f, "NULL"),
            Temporal::Date(d) => write!(f, "{d}"),
            Temporal::Time(t) => write!(f, "{t}"),
            Temporal::Datetime(dt) => write!(f, "{dt}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DateMode;
    use crate::session::FixedClock;
    use crate::text::DefaultTextParser;
    use pretty_assertions::assert_eq;

    fn parse(text: &str, opts: &TemporalOptions) -> (Temporal, ConversionDiagnostics) {
        let mut diag = ConversionDiagnostics::for_type("datetime");
        let value = Temporal::from_text(text, &DefaultTextParser, opts, &mut diag);
        (value, diag)
    }

    #[test]
    fn test_text_invalid_date_is_none() {
        let (value, diag) = parse("2023-02-30 10:00:00", &TemporalOptions::default());
        assert_eq!(value, Temporal::None);
        assert!(diag.has(TimeWarnings::INVALID_VALUE));
        assert_eq!(
            diag.to_diagnostics()[0].message,
            "Incorrect datetime value: '2023-02-30 10:00:00'"
        );
    }

    #[test]
    fn test_text_rounding_with_nanoseconds() {
        let opts = TemporalOptions::default().with_round_mode(RoundMode::Round);
        let (value, diag) = parse("2023-12-31 23:59:59.9999995", &opts);
        assert_eq!(value.to_string(), "2024-01-01 00:00:00");
        assert!(diag.is_empty());
    }

    #[test]
    fn test_text_time_saturates() {
        let (value, diag) = parse("900:00:00", &TemporalOptions::default());
        assert_eq!(value.to_string(), "838:59:59.999999");
        assert!(diag.has(TimeWarnings::OUT_OF_RANGE));
    }

    #[test]
    fn test_text_zero_date_depends_on_mode() {
        let (value, diag) = parse("0000-00-00", &TemporalOptions::default());
        assert_eq!(value, Temporal::None);
        assert!(diag.has(TimeWarnings::ZERO_DATE));

        let lenient = TemporalOptions::default().with_date_mode(DateMode::LENIENT);
        let (value, diag) = parse("0000-00-00", &lenient);
        assert_eq!(value, Temporal::Date(Date::zero()));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_to_time_uses_mode() {
        let clock = FixedClock::new(Date::from_ymd(2023, 1, 15).unwrap());
        let mut diag = ConversionDiagnostics::new();
        let lenient = TemporalOptions::default().with_date_mode(DateMode::LENIENT);
        let (value, _) = parse("0000-00-02 01:00:00", &lenient);
        let time = value.to_time(&lenient, &clock, &mut diag).unwrap();
        assert_eq!(time.to_string(), "49:00:00");
    }

    #[test]
    fn test_packed_through_hybrid() {
        let value = Temporal::Time(Time::new(true, 12, 0, 0, 1).unwrap());
        let packed = value.to_packed().unwrap();
        assert_eq!(Temporal::from_packed(TemporalKind::Time, packed), value);
        assert_eq!(Temporal::None.to_packed(), None);
    }

    #[test]
    fn test_numeric_forms() {
        let value = Temporal::Datetime(Datetime::from_ymd_hms(2023, 1, 15, 12, 30, 45).unwrap());
        assert_eq!(value.to_longlong(), Some(20230115123045));
        assert_eq!(value.to_double(), Some(20230115123045.0));
        assert_eq!(Temporal::None.to_decimal(), None);
    }
}
