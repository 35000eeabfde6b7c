//! DATE values

use crate::calendar::{calc_daynr, date_from_daynr, days_in_month};
use crate::limits::MAX_YEAR;
use crate::options::DateMode;
use crate::packed::{pack, unpack, PackedFields};
use rust_decimal::Decimal;
use sqlscalar_diagnostics::{ConversionDiagnostics, TimeWarnings};
use std::fmt;

/// A calendar date between `0000-01-01` and `9999-12-31`
///
/// The zero date `0000-00-00` and dates with a zero month or day exist for
/// compatibility; [`DateMode`] decides whether conversions may produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    year: u16,
    month: u8,
    day: u8,
}

/// Validate date fields under a date mode
pub(crate) fn check_date(year: u32, month: u32, day: u32, mode: DateMode) -> Result<(), TimeWarnings> {
    if year > MAX_YEAR || month > 12 || day > 31 {
        return Err(TimeWarnings::INVALID_VALUE);
    }
    if year == 0 && month == 0 && day == 0 {
        return if mode.no_zero_date {
            Err(TimeWarnings::ZERO_DATE)
        } else {
            Ok(())
        };
    }
    if month == 0 || day == 0 {
        return if mode.no_zero_in_date {
            Err(TimeWarnings::ZERO_IN_DATE)
        } else {
            Ok(())
        };
    }
    if day > days_in_month(year, month) {
        return Err(TimeWarnings::INVALID_VALUE);
    }
    Ok(())
}

impl Date {
    /// `0000-00-00`
    pub const fn zero() -> Self {
        Self {
            year: 0,
            month: 0,
            day: 0,
        }
    }

    /// A real calendar date; zero parts are rejected
    pub fn from_ymd(year: u32, month: u32, day: u32) -> Option<Self> {
        Self::checked(year, month, day, DateMode::STRICT).ok()
    }

    /// A date under an explicit date mode, reporting why it was rejected
    pub fn from_ymd_mode(
        year: u32,
        month: u32,
        day: u32,
        mode: DateMode,
        diag: &mut ConversionDiagnostics,
    ) -> Option<Self> {
        match Self::checked(year, month, day, mode) {
            Ok(date) => Some(date),
            Err(warn) => {
                diag.add(warn);
                None
            }
        }
    }

    pub(crate) fn checked(year: u32, month: u32, day: u32, mode: DateMode) -> Result<Self, TimeWarnings> {
        check_date(year, month, day, mode)?;
        Ok(Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
        })
    }

    pub(crate) fn from_daynr(daynr: i64) -> Option<Self> {
        let (year, month, day) = date_from_daynr(daynr)?;
        Some(Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
        })
    }

    pub(crate) fn from_naive(date: chrono::NaiveDate) -> Option<Self> {
        use chrono::Datelike;

        let year = u32::try_from(date.year()).ok()?;
        Self::from_ymd(year, date.month(), date.day())
    }

    pub(crate) fn to_naive(self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
    }

    pub fn year(&self) -> u32 {
        self.year as u32
    }

    pub fn month(&self) -> u32 {
        self.month as u32
    }

    pub fn day(&self) -> u32 {
        self.day as u32
    }

    pub fn is_zero(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }

    /// Zero month or day (the zero date included)
    pub fn has_zero_in_date(&self) -> bool {
        self.month == 0 || self.day == 0
    }

    /// Days since `0000-00-00`, `None` for dates with zero parts
    pub fn daynr(&self) -> Option<i64> {
        if self.has_zero_in_date() {
            return None;
        }
        Some(calc_daynr(self.year(), self.month(), self.day()))
    }

    /// The following day, `None` after 9999-12-31 or for zero-in-date values
    pub fn next_day(&self) -> Option<Self> {
        if self.has_zero_in_date() {
            return None;
        }
        let (year, month, day) = crate::calendar::next_day(self.year(), self.month(), self.day())?;
        Some(Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
        })
    }

    pub(crate) fn packed_fields(&self) -> PackedFields {
        PackedFields {
            year: self.year(),
            month: self.month(),
            day: self.day(),
            ..PackedFields::default()
        }
    }

    pub fn to_packed(&self) -> i64 {
        pack(&self.packed_fields())
    }

    /// Unpack a stored DATE; a time part is ignored
    pub fn from_packed(packed: i64) -> Option<Self> {
        let f = unpack(packed);
        if f.neg {
            return None;
        }
        Self::checked(f.year, f.month, f.day, DateMode::LENIENT).ok()
    }

    /// `YYYYMMDD`
    pub fn to_longlong(&self) -> i64 {
        self.year as i64 * 10_000 + self.month as i64 * 100 + self.day as i64
    }

    pub fn to_double(&self) -> f64 {
        self.to_longlong() as f64
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.to_longlong())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
