//! Text literal parsing
//!
//! Parsing and validation are split: a [`TemporalTextParser`] only
//! recognizes the shape of a literal and hands back unchecked
//! [`RawFields`]; [`Temporal::from_raw`](crate::Temporal::from_raw) applies
//! the range checks, date mode and rounding.
//!
//! [`DefaultTextParser`] accepts:
//! - `YYYY-MM-DD` and `YY-MM-DD` (also with `/`)
//! - a date followed by ` ` or `T` and `HH:MM[:SS[.fraction]]`
//! - `[-][D ]HH:MM[:SS[.fraction]]`
//! - all-digit numbers `[-]digits[.digits]`, read with the numeric rules

use crate::limits::YY_PART_YEAR;
use crate::sec::Sec9;
use crate::temporal::TemporalKind;
use rust_decimal::Decimal;
use sqlscalar_diagnostics::TimeWarnings;
use std::str::FromStr;

/// Unchecked fields recognized in a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFields {
    pub kind: TemporalKind,
    pub neg: bool,
    pub year: u32,
    pub month: u32,
    pub day: u32,
    /// Days already folded in for TIME literals
    pub hour: u64,
    pub minute: u32,
    pub second: u32,
    pub usec: u32,
    /// Nanoseconds past the sixth fractional digit
    pub nsec: u32,
    /// Non-fatal findings such as trailing garbage
    pub warnings: TimeWarnings,
}

impl RawFields {
    pub fn new(kind: TemporalKind) -> Self {
        Self {
            kind,
            neg: false,
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            usec: 0,
            nsec: 0,
            warnings: TimeWarnings::NONE,
        }
    }
}

/// What a parser recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTemporal {
    /// Delimited date and/or time fields
    Fields(RawFields),
    /// A plain number, interpreted like a numeric literal
    Number(Sec9),
}

/// Recognizes temporal literals
pub trait TemporalTextParser {
    fn parse(&self, text: &str) -> Result<RawTemporal, TimeWarnings>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTextParser;

impl TemporalTextParser for DefaultTextParser {
    fn parse(&self, text: &str) -> Result<RawTemporal, TimeWarnings> {
        let body = text.trim();
        if body.is_empty() {
            return Err(TimeWarnings::INVALID_VALUE);
        }
        if is_number(body) {
            let number = Decimal::from_str(body.trim_end_matches('.'))
                .map_err(|_| TimeWarnings::OUT_OF_RANGE)?;
            return Ok(RawTemporal::Number(Sec9::from_decimal(number)));
        }

        let mut cursor = Cursor::new(body);
        let mut fields = if starts_with_date(body) {
            parse_date_time(&mut cursor)?
        } else {
            parse_time(&mut cursor)?
        };
        if !cursor.at_end() {
            fields.warnings |= TimeWarnings::TRUNCATED;
        }
        Ok(RawTemporal::Fields(fields))
    }
}

fn is_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut dots = 0;
    let mut any_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => any_digit = true,
            '.' => dots += 1,
            _ => return false,
        }
    }
    any_digit && dots <= 1
}

fn starts_with_date(s: &str) -> bool {
    let rest = s.trim_start_matches(|c: char| c.is_ascii_digit());
    rest.len() < s.len() && (rest.starts_with('-') || rest.starts_with('/'))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Read up to `max` digits; `None` when there is no digit
    fn number(&mut self, max: usize) -> Option<(u64, usize)> {
        let mut value = 0u64;
        let mut count = 0;
        while count < max {
            match self.peek() {
                Some(c @ b'0'..=b'9') => {
                    value = value * 10 + (c - b'0') as u64;
                    count += 1;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        (count > 0).then_some((value, count))
    }

    /// Read a fraction after the dot as (microseconds, nanoseconds)
    fn fraction(&mut self) -> (u32, u32) {
        let mut digits = [0u32; 9];
        let mut count = 0;
        while let Some(c @ b'0'..=b'9') = self.peek() {
            if count < digits.len() {
                digits[count] = (c - b'0') as u32;
                count += 1;
            }
            self.pos += 1;
        }
        let usec = digits[..6].iter().fold(0, |acc, d| acc * 10 + d);
        let nsec = digits[6..].iter().fold(0, |acc, d| acc * 10 + d);
        (usec, nsec)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

fn parse_date_time(cursor: &mut Cursor<'_>) -> Result<RawFields, TimeWarnings> {
    let (year, year_digits) = cursor.number(4).ok_or(TimeWarnings::INVALID_VALUE)?;
    let sep = cursor.peek().ok_or(TimeWarnings::INVALID_VALUE)?;
    cursor.eat(sep);
    let (month, _) = cursor.number(2).ok_or(TimeWarnings::INVALID_VALUE)?;
    if !cursor.eat(sep) {
        return Err(TimeWarnings::INVALID_VALUE);
    }
    let (day, _) = cursor.number(2).ok_or(TimeWarnings::INVALID_VALUE)?;

    let year = match year_digits {
        1 | 2 if year < YY_PART_YEAR as u64 => year + 2000,
        1 | 2 => year + 1900,
        _ => year,
    };

    let mut fields = RawFields::new(TemporalKind::Date);
    fields.year = year as u32;
    fields.month = month as u32;
    fields.day = day as u32;

    let has_time = matches!(cursor.peek(), Some(b' ' | b'T'))
        && matches!(cursor.peek_at(1), Some(b'0'..=b'9'));
    if has_time {
        cursor.pos += 1;
        fields.kind = TemporalKind::Datetime;
        let (hour, _) = cursor.number(2).ok_or(TimeWarnings::INVALID_VALUE)?;
        fields.hour = hour;
        parse_minutes_seconds(cursor, &mut fields)?;
    }
    Ok(fields)
}

fn parse_time(cursor: &mut Cursor<'_>) -> Result<RawFields, TimeWarnings> {
    let mut fields = RawFields::new(TemporalKind::Time);
    fields.neg = cursor.eat(b'-');
    let (first, _) = cursor.number(9).ok_or(TimeWarnings::INVALID_VALUE)?;

    if cursor.peek() == Some(b' ') && matches!(cursor.peek_at(1), Some(b'0'..=b'9')) {
        cursor.pos += 1;
        let (hour, _) = cursor.number(9).ok_or(TimeWarnings::INVALID_VALUE)?;
        fields.hour = first * 24 + hour;
    } else {
        fields.hour = first;
    }
    if cursor.peek() != Some(b':') {
        return Err(TimeWarnings::INVALID_VALUE);
    }
    parse_minutes_seconds(cursor, &mut fields)?;
    Ok(fields)
}

/// `:MM[:SS[.fraction]]`
fn parse_minutes_seconds(cursor: &mut Cursor<'_>, fields: &mut RawFields) -> Result<(), TimeWarnings> {
    if !cursor.eat(b':') {
        return Err(TimeWarnings::INVALID_VALUE);
    }
    let (minute, _) = cursor.number(2).ok_or(TimeWarnings::INVALID_VALUE)?;
    fields.minute = minute as u32;
    if cursor.eat(b':') {
        let (second, _) = cursor.number(2).ok_or(TimeWarnings::INVALID_VALUE)?;
        fields.second = second as u32;
        if cursor.eat(b'.') {
            let (usec, nsec) = cursor.fraction();
            fields.usec = usec;
            fields.nsec = nsec;
        }
    }
    Ok(())
}
