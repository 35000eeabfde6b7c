//! Session collaborators: the time zone and the clock

use crate::date::Date;
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc};

/// Outcome of mapping a local wall-clock time to a Unix second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalToUnix {
    /// The local time exists (the earliest instant when it is ambiguous)
    Exact(i64),
    /// The local time fell into a gap; the instant where the gap ends
    Gap(i64),
    /// Not representable in this time zone
    OutOfRange,
}

/// Converts between Unix seconds and local wall-clock time
pub trait SessionTimeZone: Send + Sync {
    fn name(&self) -> String;

    fn unix_to_local(&self, unix: i64) -> Option<NaiveDateTime>;

    fn local_to_unix(&self, local: NaiveDateTime) -> LocalToUnix;
}

/// Any chrono time zone as a session time zone
#[derive(Debug, Clone)]
pub struct ChronoZone<Tz: TimeZone> {
    zone: Tz,
}

impl<Tz: TimeZone> ChronoZone<Tz> {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl ChronoZone<Utc> {
    pub fn utc() -> Self {
        Self::new(Utc)
    }
}

/// Hours scanned for the end of a DST gap
const MAX_GAP_HOURS: i64 = 48;

impl<Tz> SessionTimeZone for ChronoZone<Tz>
where
    Tz: TimeZone + Send + Sync + std::fmt::Debug,
    Tz::Offset: Send + Sync,
{
    fn name(&self) -> String {
        format!("{:?}", self.zone)
    }

    fn unix_to_local(&self, unix: i64) -> Option<NaiveDateTime> {
        let utc = DateTime::from_timestamp(unix, 0)?;
        Some(utc.with_timezone(&self.zone).naive_local())
    }

    fn local_to_unix(&self, local: NaiveDateTime) -> LocalToUnix {
        match self.zone.from_local_datetime(&local) {
            LocalResult::Single(at) => LocalToUnix::Exact(at.timestamp()),
            LocalResult::Ambiguous(earliest, _) => LocalToUnix::Exact(earliest.timestamp()),
            LocalResult::None => {
                let Some(mut candidate) = local.with_minute(0).and_then(|t| t.with_second(0)) else {
                    return LocalToUnix::OutOfRange;
                };
                for _ in 0..MAX_GAP_HOURS {
                    candidate += Duration::hours(1);
                    if let Some(at) = self.zone.from_local_datetime(&candidate).earliest() {
                        return LocalToUnix::Gap(at.timestamp());
                    }
                }
                LocalToUnix::OutOfRange
            }
        }
    }
}

/// Supplies the session's current date
pub trait SessionClock {
    fn current_date(&self) -> Date;
}

/// A clock stopped at one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: Date,
}

impl FixedClock {
    pub fn new(today: Date) -> Self {
        Self { today }
    }
}

impl SessionClock for FixedClock {
    fn current_date(&self) -> Date {
        self.today
    }
}

/// The wall clock in the local time zone of the process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SessionClock for SystemClock {
    fn current_date(&self) -> Date {
        let today = chrono::Local::now().date_naive();
        // The system date is always within 0001-9999; fall back to the epoch otherwise
        Date::from_naive(today).unwrap_or_else(|| Date::from_ymd(1970, 1, 1).unwrap_or(Date::zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_utc_round_trip() {
        let zone = ChronoZone::utc();
        let at = local(2023, 1, 15, 12, 30, 45);
        let LocalToUnix::Exact(unix) = zone.local_to_unix(at) else {
            panic!("expected an exact instant");
        };
        assert_eq!(unix, 1_673_785_845);
        assert_eq!(zone.unix_to_local(unix), Some(at));
    }

    #[test]
    fn test_fixed_offset() {
        let zone = ChronoZone::new(FixedOffset::east_opt(3 * 3600).unwrap());
        assert_eq!(zone.unix_to_local(0), Some(local(1970, 1, 1, 3, 0, 0)));
        assert_eq!(
            zone.local_to_unix(local(1970, 1, 1, 3, 0, 0)),
            LocalToUnix::Exact(0)
        );
    }

    #[test]
    fn test_fixed_clock() {
        let today = Date::from_ymd(2023, 1, 15).unwrap();
        assert_eq!(FixedClock::new(today).current_date(), today);
    }
}
