//! Calendar arithmetic
//!
//! Day numbers count days since the fictional date `0000-00-00`, the same
//! numbering used by `TO_DAYS()`. Year 0 is not a leap year.

use crate::limits::MAX_DAY_NUMBER;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub fn is_leap_year(year: u32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || (year % 400 == 0 && year != 0))
}

pub fn days_in_year(year: u32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Number of days in a month, 0 for an out-of-range month
pub fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

/// Day number of a date
///
/// `0000-00-xx` yields 0. A zero day or month is accepted and counts as the
/// day before the first.
pub fn calc_daynr(year: u32, month: u32, day: u32) -> i64 {
    if year == 0 && month == 0 {
        return 0;
    }
    let mut y = year as i64;
    let month = month as i64;
    let mut delsum = 365 * y + 31 * (month - 1) + day as i64;
    if month <= 2 {
        y -= 1;
    } else {
        delsum -= (month * 4 + 23) / 10;
    }
    let temp = ((y / 100 + 1) * 3) / 4;
    delsum + y / 4 - temp
}

/// Date of a day number, `None` outside year 1 to 9999
pub fn date_from_daynr(daynr: i64) -> Option<(u32, u32, u32)> {
    if !(366..=MAX_DAY_NUMBER).contains(&daynr) {
        return None;
    }

    let mut year = (daynr * 100 / 36525) as u32;
    let y = year as i64;
    let temp = ((y - 1) / 100 + 1) * 3 / 4;
    let mut day_of_year = (daynr - y * 365 - (y - 1) / 4 + temp) as u32;
    loop {
        let len = days_in_year(year);
        if day_of_year <= len {
            break;
        }
        day_of_year -= len;
        year += 1;
    }

    let mut leap_day = 0;
    if days_in_year(year) == 366 && day_of_year > 31 + 28 {
        day_of_year -= 1;
        if day_of_year == 31 + 28 {
            leap_day = 1;
        }
    }

    let mut month = 1;
    for len in DAYS_IN_MONTH {
        if day_of_year <= len {
            break;
        }
        day_of_year -= len;
        month += 1;
    }
    Some((year, month, day_of_year + leap_day))
}

/// The following calendar day, `None` after 9999-12-31
pub fn next_day(year: u32, month: u32, day: u32) -> Option<(u32, u32, u32)> {
    if day < days_in_month(year, month) {
        Some((year, month, day + 1))
    } else if month < 12 {
        Some((year, month + 1, 1))
    } else if year < crate::limits::MAX_YEAR {
        Some((year + 1, 1, 1))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::DAYS_AT_TIMESTART;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(2024, 2, 29)]
    #[case(2023, 2, 28)]
    #[case(2000, 2, 29)]
    #[case(1900, 2, 28)]
    #[case(0, 2, 28)]
    #[case(2023, 4, 30)]
    #[case(2023, 13, 0)]
    fn test_days_in_month(#[case] year: u32, #[case] month: u32, #[case] expected: u32) {
        assert_eq!(days_in_month(year, month), expected);
    }

    #[test]
    fn test_known_day_numbers() {
        assert_eq!(calc_daynr(1970, 1, 1), DAYS_AT_TIMESTART);
        assert_eq!(calc_daynr(9999, 12, 31), MAX_DAY_NUMBER);
        assert_eq!(calc_daynr(0, 0, 0), 0);
        assert_eq!(calc_daynr(2023, 1, 15) - calc_daynr(2023, 1, 14), 1);
    }

    #[test]
    fn test_date_from_daynr_bounds() {
        assert_eq!(date_from_daynr(365), None);
        assert_eq!(date_from_daynr(MAX_DAY_NUMBER + 1), None);
        assert_eq!(date_from_daynr(MAX_DAY_NUMBER), Some((9999, 12, 31)));
        assert_eq!(date_from_daynr(DAYS_AT_TIMESTART), Some((1970, 1, 1)));
    }

    #[test]
    fn test_next_day() {
        assert_eq!(next_day(2023, 2, 28), Some((2023, 3, 1)));
        assert_eq!(next_day(2024, 2, 28), Some((2024, 2, 29)));
        assert_eq!(next_day(2023, 12, 31), Some((2024, 1, 1)));
        assert_eq!(next_day(9999, 12, 31), None);
    }

    proptest! {
        #[test]
        fn test_daynr_round_trip(year in 1u32..=9999, month in 1u32..=12, day in 1u32..=31) {
            prop_assume!(day <= days_in_month(year, month));
            let nr = calc_daynr(year, month, day);
            prop_assert_eq!(date_from_daynr(nr), Some((year, month, day)));
        }
    }
}
