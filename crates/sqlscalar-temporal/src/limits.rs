//! Range limits of the temporal types

/// Largest TIME hour
pub const TIME_MAX_HOUR: u32 = 838;
pub const TIME_MAX_MINUTE: u32 = 59;
pub const TIME_MAX_SECOND: u32 = 59;
pub const TIME_MAX_SECOND_PART: u32 = 999_999;

/// `838:59:59` as a `HHHMMSS` number
pub const TIME_MAX_VALUE: u64 = 8_385_959;
/// `838:59:59` in seconds
pub const TIME_MAX_VALUE_SECONDS: u64 = 3_020_399;

/// Maximum fractional digits
pub const MAX_DECIMALS: u8 = 6;

/// Largest microsecond part representable with `dec` fractional digits
pub const MAX_SEC_PART: [u32; 7] = [0, 900_000, 990_000, 999_000, 999_900, 999_990, 999_999];

/// Two-digit years below this map to 20YY, the rest to 19YY
pub const YY_PART_YEAR: u32 = 70;

pub const MAX_YEAR: u32 = 9999;

/// Day number of 9999-12-31
pub const MAX_DAY_NUMBER: i64 = 3_652_424;
/// Day number of 1970-01-01
pub const DAYS_AT_TIMESTART: i64 = 719_528;

/// Largest TIMESTAMP second (2038-01-19 03:14:07 UTC)
pub const TIMESTAMP_MAX_SECONDS: u32 = i32::MAX as u32;

pub const SECONDS_IN_24H: u64 = 86_400;
pub const USEC_PER_SEC: u64 = 1_000_000;
pub const USEC_PER_DAY: u64 = SECONDS_IN_24H * USEC_PER_SEC;

/// Numbers above this (and up to [`DATETIME_MAX_NUMBER`]) read as dates
pub const TIME_MAX_NUMBER: u64 = 9_999_999;
/// `9999-12-31 23:59:59` as a `YYYYMMDDHHMMSS` number
pub const DATETIME_MAX_NUMBER: u64 = 99_991_231_235_959;

/// Clamp a requested fractional precision to [`MAX_DECIMALS`]
pub const fn clamp_decimals(dec: u8) -> u8 {
    if dec > MAX_DECIMALS { MAX_DECIMALS } else { dec }
}

/// Microseconds in one unit of the last kept digit
pub const fn frac_unit(dec: u8) -> u64 {
    10u64.pow((MAX_DECIMALS - clamp_decimals(dec)) as u32)
}

pub const fn max_sec_part(dec: u8) -> u32 {
    MAX_SEC_PART[clamp_decimals(dec) as usize]
}
