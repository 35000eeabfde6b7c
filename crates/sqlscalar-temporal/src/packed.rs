//! Packed integer form shared with storage
//!
//! `((((((year*13+month)*32+day)*24+hour)*60+minute)*60+second)*1_000_000+usec)`,
//! negated for negative values.

use crate::limits::USEC_PER_SEC;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PackedFields {
    pub neg: bool,
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub usec: u32,
}

pub(crate) fn pack(f: &PackedFields) -> i64 {
    let ymd = (f.year as i64 * 13 + f.month as i64) * 32 + f.day as i64;
    let hms = ((ymd * 24 + f.hour as i64) * 60 + f.minute as i64) * 60 + f.second as i64;
    let packed = hms * USEC_PER_SEC as i64 + f.usec as i64;
    if f.neg { -packed } else { packed }
}

pub(crate) fn unpack(packed: i64) -> PackedFields {
    let neg = packed < 0;
    let mut rest = packed.unsigned_abs();

    let usec = (rest % USEC_PER_SEC) as u32;
    rest /= USEC_PER_SEC;
    let second = (rest % 60) as u32;
    rest /= 60;
    let minute = (rest % 60) as u32;
    rest /= 60;
    let hour = (rest % 24) as u32;
    rest /= 24;
    let day = (rest % 32) as u32;
    rest /= 32;
    let month = (rest % 13) as u32;
    let year = (rest / 13).min(u32::MAX as u64) as u32;

    PackedFields {
        neg,
        year,
        month,
        day,
        hour,
        minute,
        second,
        usec,
    }
}

/// Unpack a TIME, folding the month and day positions back into hours
pub(crate) fn unpack_time(packed: i64) -> PackedFields {
    let mut f = unpack(packed);
    f.hour += (f.month * 32 + f.day) * 24;
    f.month = 0;
    f.day = 0;
    f
}
