use crate::limits::{frac_unit, MAX_DECIMALS};
use crate::options::RoundMode;

/// Apply a round mode to a non-negative microsecond count at `dec` digits
///
/// `nanos` is the sub-microsecond remainder (0..=999) still owed to the value.
pub(crate) fn round_usec(total: u64, nanos: u32, dec: u8, mode: RoundMode) -> u64 {
    let unit = frac_unit(dec);
    let rem = total % unit;
    let base = total - rem;
    match mode {
        RoundMode::None => total,
        RoundMode::Truncate => base,
        RoundMode::Round => {
            if (rem * 1000 + nanos as u64) * 2 >= unit * 1000 {
                base + unit
            } else {
                base
            }
        }
    }
}

/// Whether nothing remains beyond `dec` digits
pub(crate) fn is_exact(usec: u64, nanos: u32, dec: u8) -> bool {
    nanos == 0 && usec % frac_unit(dec) == 0
}

/// Digits of `usec` printed with `dec` places, empty for `dec == 0`
pub(crate) fn format_fraction(usec: u32, dec: u8) -> String {
    let dec = dec.min(MAX_DECIMALS);
    if dec == 0 {
        return String::new();
    }
    let digits = usec as u64 / frac_unit(dec);
    format!(".{:0width$}", digits, width = dec as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1_499_999, 0, 0, RoundMode::Round, 1_000_000)]
    #[case(1_500_000, 0, 0, RoundMode::Round, 2_000_000)]
    #[case(1_999_999, 0, 0, RoundMode::Truncate, 1_000_000)]
    #[case(1_234_567, 0, 3, RoundMode::Round, 1_235_000)]
    #[case(1_234_499, 999, 3, RoundMode::Round, 1_234_000)]
    #[case(7, 500, 6, RoundMode::Round, 8)]
    #[case(7, 499, 6, RoundMode::Round, 7)]
    #[case(7, 999, 6, RoundMode::Truncate, 7)]
    #[case(1_234_567, 0, 2, RoundMode::None, 1_234_567)]
    fn test_round_usec(
        #[case] total: u64,
        #[case] nanos: u32,
        #[case] dec: u8,
        #[case] mode: RoundMode,
        #[case] expected: u64,
    ) {
        assert_eq!(round_usec(total, nanos, dec, mode), expected);
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction(123_456, 0), "");
        assert_eq!(format_fraction(123_456, 3), ".123");
        assert_eq!(format_fraction(5, 6), ".000005");
    }
}
