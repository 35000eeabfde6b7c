//! Property tests for packing and rounding

use proptest::prelude::*;
use sqlscalar_temporal::*;

fn date() -> impl Strategy<Value = Date> {
    (1u32..=9999, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| Date::from_ymd(y, m, d).unwrap())
}

fn time() -> impl Strategy<Value = Time> {
    (any::<bool>(), 0u32..=838, 0u32..60, 0u32..60, 0u32..1_000_000)
        .prop_map(|(neg, h, m, s, us)| Time::new(neg, h, m, s, us).unwrap())
}

fn datetime() -> impl Strategy<Value = Datetime> {
    (date(), 0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000)
        .prop_map(|(d, h, m, s, us)| Datetime::new(d, h, m, s, us).unwrap())
}

fn temporal() -> impl Strategy<Value = Temporal> {
    prop_oneof![
        date().prop_map(Temporal::Date),
        time().prop_map(Temporal::Time),
        datetime().prop_map(Temporal::Datetime),
    ]
}

fn rounding() -> impl Strategy<Value = RoundMode> {
    prop_oneof![Just(RoundMode::None), Just(RoundMode::Truncate), Just(RoundMode::Round)]
}

/// `None` rounding is only defined for values already exact at `dec`
fn exact_for(value: Temporal, dec: u8, mode: RoundMode) -> Temporal {
    match mode {
        RoundMode::None => value.round(dec, RoundMode::Truncate, &mut ConversionDiagnostics::new()),
        _ => value,
    }
}

proptest! {
    #[test]
    fn test_packed_form_restores_value(value in temporal()) {
        let kind = value.kind().unwrap();
        let packed = value.to_packed().unwrap();
        prop_assert_eq!(Temporal::from_packed(kind, packed), value);
    }

    #[test]
    fn test_packed_order_matches_value_order(a in datetime(), b in datetime()) {
        prop_assert_eq!(a.cmp(&b), a.to_packed().cmp(&b.to_packed()));
    }

    #[test]
    fn test_packed_time_order_matches_value_order(a in time(), b in time()) {
        prop_assert_eq!(a.cmp(&b), a.to_packed().cmp(&b.to_packed()));
    }

    #[test]
    fn test_rounding_is_idempotent(value in temporal(), dec in 0u8..=6, mode in rounding()) {
        let value = exact_for(value, dec, mode);
        let mut diag = ConversionDiagnostics::new();
        let once = value.round(dec, mode, &mut diag);
        let mut again = ConversionDiagnostics::new();
        prop_assert_eq!(once.round(dec, mode, &mut again), once);
        prop_assert!(again.is_empty());
    }

    #[test]
    fn test_rounded_value_fits_precision(value in time(), dec in 0u8..=6, mode in rounding()) {
        let value = match exact_for(Temporal::Time(value), dec, mode) {
            Temporal::Time(t) => t,
            other => panic!("expected a TIME, got {other:?}"),
        };
        let mut diag = ConversionDiagnostics::new();
        let rounded = value.round(dec, mode, &mut diag);
        let unit = 10u32.pow(6 - dec as u32);
        prop_assert_eq!(rounded.usec() % unit, 0);
    }

    #[test]
    fn test_time_rounding_respects_max_hour(value in time(), dec in 0u8..=6, max_hour in 0u32..=838) {
        let mut diag = ConversionDiagnostics::new();
        let capped = Time::new(value.is_negative(), value.hour().min(max_hour), value.minute(), value.second(), value.usec())
            .unwrap();
        let rounded = capped.round_within(dec, RoundMode::Round, max_hour, &mut diag);
        prop_assert!(rounded.hour() <= max_hour);
        prop_assert!(rounded.hour() >= capped.hour());
    }

    #[test]
    fn test_truncation_keeps_order(a in time(), b in time(), dec in 0u8..=6) {
        let mut diag = ConversionDiagnostics::new();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = lo.round(dec, RoundMode::Truncate, &mut diag);
        let hi = hi.round(dec, RoundMode::Truncate, &mut diag);
        prop_assert!(lo <= hi);
        prop_assert!(diag.is_empty());
    }

    #[test]
    fn test_time_numeric_forms_agree(value in time()) {
        let magnitude = value.hour() as i64 * 10_000 + value.minute() as i64 * 100 + value.second() as i64;
        prop_assert_eq!(value.to_longlong(), if value.is_negative() { -magnitude } else { magnitude });
    }
}
