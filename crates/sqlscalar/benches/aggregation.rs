//! Aggregation and conversion benchmarks using divan

use sqlscalar::temporal::{DefaultTextParser, RoundMode, Sec9, Temporal, TemporalOptions};
use sqlscalar::types::{AggregationPurpose, BuiltinType, TypeRegistry};
use sqlscalar::ConversionDiagnostics;
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

// === Type Aggregation Benchmarks ===

mod aggregation {
    use super::*;

    #[divan::bench]
    fn identity(bencher: divan::Bencher) {
        let registry = TypeRegistry::builtin();
        let int = BuiltinType::Int.id();
        bencher.bench_local(|| registry.aggregate(AggregationPurpose::Result, divan::black_box(int), int));
    }

    #[divan::bench]
    fn table_entry(bencher: divan::Bencher) {
        let registry = TypeRegistry::builtin();
        let (left, right) = (BuiltinType::Varchar.id(), BuiltinType::MediumInt.id());
        bencher.bench_local(|| registry.aggregate(AggregationPurpose::Result, divan::black_box(left), right));
    }

    #[divan::bench]
    fn family_fallback(bencher: divan::Bencher) {
        let registry = TypeRegistry::builtin();
        let (left, right) = (BuiltinType::SmallInt.id(), BuiltinType::IntUnsigned.id());
        bencher.bench_local(|| registry.aggregate(AggregationPurpose::Result, divan::black_box(left), right));
    }

    #[divan::bench(args = [2, 8, 32])]
    fn fold(bencher: divan::Bencher, len: usize) {
        let registry = TypeRegistry::builtin();
        let operands: Vec<_> = BuiltinType::INTEGERS.iter().cycle().take(len).map(|ty| ty.id()).collect();
        bencher.bench_local(|| registry.fold(AggregationPurpose::Result, divan::black_box(operands.iter().copied())));
    }

    #[divan::bench]
    fn lookup_by_name(bencher: divan::Bencher) {
        let registry = TypeRegistry::builtin();
        bencher.bench_local(|| registry.lookup(divan::black_box("BIGINT  UNSIGNED")));
    }
}

// === Literal Conversion Benchmarks ===

mod conversion {
    use super::*;

    #[divan::bench]
    fn number_to_datetime(bencher: divan::Bencher) {
        let opts = TemporalOptions::default();
        let sec = Sec9::from_decimal(Decimal::new(202301151230455, 1));
        bencher.bench_local(|| {
            let mut diag = ConversionDiagnostics::new();
            divan::black_box(&sec).to_datetime_or_time(&opts, &mut diag)
        });
    }

    #[divan::bench(args = ["2023-01-15 12:30:45.123456", "838:59:59", "20230115"])]
    fn text(bencher: divan::Bencher, literal: &str) {
        let opts = TemporalOptions::default();
        bencher.bench_local(|| {
            let mut diag = ConversionDiagnostics::new();
            Temporal::from_text(divan::black_box(literal), &DefaultTextParser, &opts, &mut diag)
        });
    }

    #[divan::bench]
    fn round_datetime(bencher: divan::Bencher) {
        let opts = TemporalOptions::default();
        let mut diag = ConversionDiagnostics::new();
        let value = Temporal::from_text("9999-12-31 23:59:59.999999", &DefaultTextParser, &opts, &mut diag);
        bencher.bench_local(|| {
            let mut diag = ConversionDiagnostics::new();
            divan::black_box(value).round(0, RoundMode::Round, &mut diag)
        });
    }
}
