//! Type aggregation tests across the public registry API
//!
//! Covers:
//! - Lookup step order (identity, table, left family, right family)
//! - Cross-family pairings from the explicit tables
//! - Arithmetic on temporal operands
//! - Folding operand lists
//! - Registering external types

use pretty_assertions::assert_eq;
use rstest::rstest;
use sqlscalar_diagnostics::{SQL0100, SQL0103, SQL0204};
use sqlscalar_types::{
    AggregationPurpose, AggregationSource, BuiltinType, ExternalBehavior, HybridTypeSlot, TypeFamily, TypeRegistry,
    inet6, timestamp_tz,
};

fn aggregate(purpose: AggregationPurpose, left: &str, right: &str) -> Option<String> {
    let registry = TypeRegistry::builtin();
    registry
        .aggregate_names(purpose, left, right)
        .ok()
        .map(|ty| ty.name().to_string())
}

fn source(purpose: AggregationPurpose, left: BuiltinType, right: BuiltinType) -> AggregationSource {
    let registry = TypeRegistry::builtin();
    registry
        .aggregate_with_source(purpose, left.id(), right.id())
        .map(|(_, source)| source)
        .unwrap()
}

// === Lookup Order ===

#[test]
fn test_identity_for_every_type_and_purpose() {
    let registry = TypeRegistry::builtin();
    for purpose in AggregationPurpose::ALL {
        for ty in registry.types() {
            let (id, source) = registry.aggregate_with_source(purpose, ty.id(), ty.id()).unwrap();
            assert_eq!(id, ty.id());
            assert_eq!(source, AggregationSource::Identity);
        }
    }
}

#[rstest]
#[case(AggregationPurpose::MinMax, BuiltinType::TinyInt, BuiltinType::Double, AggregationSource::Table)]
#[case(AggregationPurpose::NumOp, BuiltinType::TinyInt, BuiltinType::Decimal, AggregationSource::Table)]
#[case(AggregationPurpose::Result, BuiltinType::Int, BuiltinType::Varchar, AggregationSource::Table)]
#[case(AggregationPurpose::Result, BuiltinType::Varchar, BuiltinType::Int, AggregationSource::Table)]
#[case(AggregationPurpose::Multiply, BuiltinType::Int, BuiltinType::SmallInt, AggregationSource::LeftFamily)]
#[case(AggregationPurpose::Add, BuiltinType::Null, BuiltinType::Date, AggregationSource::LeftFamily)]
#[case(AggregationPurpose::Add, BuiltinType::Date, BuiltinType::Null, AggregationSource::RightFamily)]
#[case(AggregationPurpose::Subtract, BuiltinType::Date, BuiltinType::Datetime, AggregationSource::LeftFamily)]
fn test_answering_step(
    #[case] purpose: AggregationPurpose,
    #[case] left: BuiltinType,
    #[case] right: BuiltinType,
    #[case] expected: AggregationSource,
) {
    assert_eq!(source(purpose, left, right), expected);
}

// === Cross-family Pairings ===

#[rstest]
#[case(AggregationPurpose::Result, "tinyint", "int unsigned", Some("bigint"))]
#[case(AggregationPurpose::Result, "blob", "int", Some("blob"))]
#[case(AggregationPurpose::Result, "date", "decimal", Some("varchar"))]
#[case(AggregationPurpose::Result, "char", "time", Some("varchar"))]
#[case(AggregationPurpose::Result, "date", "timestamp", Some("datetime"))]
#[case(AggregationPurpose::Result, "null", "row", None)]
#[case(AggregationPurpose::Comparison, "varchar", "date", Some("date"))]
#[case(AggregationPurpose::Comparison, "int", "char", Some("double"))]
#[case(AggregationPurpose::MinMax, "time", "int", Some("datetime"))]
#[case(AggregationPurpose::MinMax, "date", "varchar", Some("date"))]
#[case(AggregationPurpose::MinMax, "float", "float", Some("float"))]
fn test_cross_family(
    #[case] purpose: AggregationPurpose,
    #[case] left: &str,
    #[case] right: &str,
    #[case] expected: Option<&str>,
) {
    assert_eq!(aggregate(purpose, left, right).as_deref(), expected);
}

// === Temporal Arithmetic ===

#[rstest]
#[case(AggregationPurpose::Add, "date", "int", "bigint")]
#[case(AggregationPurpose::Subtract, "int", "date", "bigint")]
#[case(AggregationPurpose::Add, "time", "int", "decimal")]
#[case(AggregationPurpose::Add, "date", "double", "double")]
#[case(AggregationPurpose::Subtract, "date", "datetime", "decimal")]
#[case(AggregationPurpose::Multiply, "varchar", "datetime", "double")]
#[case(AggregationPurpose::Add, "null", "date", "bigint")]
#[case(AggregationPurpose::Divide, "int", "smallint", "decimal")]
#[case(AggregationPurpose::Divide, "int", "int", "int")]
fn test_arithmetic(#[case] purpose: AggregationPurpose, #[case] left: &str, #[case] right: &str, #[case] expected: &str) {
    assert_eq!(aggregate(purpose, left, right).as_deref(), Some(expected));
}

#[test]
fn test_incompatible_message() {
    let registry = TypeRegistry::builtin();
    let err = registry
        .aggregate_names(AggregationPurpose::Comparison, "int", "row")
        .unwrap_err();
    assert_eq!(err.code(), SQL0100);
    assert_eq!(err.to_string(), "Illegal parameter data types int and row for operation '='");
}

// === Folding ===

#[test]
fn test_fold_mixed_operands() {
    let registry = TypeRegistry::builtin();
    let ty = registry
        .fold(
            AggregationPurpose::Result,
            [BuiltinType::TinyInt.id(), BuiltinType::Null.id(), BuiltinType::Varchar.id()],
        )
        .unwrap();
    assert_eq!(ty.name(), "varchar");
}

#[test]
fn test_fold_stops_at_first_failure() {
    let registry = TypeRegistry::builtin();
    let err = registry
        .fold(
            AggregationPurpose::Add,
            [BuiltinType::Int.id(), BuiltinType::Row.id(), BuiltinType::Double.id()],
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Illegal parameter data types int and row for operation '+'");
}

#[test]
fn test_fold_nothing() {
    let registry = TypeRegistry::builtin();
    let err = registry.fold(AggregationPurpose::Result, []).unwrap_err();
    assert_eq!(err.code(), SQL0103);
}

// === External Types ===

#[test]
fn test_inet6_extension() {
    let registry = inet6::registry().unwrap();
    assert_eq!(registry.len(), BuiltinType::ALL.len() + 1);
    assert_eq!(
        registry
            .aggregate_names(AggregationPurpose::Result, "inet6", "char")
            .unwrap()
            .name(),
        "inet6"
    );
    assert!(registry.aggregate_names(AggregationPurpose::Add, "inet6", "int").is_err());
    // built-in answers are unchanged
    assert_eq!(
        registry
            .aggregate_names(AggregationPurpose::Result, "int", "varchar")
            .unwrap()
            .name(),
        "varchar"
    );
}

#[test]
fn test_bundled_extensions_together() {
    let registry = TypeRegistry::with_extensions().unwrap();
    assert_eq!(registry.len(), BuiltinType::ALL.len() + 2);
    let zoned = registry.id_of(timestamp_tz::TIMESTAMP_TZ).unwrap();
    let inet6 = registry.id_of(inet6::INET6).unwrap();

    let folded = HybridTypeSlot::fold(
        &registry,
        AggregationPurpose::MinMax,
        [BuiltinType::Null.id(), zoned, BuiltinType::Null.id(), zoned],
    )
    .unwrap();
    assert_eq!(folded.id(), zoned);

    let err = registry
        .aggregate(AggregationPurpose::Result, zoned, inet6)
        .unwrap_err();
    assert_eq!(err.code(), SQL0100);
    assert_eq!(
        err.to_string(),
        "Illegal parameter data types timestamp with time zone and inet6 for operation 'case'"
    );
}

#[rstest]
#[case(AggregationPurpose::Result, "timestamp")]
#[case(AggregationPurpose::Comparison, "datetime")]
#[case(AggregationPurpose::MinMax, "date")]
#[case(AggregationPurpose::Add, "int")]
fn test_zoned_timestamp_rejects_other_types(#[case] purpose: AggregationPurpose, #[case] other: &str) {
    let registry = timestamp_tz::registry().unwrap();
    assert!(registry.aggregate_names(purpose, "timestamptz", other).is_err());
    assert!(registry.aggregate_names(purpose, other, "timestamptz").is_err());
}

#[test]
fn test_zoned_timestamp_fold_stops_at_first_failure() {
    let registry = timestamp_tz::registry().unwrap();
    let zoned = registry.id_of("timestamptz").unwrap();
    let mut slot = HybridTypeSlot::new(&registry, AggregationPurpose::Comparison);
    slot.push(zoned).unwrap();
    assert!(slot.push(BuiltinType::Timestamp.id()).is_err());
    assert!(slot.push(BuiltinType::Null.id()).is_err());
    assert_eq!(slot.finish().unwrap_err().code(), SQL0100);
}

#[test]
fn test_explicit_rule_for_external_type() {
    let mut builder = TypeRegistry::builder();
    inet6::register(&mut builder).unwrap();
    assert!(
        builder
            .add_rule_by_name(AggregationPurpose::Comparison, "inet6", "varchar", "varchar")
            .unwrap()
    );
    let registry = builder.build();
    let (id, source) = registry
        .aggregate_with_source(
            AggregationPurpose::Comparison,
            BuiltinType::Varchar.id(),
            registry.id_of("inet6").unwrap(),
        )
        .unwrap();
    assert_eq!(id, BuiltinType::Varchar.id());
    assert_eq!(source, AggregationSource::Table);
}

#[test]
fn test_duplicate_family() {
    let mut builder = TypeRegistry::builder();
    let err = builder.add_family(TypeFamily::new("Numeric")).unwrap_err();
    assert_eq!(err.code(), SQL0204);
    assert_eq!(err.to_string(), "Type family 'numeric' is already registered");
}

#[test]
fn test_external_type_without_rules() {
    let mut builder = TypeRegistry::builder();
    builder.add_family(TypeFamily::new("geometry")).unwrap();
    builder
        .add_external(
            "point",
            "geometry",
            ExternalBehavior {
                validate: |text| text.starts_with("POINT("),
                ..inet6::behavior()
            },
        )
        .unwrap();
    let registry = builder.build();
    let point = registry.lookup("POINT").unwrap();
    assert!(point.validate_literal("POINT(1 2)").is_ok());
    assert!(point.validate_literal("1 2").is_err());
    assert!(
        registry
            .aggregate_names(AggregationPurpose::Result, "point", "null")
            .is_ok()
    );
    assert!(
        registry
            .aggregate_names(AggregationPurpose::Result, "point", "int")
            .is_err()
    );
}
