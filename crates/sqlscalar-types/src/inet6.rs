//! INET6, an externally registered type
//!
//! Shows how a type outside the built-in set plugs in: its own family with
//! its own fallbacks, a descriptor carrying an [`ExternalBehavior`], and no
//! change to any built-in code.
//!
//! Aggregation rules:
//! - result and MIN/MAX: INET6 with NULL or a general purpose string is INET6
//! - comparison: INET6 with NULL or LONGBLOB is INET6
//! - arithmetic: never

use crate::descriptor::{BuiltinType, Capabilities, ExternalBehavior, ProtocolKind, ResultCategory, TypeId};
use crate::family::TypeFamily;
use crate::registry::{TypeRegistry, TypeRegistryBuilder};
use sqlscalar_diagnostics::Result;
use std::net::Ipv6Addr;
use std::sync::Arc;

pub const INET6: &str = "inet6";

/// Add the INET6 family and type to a builder
pub fn register(builder: &mut TypeRegistryBuilder) -> Result<TypeId> {
    builder.add_family(family())?;
    builder.add_external(INET6, INET6, behavior())
}

/// Built-in registry plus INET6
pub fn registry() -> Result<Arc<TypeRegistry>> {
    let mut builder = TypeRegistry::builder();
    register(&mut builder)?;
    Ok(builder.build())
}

pub fn behavior() -> ExternalBehavior {
    ExternalBehavior {
        result_category: ResultCategory::String,
        comparison_category: ResultCategory::String,
        protocol: ProtocolKind::String,
        capabilities: Capabilities::STRING,
        validate: is_valid_literal,
    }
}

pub fn is_valid_literal(text: &str) -> bool {
    text.trim().parse::<Ipv6Addr>().is_ok()
}

fn family() -> TypeFamily {
    TypeFamily::new(INET6)
        .with_result(|r, a, b| with_other(r, a, b, |other| other == BuiltinType::Null || is_general_string(other)))
        .with_min_max(|r, a, b| with_other(r, a, b, |other| other == BuiltinType::Null || is_general_string(other)))
        .with_comparison(|r, a, b| {
            with_other(r, a, b, |other| matches!(other, BuiltinType::Null | BuiltinType::LongBlob))
        })
}

fn is_general_string(ty: BuiltinType) -> bool {
    matches!(ty, BuiltinType::Char | BuiltinType::Varchar) || ty.is_blob()
}

/// The INET6 operand when the other, built-in operand passes `accept`
fn with_other(
    registry: &TypeRegistry,
    a: TypeId,
    b: TypeId,
    accept: impl Fn(BuiltinType) -> bool,
) -> Option<TypeId> {
    let is_inet6 = |id: TypeId| registry.descriptor(id).is_some_and(|d| d.name() == INET6);
    let (inet6, other) = if is_inet6(a) {
        (a, b)
    } else if is_inet6(b) {
        (b, a)
    } else {
        return None;
    };
    registry.builtin_of(other).filter(|ty| accept(*ty)).map(|_| inet6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::AggregationPurpose;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("::1", true)]
    #[case("2001:db8::ff00:42:8329", true)]
    #[case("192.168.0.1", false)]
    #[case("not an address", false)]
    fn test_literal_validation(#[case] text: &str, #[case] valid: bool) {
        let registry = registry().unwrap();
        let inet6 = registry.lookup("INET6").unwrap();
        assert_eq!(inet6.validate_literal(text).is_ok(), valid);
    }

    #[test]
    fn test_registered_after_builtins() {
        let registry = registry().unwrap();
        let inet6 = registry.lookup(INET6).unwrap();
        assert_eq!(inet6.id().index(), BuiltinType::ALL.len());
        assert!(inet6.descriptor().is_external());
        assert_eq!(inet6.protocol_kind(), ProtocolKind::String);
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut builder = TypeRegistry::builder();
        register(&mut builder).unwrap();
        assert!(register(&mut builder).is_err());
    }

    #[rstest]
    #[case(AggregationPurpose::Result, "varchar", Some("inet6"))]
    #[case(AggregationPurpose::Result, "null", Some("inet6"))]
    #[case(AggregationPurpose::Result, "int", None)]
    #[case(AggregationPurpose::MinMax, "blob", Some("inet6"))]
    #[case(AggregationPurpose::Comparison, "longblob", Some("inet6"))]
    #[case(AggregationPurpose::Comparison, "varchar", None)]
    #[case(AggregationPurpose::Add, "null", None)]
    #[case(AggregationPurpose::Add, "int", None)]
    fn test_aggregation(#[case] purpose: AggregationPurpose, #[case] other: &str, #[case] expected: Option<&str>) {
        let registry = registry().unwrap();
        let forward = registry.aggregate_names(purpose, INET6, other).ok().map(|t| t.name().to_string());
        let backward = registry.aggregate_names(purpose, other, INET6).ok().map(|t| t.name().to_string());
        assert_eq!(forward.as_deref(), expected);
        assert_eq!(backward.as_deref(), expected);
    }
}
