//! TIMESTAMP WITH TIME ZONE, an externally registered temporal type
//!
//! The type lives in its own family and mixes with nothing but itself and
//! NULL. Every purpose, arithmetic included, answers the same way:
//! - `(tz, tz)` is `tz` (identity)
//! - `(tz, NULL)` and `(NULL, tz)` are `tz`
//! - anything else, plain TIMESTAMP and DATETIME included, is incompatible
//!
//! Literals are `YYYY-MM-DD HH:MM:SS[.fraction] +HH:MM` within the TIMESTAMP
//! range, for example `1970-01-01 00:00:00 +00:00`.

use crate::descriptor::{BuiltinType, Capabilities, ExternalBehavior, ProtocolKind, ResultCategory, TypeId};
use crate::family::TypeFamily;
use crate::registry::{TypeRegistry, TypeRegistryBuilder};
use chrono::DateTime;
use sqlscalar_diagnostics::Result;
use sqlscalar_temporal::limits::TIMESTAMP_MAX_SECONDS;
use std::sync::Arc;

pub const TIMESTAMP_TZ: &str = "timestamp with time zone";
pub const FAMILY: &str = "timestamp_with_tz";

const LITERAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %:z";

/// Add the family and type to a builder
pub fn register(builder: &mut TypeRegistryBuilder) -> Result<TypeId> {
    builder.add_family(family())?;
    builder.add_external(TIMESTAMP_TZ, FAMILY, behavior())
}

/// Built-in registry plus TIMESTAMP WITH TIME ZONE
pub fn registry() -> Result<Arc<TypeRegistry>> {
    let mut builder = TypeRegistry::builder();
    register(&mut builder)?;
    Ok(builder.build())
}

pub fn behavior() -> ExternalBehavior {
    ExternalBehavior {
        result_category: ResultCategory::Time,
        comparison_category: ResultCategory::Time,
        protocol: ProtocolKind::Timestamp,
        capabilities: Capabilities::TEMPORAL | Capabilities::HAS_DATE | Capabilities::FRACTIONAL,
        validate: is_valid_literal,
    }
}

pub fn is_valid_literal(text: &str) -> bool {
    DateTime::parse_from_str(text.trim(), LITERAL_FORMAT)
        .is_ok_and(|dt| (0..=i64::from(TIMESTAMP_MAX_SECONDS)).contains(&dt.timestamp()))
}

fn family() -> TypeFamily {
    TypeFamily::new(FAMILY)
        .with_result(with_null)
        .with_comparison(with_null)
        .with_min_max(with_null)
        .with_num_op(with_null)
        .with_alias("timestamptz", TIMESTAMP_TZ)
}

/// The zoned operand when the other one is NULL
fn with_null(registry: &TypeRegistry, a: TypeId, b: TypeId) -> Option<TypeId> {
    let is_zoned = |id: TypeId| registry.descriptor(id).is_some_and(|d| d.name() == TIMESTAMP_TZ);
    let is_null = |id: TypeId| registry.builtin_of(id) == Some(BuiltinType::Null);
    if is_zoned(a) && is_null(b) {
        Some(a)
    } else if is_zoned(b) && is_null(a) {
        Some(b)
    } else {
        None
    }
}
