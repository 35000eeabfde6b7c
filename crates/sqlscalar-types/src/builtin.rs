//! Built-in families, types and explicit aggregation tables

use crate::aggregation::AggregationPurpose;
use crate::descriptor::{BuiltinFamily, BuiltinType, TypeId, TypeKind};
use crate::family::TypeFamily;
use crate::registry::{TypeRegistry, TypeRegistryBuilder};

use BuiltinType as B;

const FLOATS: [BuiltinType; 2] = [B::Float, B::Double];

const NUMERICS: [BuiltinType; 15] = [
    B::TinyInt,
    B::SmallInt,
    B::MediumInt,
    B::Int,
    B::BigInt,
    B::TinyIntUnsigned,
    B::SmallIntUnsigned,
    B::MediumIntUnsigned,
    B::IntUnsigned,
    B::BigIntUnsigned,
    B::Year,
    B::Bit,
    B::Float,
    B::Double,
    B::Decimal,
];

const STRINGS: [BuiltinType; 8] = [
    B::Char,
    B::Varchar,
    B::TinyBlob,
    B::Blob,
    B::MediumBlob,
    B::LongBlob,
    B::Enum,
    B::Set,
];

const TEMPORALS: [BuiltinType; 4] = [B::Date, B::Time, B::Datetime, B::Timestamp];

/// Register everything built in; runs before any external registration
pub(crate) fn register(builder: &mut TypeRegistryBuilder) {
    for family in BuiltinFamily::ALL {
        builder.push_family(family_of(family));
    }
    for ty in BuiltinType::ALL {
        builder.push_type(ty.name(), ty.family().id(), TypeKind::Builtin(ty));
    }
    register_result_table(builder);
    register_comparison_table(builder);
    register_min_max_table(builder);
    for purpose in [
        AggregationPurpose::NumOp,
        AggregationPurpose::Add,
        AggregationPurpose::Subtract,
        AggregationPurpose::Multiply,
        AggregationPurpose::Divide,
        AggregationPurpose::Modulo,
    ] {
        register_num_op_table(builder, purpose);
    }
}

fn family_of(family: BuiltinFamily) -> TypeFamily {
    let base = TypeFamily::new(family.name());
    match family {
        BuiltinFamily::Null => base
            .with_result(null_passthrough)
            .with_comparison(null_passthrough)
            .with_min_max(null_passthrough)
            .with_num_op(null_num_op),
        BuiltinFamily::Row => base,
        BuiltinFamily::Numeric => base
            .with_result(|r, a, b| numeric_pair(r, a, b).and_then(|(a, b)| numeric_result(a, b)))
            .with_comparison(|r, a, b| numeric_pair(r, a, b).map(|(a, b)| numeric_common(a, b).id()))
            .with_min_max(|r, a, b| numeric_pair(r, a, b).map(|(a, b)| numeric_min_max(a, b).id()))
            .with_num_op(|r, a, b| numeric_pair(r, a, b).map(|(a, b)| numeric_common(a, b).id()))
            .with_alias("integer", "int")
            .with_alias("bool", "tinyint")
            .with_alias("boolean", "tinyint")
            .with_alias("real", "double")
            .with_alias("numeric", "decimal")
            .with_alias("dec", "decimal"),
        BuiltinFamily::String => base
            .with_result(string_merge)
            .with_comparison(string_merge)
            .with_min_max(string_merge)
            .with_num_op(|r, a, b| pair_in(r, a, b, BuiltinFamily::String).map(|_| B::Double.id()))
            .with_alias("character", "char"),
        BuiltinFamily::Temporal => base
            .with_result(temporal_merge)
            .with_comparison(temporal_merge)
            .with_min_max(temporal_merge)
            .with_num_op(|r, a, b| {
                pair_in(r, a, b, BuiltinFamily::Temporal).map(|pair| match pair {
                    (B::Date, B::Date) => B::BigInt.id(),
                    _ => B::Decimal.id(),
                })
            }),
    }
}

/// Both operands built in and members of `family`
fn pair_in(registry: &TypeRegistry, a: TypeId, b: TypeId, family: BuiltinFamily) -> Option<(BuiltinType, BuiltinType)> {
    let a = registry.builtin_of(a).filter(|ty| ty.family() == family)?;
    let b = registry.builtin_of(b).filter(|ty| ty.family() == family)?;
    Some((a, b))
}

// === Null family ===

/// The non-null operand when the other one is NULL
fn null_other(registry: &TypeRegistry, a: TypeId, b: TypeId) -> Option<TypeId> {
    let other = match (registry.builtin_of(a), registry.builtin_of(b)) {
        (Some(B::Null), _) => b,
        (_, Some(B::Null)) => a,
        _ => return None,
    };
    (registry.builtin_of(other) != Some(B::Row)).then_some(other)
}

fn null_passthrough(registry: &TypeRegistry, a: TypeId, b: TypeId) -> Option<TypeId> {
    null_other(registry, a, b)
}

/// NULL in arithmetic takes the numeric form of the other operand
fn null_num_op(registry: &TypeRegistry, a: TypeId, b: TypeId) -> Option<TypeId> {
    let other = registry.builtin_of(null_other(registry, a, b)?)?;
    Some(numeric_form(other).id())
}

/// Type a value takes when used as a number
fn numeric_form(ty: BuiltinType) -> BuiltinType {
    match ty.family() {
        BuiltinFamily::Numeric => ty,
        BuiltinFamily::Temporal if ty == B::Date => B::BigInt,
        BuiltinFamily::Temporal => B::Decimal,
        _ => B::Double,
    }
}

// === Numeric family ===

fn numeric_pair(registry: &TypeRegistry, a: TypeId, b: TypeId) -> Option<(BuiltinType, BuiltinType)> {
    pair_in(registry, a, b, BuiltinFamily::Numeric)
}

/// Integer widths in ascending order
const WIDTHS: [u8; 5] = [8, 16, 24, 32, 64];

fn next_width(bits: u8) -> Option<u8> {
    WIDTHS.into_iter().find(|w| *w > bits)
}

/// Smallest integer type holding both, or DECIMAL when none does
fn merge_integers(a: (u8, bool), b: (u8, bool)) -> BuiltinType {
    let ((a_bits, a_unsigned), (b_bits, b_unsigned)) = (a, b);
    if a_unsigned == b_unsigned {
        return BuiltinType::integer_of(a_bits.max(b_bits), a_unsigned).unwrap_or(B::Decimal);
    }
    let (signed, unsigned) = if a_unsigned { (b_bits, a_bits) } else { (a_bits, b_bits) };
    next_width(unsigned)
        .and_then(|bits| BuiltinType::integer_of(bits.max(signed), false))
        .unwrap_or(B::Decimal)
}

fn numeric_result(a: BuiltinType, b: BuiltinType) -> Option<TypeId> {
    let merged = match (a.integer_width(), b.integer_width()) {
        (Some(wa), Some(wb)) => merge_integers(wa, wb),
        _ => match (a, b) {
            (B::Double, _) | (_, B::Double) => B::Double,
            (B::Decimal, B::Float) | (B::Float, B::Decimal) => B::Double,
            (B::Decimal, _) | (_, B::Decimal) => B::Decimal,
            (B::Float, int) | (int, B::Float) => match int.integer_width() {
                Some((bits, _)) if bits <= 16 => B::Float,
                _ => B::Double,
            },
            _ => return None,
        },
    };
    Some(merged.id())
}

/// Comparison and arithmetic: integers as BIGINT, exact mixes as DECIMAL, else DOUBLE
fn numeric_common(a: BuiltinType, b: BuiltinType) -> BuiltinType {
    match (a.integer_width(), b.integer_width()) {
        (Some((_, true)), Some((_, true))) => B::BigIntUnsigned,
        (Some(_), Some(_)) => B::BigInt,
        _ if is_exact(a) && is_exact(b) => B::Decimal,
        _ => B::Double,
    }
}

fn numeric_min_max(a: BuiltinType, b: BuiltinType) -> BuiltinType {
    if a == B::Float && b == B::Float {
        return B::Float;
    }
    numeric_common(a, b)
}

fn is_exact(ty: BuiltinType) -> bool {
    ty.is_integer() || ty == B::Decimal
}

// === String family ===

/// Position in the widening order CHAR < VARCHAR < blobs by size
fn string_rank(ty: BuiltinType) -> u8 {
    match ty {
        B::Char => 0,
        B::TinyBlob => 2,
        B::Blob => 3,
        B::MediumBlob => 4,
        B::LongBlob => 5,
        _ => 1,
    }
}

fn wider_string(a: BuiltinType, b: BuiltinType) -> BuiltinType {
    match string_rank(a).max(string_rank(b)) {
        0 => B::Char,
        1 => B::Varchar,
        _ if string_rank(a) >= string_rank(b) => a,
        _ => b,
    }
}

fn string_merge(registry: &TypeRegistry, a: TypeId, b: TypeId) -> Option<TypeId> {
    pair_in(registry, a, b, BuiltinFamily::String).map(|(a, b)| wider_string(a, b).id())
}

/// VARCHAR, or the blob when the string side is one
fn string_side(ty: BuiltinType) -> BuiltinType {
    if ty.is_blob() { ty } else { B::Varchar }
}

// === Temporal family ===

fn temporal_merge(registry: &TypeRegistry, a: TypeId, b: TypeId) -> Option<TypeId> {
    pair_in(registry, a, b, BuiltinFamily::Temporal).map(|_| B::Datetime.id())
}

// === Explicit tables ===

fn rule(builder: &mut TypeRegistryBuilder, purpose: AggregationPurpose, a: BuiltinType, b: BuiltinType, result: BuiltinType) {
    builder.push_rule(purpose, a.id(), b.id(), result.id());
}

/// Register for a commutative purpose once, for a directional one in both orders
fn symmetric(builder: &mut TypeRegistryBuilder, purpose: AggregationPurpose, a: BuiltinType, b: BuiltinType, result: BuiltinType) {
    rule(builder, purpose, a, b, result);
    if !purpose.is_commutative() {
        rule(builder, purpose, b, a, result);
    }
}

fn register_result_table(builder: &mut TypeRegistryBuilder) {
    let purpose = AggregationPurpose::Result;
    for s in STRINGS {
        for n in NUMERICS {
            rule(builder, purpose, n, s, string_side(s));
        }
        for t in TEMPORALS {
            rule(builder, purpose, s, t, string_side(s));
        }
    }
    for n in NUMERICS {
        for t in TEMPORALS {
            rule(builder, purpose, n, t, B::Varchar);
        }
    }
}

fn register_comparison_table(builder: &mut TypeRegistryBuilder) {
    let purpose = AggregationPurpose::Comparison;
    for n in NUMERICS {
        for s in STRINGS {
            rule(builder, purpose, n, s, B::Double);
        }
    }
    for t in TEMPORALS {
        for other in NUMERICS.into_iter().chain(STRINGS) {
            rule(builder, purpose, t, other, t);
        }
    }
}

fn register_min_max_table(builder: &mut TypeRegistryBuilder) {
    let purpose = AggregationPurpose::MinMax;
    for int in BuiltinType::INTEGERS {
        for f in FLOATS {
            rule(builder, purpose, int, f, B::Double);
        }
    }
    for n in NUMERICS {
        for s in STRINGS {
            rule(builder, purpose, n, s, B::Double);
        }
    }
    for t in TEMPORALS {
        let result = match t {
            B::Time | B::Timestamp => B::Datetime,
            other => other,
        };
        for other in NUMERICS.into_iter().chain(STRINGS) {
            rule(builder, purpose, t, other, result);
        }
    }
}

fn register_num_op_table(builder: &mut TypeRegistryBuilder, purpose: AggregationPurpose) {
    for int in BuiltinType::INTEGERS {
        symmetric(builder, purpose, int, B::Decimal, B::Decimal);
    }
    for s in STRINGS {
        for other in NUMERICS.into_iter().chain(TEMPORALS) {
            symmetric(builder, purpose, other, s, B::Double);
        }
    }
    for t in TEMPORALS {
        let form = numeric_form(t);
        for n in NUMERICS {
            let result = if form == n { n } else { numeric_common(form, n) };
            symmetric(builder, purpose, t, n, result);
        }
    }
    if purpose == AggregationPurpose::Divide {
        for a in BuiltinType::INTEGERS {
            for b in BuiltinType::INTEGERS {
                if a != b {
                    rule(builder, purpose, a, b, B::Decimal);
                }
            }
        }
    }
}
