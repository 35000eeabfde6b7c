//! Type descriptors
//!
//! A [`TypeDescriptor`] is the immutable record the registry keeps for one
//! data type: its stable [`TypeId`], its name, the family it belongs to and
//! the per-type facts aggregation and the wire protocol need. Built-in types
//! are described by [`BuiltinType`]; externally supplied ones carry an
//! [`ExternalBehavior`] bundle instead.

use crate::family::FamilyId;
use serde::{Deserialize, Serialize};
use sqlscalar_diagnostics::{Result, ScalarError};
use sqlscalar_temporal::{ChronoZone, ConversionDiagnostics, DefaultTextParser, Temporal, TemporalOptions};
use std::fmt;
use std::str::FromStr;

/// Stable index of a descriptor in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category a value of the type evaluates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultCategory {
    Int,
    Real,
    Decimal,
    String,
    Time,
    Row,
}

impl fmt::Display for ResultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultCategory::Int => "INT",
            ResultCategory::Real => "REAL",
            ResultCategory::Decimal => "DECIMAL",
            ResultCategory::String => "STRING",
            ResultCategory::Time => "TIME",
            ResultCategory::Row => "ROW",
        };
        f.write_str(name)
    }
}

/// Type tag sent to clients in result set metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProtocolKind {
    Tiny = 1,
    Short = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    Null = 6,
    Timestamp = 7,
    LongLong = 8,
    Int24 = 9,
    Date = 10,
    Time = 11,
    Datetime = 12,
    Year = 13,
    Bit = 16,
    NewDecimal = 246,
    TinyBlob = 249,
    MediumBlob = 250,
    LongBlob = 251,
    Blob = 252,
    VarString = 253,
    String = 254,
}

impl ProtocolKind {
    /// Wire code
    pub const fn code(self) -> u8 {
        self as u8
    }
}

bitflags::bitflags! {
    /// Capability flags of a type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        const UNSIGNED = 1;
        const AUTO_INCREMENT = 1 << 1;
        const NUMERIC = 1 << 2;
        const TEMPORAL = 1 << 3;
        const HAS_DATE = 1 << 4;
        const FRACTIONAL = 1 << 5;
        const STRING = 1 << 6;
        const BLOB = 1 << 7;
    }
}

impl Capabilities {
    pub const NONE: Self = Self::empty();

    const NAMES: [(Capabilities, &'static str); 8] = [
        (Self::UNSIGNED, "unsigned"),
        (Self::AUTO_INCREMENT, "auto_increment"),
        (Self::NUMERIC, "numeric"),
        (Self::TEMPORAL, "temporal"),
        (Self::HAS_DATE, "has_date"),
        (Self::FRACTIONAL, "fractional"),
        (Self::STRING, "string"),
        (Self::BLOB, "blob"),
    ];
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::NONE
    }
}

impl Serialize for Capabilities {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bits = u16::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join(","))
    }
}

/// Built-in scalar types
///
/// The declaration order is the registration order, so a built-in type's
/// [`TypeId`] is its position in [`BuiltinType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinType {
    Null,
    Row,
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    TinyIntUnsigned,
    SmallIntUnsigned,
    MediumIntUnsigned,
    IntUnsigned,
    BigIntUnsigned,
    Year,
    Bit,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    Datetime,
    Timestamp,
    Char,
    Varchar,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Enum,
    Set,
}

/// Family a built-in type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFamily {
    Null,
    Row,
    Numeric,
    String,
    Temporal,
}

impl BuiltinFamily {
    pub const ALL: [BuiltinFamily; 5] = [
        BuiltinFamily::Null,
        BuiltinFamily::Row,
        BuiltinFamily::Numeric,
        BuiltinFamily::String,
        BuiltinFamily::Temporal,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            BuiltinFamily::Null => "null",
            BuiltinFamily::Row => "row",
            BuiltinFamily::Numeric => "numeric",
            BuiltinFamily::String => "string",
            BuiltinFamily::Temporal => "temporal",
        }
    }

    /// Family id; built-in families are registered first, in this order
    pub const fn id(self) -> FamilyId {
        FamilyId::from_index(self as usize)
    }
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 29] = [
        BuiltinType::Null,
        BuiltinType::Row,
        BuiltinType::TinyInt,
        BuiltinType::SmallInt,
        BuiltinType::MediumInt,
        BuiltinType::Int,
        BuiltinType::BigInt,
        BuiltinType::TinyIntUnsigned,
        BuiltinType::SmallIntUnsigned,
        BuiltinType::MediumIntUnsigned,
        BuiltinType::IntUnsigned,
        BuiltinType::BigIntUnsigned,
        BuiltinType::Year,
        BuiltinType::Bit,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::Decimal,
        BuiltinType::Date,
        BuiltinType::Time,
        BuiltinType::Datetime,
        BuiltinType::Timestamp,
        BuiltinType::Char,
        BuiltinType::Varchar,
        BuiltinType::TinyBlob,
        BuiltinType::Blob,
        BuiltinType::MediumBlob,
        BuiltinType::LongBlob,
        BuiltinType::Enum,
        BuiltinType::Set,
    ];

    /// Integer kinds: plain integers of every width plus `YEAR` and `BIT`
    pub const INTEGERS: [BuiltinType; 12] = [
        BuiltinType::TinyInt,
        BuiltinType::SmallInt,
        BuiltinType::MediumInt,
        BuiltinType::Int,
        BuiltinType::BigInt,
        BuiltinType::TinyIntUnsigned,
        BuiltinType::SmallIntUnsigned,
        BuiltinType::MediumIntUnsigned,
        BuiltinType::IntUnsigned,
        BuiltinType::BigIntUnsigned,
        BuiltinType::Year,
        BuiltinType::Bit,
    ];

    pub const fn id(self) -> TypeId {
        TypeId(self as u32)
    }

    pub const fn name(self) -> &'static str {
        match self {
            BuiltinType::Null => "null",
            BuiltinType::Row => "row",
            BuiltinType::TinyInt => "tinyint",
            BuiltinType::SmallInt => "smallint",
            BuiltinType::MediumInt => "mediumint",
            BuiltinType::Int => "int",
            BuiltinType::BigInt => "bigint",
            BuiltinType::TinyIntUnsigned => "tinyint unsigned",
            BuiltinType::SmallIntUnsigned => "smallint unsigned",
            BuiltinType::MediumIntUnsigned => "mediumint unsigned",
            BuiltinType::IntUnsigned => "int unsigned",
            BuiltinType::BigIntUnsigned => "bigint unsigned",
            BuiltinType::Year => "year",
            BuiltinType::Bit => "bit",
            BuiltinType::Float => "float",
            BuiltinType::Double => "double",
            BuiltinType::Decimal => "decimal",
            BuiltinType::Date => "date",
            BuiltinType::Time => "time",
            BuiltinType::Datetime => "datetime",
            BuiltinType::Timestamp => "timestamp",
            BuiltinType::Char => "char",
            BuiltinType::Varchar => "varchar",
            BuiltinType::TinyBlob => "tinyblob",
            BuiltinType::Blob => "blob",
            BuiltinType::MediumBlob => "mediumblob",
            BuiltinType::LongBlob => "longblob",
            BuiltinType::Enum => "enum",
            BuiltinType::Set => "set",
        }
    }

    pub const fn family(self) -> BuiltinFamily {
        use BuiltinType::*;
        match self {
            Null => BuiltinFamily::Null,
            Row => BuiltinFamily::Row,
            Date | Time | Datetime | Timestamp => BuiltinFamily::Temporal,
            Char | Varchar | TinyBlob | Blob | MediumBlob | LongBlob | Enum | Set => BuiltinFamily::String,
            _ => BuiltinFamily::Numeric,
        }
    }

    /// Width in bits and signedness of an integer kind
    ///
    /// `YEAR` behaves as `SMALLINT UNSIGNED` and `BIT` as `BIGINT UNSIGNED`.
    pub const fn integer_width(self) -> Option<(u8, bool)> {
        use BuiltinType::*;
        match self {
            TinyInt => Some((8, false)),
            SmallInt => Some((16, false)),
            MediumInt => Some((24, false)),
            Int => Some((32, false)),
            BigInt => Some((64, false)),
            TinyIntUnsigned => Some((8, true)),
            SmallIntUnsigned | Year => Some((16, true)),
            MediumIntUnsigned => Some((24, true)),
            IntUnsigned => Some((32, true)),
            BigIntUnsigned | Bit => Some((64, true)),
            _ => None,
        }
    }

    pub const fn is_integer(self) -> bool {
        self.integer_width().is_some()
    }

    /// Integer type of a width and signedness
    pub const fn integer_of(bits: u8, unsigned: bool) -> Option<Self> {
        use BuiltinType::*;
        match (bits, unsigned) {
            (8, false) => Some(TinyInt),
            (16, false) => Some(SmallInt),
            (24, false) => Some(MediumInt),
            (32, false) => Some(Int),
            (64, false) => Some(BigInt),
            (8, true) => Some(TinyIntUnsigned),
            (16, true) => Some(SmallIntUnsigned),
            (24, true) => Some(MediumIntUnsigned),
            (32, true) => Some(IntUnsigned),
            (64, true) => Some(BigIntUnsigned),
            _ => None,
        }
    }

    pub const fn is_blob(self) -> bool {
        matches!(
            self,
            BuiltinType::TinyBlob | BuiltinType::Blob | BuiltinType::MediumBlob | BuiltinType::LongBlob
        )
    }

    pub const fn result_category(self) -> ResultCategory {
        use BuiltinType::*;
        match self {
            Null | Char | Varchar | TinyBlob | Blob | MediumBlob | LongBlob | Enum | Set => ResultCategory::String,
            Row => ResultCategory::Row,
            Float | Double => ResultCategory::Real,
            Decimal => ResultCategory::Decimal,
            Date | Time | Datetime | Timestamp => ResultCategory::Time,
            _ => ResultCategory::Int,
        }
    }

    pub const fn comparison_category(self) -> ResultCategory {
        self.result_category()
    }

    pub const fn protocol_kind(self) -> ProtocolKind {
        use BuiltinType::*;
        match self {
            Null | Row => ProtocolKind::Null,
            TinyInt | TinyIntUnsigned => ProtocolKind::Tiny,
            SmallInt | SmallIntUnsigned => ProtocolKind::Short,
            MediumInt | MediumIntUnsigned => ProtocolKind::Int24,
            Int | IntUnsigned => ProtocolKind::Long,
            BigInt | BigIntUnsigned => ProtocolKind::LongLong,
            Year => ProtocolKind::Year,
            Bit => ProtocolKind::Bit,
            Float => ProtocolKind::Float,
            Double => ProtocolKind::Double,
            Decimal => ProtocolKind::NewDecimal,
            Date => ProtocolKind::Date,
            Time => ProtocolKind::Time,
            Datetime => ProtocolKind::Datetime,
            Timestamp => ProtocolKind::Timestamp,
            Char | Enum | Set => ProtocolKind::String,
            Varchar => ProtocolKind::VarString,
            TinyBlob => ProtocolKind::TinyBlob,
            Blob => ProtocolKind::Blob,
            MediumBlob => ProtocolKind::MediumBlob,
            LongBlob => ProtocolKind::LongBlob,
        }
    }

    pub const fn capabilities(self) -> Capabilities {
        use BuiltinType::*;
        let numeric = Capabilities::NUMERIC;
        let int = Capabilities::NUMERIC.union(Capabilities::AUTO_INCREMENT);
        let uint = int.union(Capabilities::UNSIGNED);
        match self {
            Null | Row => Capabilities::NONE,
            TinyInt | SmallInt | MediumInt | Int | BigInt => int,
            TinyIntUnsigned | SmallIntUnsigned | MediumIntUnsigned | IntUnsigned | BigIntUnsigned => uint,
            Year | Bit => numeric.union(Capabilities::UNSIGNED),
            Float | Double => int.union(Capabilities::FRACTIONAL),
            Decimal => numeric.union(Capabilities::FRACTIONAL),
            Time => Capabilities::TEMPORAL.union(Capabilities::FRACTIONAL),
            Date => Capabilities::TEMPORAL.union(Capabilities::HAS_DATE),
            Datetime | Timestamp => Capabilities::TEMPORAL
                .union(Capabilities::HAS_DATE)
                .union(Capabilities::FRACTIONAL),
            Char | Varchar | Enum | Set => Capabilities::STRING,
            TinyBlob | Blob | MediumBlob | LongBlob => Capabilities::STRING.union(Capabilities::BLOB),
        }
    }

    /// Whether `text` is an acceptable literal of this type
    pub fn accepts_literal(self, text: &str) -> bool {
        use BuiltinType::*;
        let text = text.trim();
        match self {
            Null => text.eq_ignore_ascii_case("null"),
            Row => false,
            Year => text
                .parse::<u16>()
                .is_ok_and(|y| y <= 99 || (1901..=2155).contains(&y)),
            Float | Double => text.parse::<f64>().is_ok_and(f64::is_finite),
            Decimal => rust_decimal::Decimal::from_str(text).is_ok(),
            Date | Time | Datetime | Timestamp => self.accepts_temporal(text),
            Char | Varchar | TinyBlob | Blob | MediumBlob | LongBlob | Enum | Set => true,
            _ => match self.integer_width() {
                Some((bits, unsigned)) => integer_fits(text, bits, unsigned),
                None => false,
            },
        }
    }

    fn accepts_temporal(self, text: &str) -> bool {
        let mut diag = ConversionDiagnostics::new();
        let value = Temporal::from_text(text, &DefaultTextParser, &TemporalOptions::default(), &mut diag);
        if !diag.warnings().without_notes().is_empty() {
            return false;
        }
        match (self, value) {
            (_, Temporal::None) => false,
            (BuiltinType::Time, Temporal::Time(_)) => true,
            (BuiltinType::Time, _) => false,
            (BuiltinType::Date | BuiltinType::Datetime, Temporal::Date(_) | Temporal::Datetime(_)) => true,
            (BuiltinType::Timestamp, Temporal::Date(d)) => {
                sqlscalar_temporal::Timestamp::from_datetime(&d.into(), &ChronoZone::utc(), &mut diag).is_some()
            }
            (BuiltinType::Timestamp, Temporal::Datetime(dt)) => {
                sqlscalar_temporal::Timestamp::from_datetime(&dt, &ChronoZone::utc(), &mut diag).is_some()
            }
            _ => false,
        }
    }
}

fn integer_fits(text: &str, bits: u8, unsigned: bool) -> bool {
    let Ok(value) = text.parse::<i128>() else {
        return false;
    };
    if unsigned {
        value >= 0 && value < (1i128 << bits)
    } else {
        let half = 1i128 << (bits - 1);
        value >= -half && value < half
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behavior bundle of an externally supplied type
#[derive(Debug, Clone, Copy)]
pub struct ExternalBehavior {
    pub result_category: ResultCategory,
    pub comparison_category: ResultCategory,
    pub protocol: ProtocolKind,
    pub capabilities: Capabilities,
    /// Literal validation
    pub validate: fn(&str) -> bool,
}

#[derive(Debug, Clone, Copy)]
pub enum TypeKind {
    Builtin(BuiltinType),
    External(ExternalBehavior),
}

/// Immutable per-type record
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub(crate) id: TypeId,
    pub(crate) name: String,
    pub(crate) family: FamilyId,
    pub(crate) kind: TypeKind,
}

impl TypeDescriptor {
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family_id(&self) -> FamilyId {
        self.family
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn builtin(&self) -> Option<BuiltinType> {
        match self.kind {
            TypeKind::Builtin(ty) => Some(ty),
            TypeKind::External(_) => None,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self.kind, TypeKind::External(_))
    }

    pub fn result_category(&self) -> ResultCategory {
        match &self.kind {
            TypeKind::Builtin(ty) => ty.result_category(),
            TypeKind::External(ext) => ext.result_category,
        }
    }

    pub fn comparison_category(&self) -> ResultCategory {
        match &self.kind {
            TypeKind::Builtin(ty) => ty.comparison_category(),
            TypeKind::External(ext) => ext.comparison_category,
        }
    }

    pub fn protocol_kind(&self) -> ProtocolKind {
        match &self.kind {
            TypeKind::Builtin(ty) => ty.protocol_kind(),
            TypeKind::External(ext) => ext.protocol,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match &self.kind {
            TypeKind::Builtin(ty) => ty.capabilities(),
            TypeKind::External(ext) => ext.capabilities,
        }
    }

    /// Check a literal against the type
    pub fn validate_literal(&self, literal: &str) -> Result<()> {
        let ok = match &self.kind {
            TypeKind::Builtin(ty) => ty.accepts_literal(literal),
            TypeKind::External(ext) => (ext.validate)(literal),
        };
        if ok {
            Ok(())
        } else {
            Err(ScalarError::InvalidLiteral {
                type_name: self.name.clone(),
                literal: literal.to_string(),
            })
        }
    }
}
