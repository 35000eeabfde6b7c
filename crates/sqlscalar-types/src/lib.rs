//! SQL scalar type system
//!
//! This crate defines the data type registry and the rules that pick one
//! type out of several operand types:
//! - Type descriptors with result, comparison and protocol categories
//! - Families grouping related types, each with fallback aggregation rules
//! - Pairwise aggregation tables, one per [`AggregationPurpose`]
//! - [`HybridTypeSlot`] for folding any number of operands
//!
//! Built-in types always occupy the same ids; extensions such as [`inet6`]
//! and [`timestamp_tz`] are registered after them through a
//! [`TypeRegistryBuilder`].

pub mod aggregation;
mod builtin;
pub mod descriptor;
pub mod family;
pub mod hybrid;
pub mod inet6;
pub mod registry;
pub mod timestamp_tz;

pub use aggregation::{AggregationContext, AggregationPurpose, AggregationSource, PairAggregationTable, PairRule};
pub use descriptor::{
    BuiltinFamily, BuiltinType, Capabilities, ExternalBehavior, ProtocolKind, ResultCategory, TypeDescriptor, TypeId,
    TypeKind,
};
pub use family::{AggregateFn, FallbackKind, FamilyId, TypeFamily};
pub use hybrid::HybridTypeSlot;
pub use registry::{TypeRef, TypeRegistry, TypeRegistryBuilder, global, install, normalize_name};
