//! SQL scalar types for Rust
//!
//! This crate bundles the scalar type system:
//! - A type registry with pairwise aggregation for result, comparison,
//!   MIN/MAX and arithmetic purposes
//! - DATE, TIME, DATETIME and TIMESTAMP values with rounding, saturation
//!   and the packed storage form
//! - Conversion diagnostics with SQL-style warning messages
//!
//! # Example
//!
//! ```
//! use sqlscalar::types::{AggregationPurpose, TypeRegistry};
//!
//! let registry = TypeRegistry::builtin();
//! let ty = registry
//!     .aggregate_names(AggregationPurpose::MinMax, "tinyint", "double")
//!     .unwrap();
//! assert_eq!(ty.name(), "double");
//! ```

// Re-export all public APIs from internal crates
pub use sqlscalar_diagnostics as diagnostics;
pub use sqlscalar_temporal as temporal;
pub use sqlscalar_types as types;

// Convenience re-exports
pub use sqlscalar_diagnostics::{ConversionDiagnostics, Result, ScalarError};
pub use sqlscalar_temporal::{Temporal, TemporalOptions};
pub use sqlscalar_types::{AggregationPurpose, HybridTypeSlot, TypeRegistry};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
