//! SQL scalar diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the type
//! registry and the temporal conversion routines, including error codes,
//! conversion warning flags, and diagnostic reporting.

mod error;
mod error_code;
mod warnings;

pub use error::*;
pub use error_code::*;
pub use warnings::*;

/// Result type for scalar type system operations
pub type Result<T> = std::result::Result<T, ScalarError>;
