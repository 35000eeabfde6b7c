//! Error codes following a structured numbering system
//!
//! Error code ranges:
//! - SQL0001-SQL0099: Value conversion (truncation, range, invalid literals)
//! - SQL0100-SQL0199: Type aggregation
//! - SQL0200-SQL0299: Type registry
//! - SQL0400-SQL0499: System errors (internal, configuration)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a value conversion code (0001-0099)
    pub const fn is_conversion_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a type aggregation code (0100-0199)
    pub const fn is_aggregation_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a registry code (0200-0299)
    pub const fn is_registry_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Value conversion (0001-0099)
    map.insert(1, ErrorInfo::new("Data truncated"));
    map.insert(
        2,
        ErrorInfo::new("Value out of range")
            .with_help("The value was saturated to the largest value of the target type"),
    );
    map.insert(3, ErrorInfo::new("Incorrect value"));
    map.insert(4, ErrorInfo::new("Invalid timestamp"));
    map.insert(
        5,
        ErrorInfo::new("Zero date")
            .with_help("Allow zero dates in the date mode to accept 0000-00-00"),
    );
    map.insert(6, ErrorInfo::new("Zero in date"));
    map.insert(7, ErrorInfo::new("Fractional part truncated"));

    // Type aggregation (0100-0199)
    map.insert(
        100,
        ErrorInfo::new("Illegal parameter data types")
            .with_help("Cast one of the operands to a type both sides can be aggregated into"),
    );
    map.insert(101, ErrorInfo::new("Invalid aggregation purpose"));
    map.insert(103, ErrorInfo::new("Empty operand list"));

    // Registry (0200-0299)
    map.insert(200, ErrorInfo::new("Unknown data type"));
    map.insert(201, ErrorInfo::new("Duplicate data type"));
    map.insert(202, ErrorInfo::new("Unknown type family"));
    map.insert(203, ErrorInfo::new("Invalid literal for data type"));
    map.insert(204, ErrorInfo::new("Duplicate type family"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));
    map.insert(402, ErrorInfo::new("Configuration error"));

    map
});

// Value conversion
pub const SQL0001: ErrorCode = ErrorCode::new(1);
pub const SQL0002: ErrorCode = ErrorCode::new(2);
pub const SQL0003: ErrorCode = ErrorCode::new(3);
pub const SQL0004: ErrorCode = ErrorCode::new(4);
pub const SQL0005: ErrorCode = ErrorCode::new(5);
pub const SQL0006: ErrorCode = ErrorCode::new(6);
pub const SQL0007: ErrorCode = ErrorCode::new(7);

// Type aggregation
pub const SQL0100: ErrorCode = ErrorCode::new(100);
pub const SQL0101: ErrorCode = ErrorCode::new(101);
pub const SQL0103: ErrorCode = ErrorCode::new(103);

// Registry
pub const SQL0200: ErrorCode = ErrorCode::new(200);
pub const SQL0201: ErrorCode = ErrorCode::new(201);
pub const SQL0202: ErrorCode = ErrorCode::new(202);
pub const SQL0203: ErrorCode = ErrorCode::new(203);
pub const SQL0204: ErrorCode = ErrorCode::new(204);

// System errors
pub const SQL0400: ErrorCode = ErrorCode::new(400);
pub const SQL0402: ErrorCode = ErrorCode::new(402);
