//! Scalar type system error types

use crate::{ErrorCode, SQL0100, SQL0103, SQL0200, SQL0201, SQL0202, SQL0203, SQL0204, SQL0400, SQL0402};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - the operation cannot proceed
    Error,
    /// Warning - the value was changed or rejected, the statement continues
    Warning,
    /// Note - informational, e.g. a fraction dropped from a DATE
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Column the value was destined for, when known
    pub field: Option<String>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            field: None,
            help: None,
        }
    }

    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create a new note diagnostic
    pub fn note(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, code, message)
    }

    /// Set the field name
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with a colored severity prefix
    #[cfg(feature = "colored")]
    pub fn to_colored_string(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => self.severity.to_string().red().bold(),
            Severity::Warning => self.severity.to_string().yellow().bold(),
            Severity::Note => self.severity.to_string().cyan(),
        };
        format!("{}: {} - {}", severity, self.code.to_string().dimmed(), self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)
    }
}

/// Main scalar type system error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    /// No table entry or family rule answers the pair
    #[error("Illegal parameter data types {left} and {right} for operation '{operation}'")]
    IncompatibleTypes {
        operation: String,
        left: String,
        right: String,
    },

    /// Folding was asked to aggregate zero operands
    #[error("No operands to aggregate for operation '{operation}'")]
    EmptyOperands { operation: String },

    /// Type name is not registered
    #[error("Unknown data type: '{name}'")]
    UnknownType { name: String },

    /// Type name registered twice
    #[error("Data type '{name}' is already registered")]
    DuplicateType { name: String },

    /// Family name registered twice
    #[error("Type family '{name}' is already registered")]
    DuplicateFamily { name: String },

    /// Family name is not registered
    #[error("Unknown type family: '{name}'")]
    UnknownFamily { name: String },

    /// Literal rejected by a type's validator
    #[error("Incorrect {type_name} value: '{literal}'")]
    InvalidLiteral { type_name: String, literal: String },

    /// Bad configuration
    #[error("{code}: {message}")]
    Configuration { code: ErrorCode, message: String },

    /// Internal error
    #[error("{code}: {message}")]
    Internal { code: ErrorCode, message: String },
}

impl ScalarError {
    /// Create an incompatible types error
    pub fn incompatible(
        operation: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::IncompatibleTypes {
            operation: operation.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            code: SQL0402,
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: SQL0400,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::IncompatibleTypes { .. } => SQL0100,
            Self::EmptyOperands { .. } => SQL0103,
            Self::UnknownType { .. } => SQL0200,
            Self::DuplicateType { .. } => SQL0201,
            Self::UnknownFamily { .. } => SQL0202,
            Self::InvalidLiteral { .. } => SQL0203,
            Self::DuplicateFamily { .. } => SQL0204,
            Self::Configuration { code, .. } | Self::Internal { code, .. } => *code,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self.code().info().help {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}
