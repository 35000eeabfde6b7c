//! Conversion warnings
//!
//! Temporal and numeric conversions never fail outright. They return a value
//! (or no value) and record what happened on the way in a
//! [`ConversionDiagnostics`], which the caller turns into SQL warnings with
//! [`ConversionDiagnostics::to_diagnostics`].

use crate::{
    Diagnostic, ErrorCode, SQL0001, SQL0002, SQL0003, SQL0004, SQL0005, SQL0006, SQL0007,
};
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags::bitflags! {
    /// Bit set of conversion warning flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TimeWarnings: u8 {
        /// Input had trailing garbage or lost significant digits
        const TRUNCATED = 1;
        /// Value was beyond the type's range and got saturated
        const OUT_OF_RANGE = 1 << 1;
        /// Local time does not exist in the session time zone
        const INVALID_TIMESTAMP = 1 << 2;
        /// `0000-00-00` where zero dates are not allowed
        const ZERO_DATE = 1 << 3;
        /// Only insignificant digits were dropped (fraction of a DATE)
        const NOTE_TRUNCATED = 1 << 4;
        /// Zero month or day where they are not allowed
        const ZERO_IN_DATE = 1 << 5;
        /// Malformed input, no value produced
        const INVALID_VALUE = 1 << 6;
    }
}

impl TimeWarnings {
    pub const NONE: Self = Self::empty();

    /// Flags that are real warnings rather than notes
    pub const fn without_notes(self) -> Self {
        self.difference(Self::NOTE_TRUNCATED)
    }

    fn name(self) -> &'static str {
        if self == Self::TRUNCATED {
            "truncated"
        } else if self == Self::OUT_OF_RANGE {
            "out-of-range"
        } else if self == Self::INVALID_TIMESTAMP {
            "invalid-timestamp"
        } else if self == Self::ZERO_DATE {
            "zero-date"
        } else if self == Self::NOTE_TRUNCATED {
            "note-truncated"
        } else if self == Self::ZERO_IN_DATE {
            "zero-in-date"
        } else if self == Self::INVALID_VALUE {
            "invalid-value"
        } else {
            "unknown"
        }
    }

    /// Error code reported for a single flag
    pub fn code(self) -> ErrorCode {
        if self == Self::TRUNCATED {
            SQL0001
        } else if self == Self::OUT_OF_RANGE {
            SQL0002
        } else if self == Self::INVALID_TIMESTAMP {
            SQL0004
        } else if self == Self::ZERO_DATE {
            SQL0005
        } else if self == Self::ZERO_IN_DATE {
            SQL0006
        } else if self == Self::NOTE_TRUNCATED {
            SQL0007
        } else {
            SQL0003
        }
    }
}

impl Default for TimeWarnings {
    fn default() -> Self {
        Self::NONE
    }
}

impl Serialize for TimeWarnings {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TimeWarnings {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

impl fmt::Display for TimeWarnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for flag in self.iter() {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{}", flag.name())?;
            first = false;
        }
        Ok(())
    }
}

/// Warnings plus the context needed to report them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionDiagnostics {
    warnings: TimeWarnings,
    original: Option<String>,
    type_name: Option<String>,
    field: Option<String>,
}

impl ConversionDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics for a conversion into `type_name`
    pub fn for_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Remember the literal text the value came from
    pub fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original = Some(original.into());
        self
    }

    /// Remember the target column
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = Some(type_name.into());
    }

    pub fn set_original(&mut self, original: impl Into<String>) {
        self.original = Some(original.into());
    }

    pub fn warnings(&self) -> TimeWarnings {
        self.warnings
    }

    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn add(&mut self, warnings: TimeWarnings) {
        self.warnings |= warnings;
    }

    pub fn has(&self, flag: TimeWarnings) -> bool {
        self.warnings.contains(flag)
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn clear(&mut self) {
        self.warnings = TimeWarnings::NONE;
    }

    /// One diagnostic per flag, in flag order
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        let type_name = self.type_name.as_deref().unwrap_or("value");
        self.warnings
            .iter()
            .map(|flag| {
                let message = self.message_for(flag, type_name);
                let diag = if flag == TimeWarnings::NOTE_TRUNCATED {
                    Diagnostic::note(flag.code(), message)
                } else {
                    Diagnostic::warning(flag.code(), message)
                };
                match &self.field {
                    Some(field) => diag.with_field(field.clone()),
                    None => diag,
                }
            })
            .collect()
    }

    fn message_for(&self, flag: TimeWarnings, type_name: &str) -> String {
        let value = self
            .original
            .as_deref()
            .map(|text| format!(": '{text}'"))
            .unwrap_or_default();
        let column = self
            .field
            .as_deref()
            .map(|field| format!(" for column '{field}'"))
            .unwrap_or_default();

        if flag == TimeWarnings::OUT_OF_RANGE {
            match &self.field {
                Some(field) => format!("Out of range value for column '{field}'"),
                None => format!("Out of range {type_name} value{value}"),
            }
        } else if flag.intersects(TimeWarnings::TRUNCATED | TimeWarnings::NOTE_TRUNCATED) {
            format!("Truncated incorrect {type_name} value{value}{column}")
        } else if flag == TimeWarnings::INVALID_TIMESTAMP {
            format!("Invalid {type_name} value{value}{column}: time does not exist in the time zone")
        } else {
            format!("Incorrect {type_name} value{value}{column}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_combine() {
        let mut w = TimeWarnings::NONE;
        assert!(w.is_empty());
        w |= TimeWarnings::OUT_OF_RANGE;
        w |= TimeWarnings::NOTE_TRUNCATED;
        assert!(w.contains(TimeWarnings::OUT_OF_RANGE));
        assert!(!w.contains(TimeWarnings::TRUNCATED));
        assert_eq!(w.without_notes(), TimeWarnings::OUT_OF_RANGE);
        assert_eq!(w.to_string(), "out-of-range|note-truncated");
    }

    #[test]
    fn test_flag_values() {
        assert_eq!(TimeWarnings::TRUNCATED.bits(), 1);
        assert_eq!(TimeWarnings::OUT_OF_RANGE.bits(), 2);
        assert_eq!(TimeWarnings::INVALID_TIMESTAMP.bits(), 4);
        assert_eq!(TimeWarnings::ZERO_DATE.bits(), 8);
        assert_eq!(TimeWarnings::NOTE_TRUNCATED.bits(), 16);
        assert_eq!(TimeWarnings::ZERO_IN_DATE.bits(), 32);
        assert_eq!(TimeWarnings::INVALID_VALUE.bits(), 64);
    }

    #[test]
    fn test_serialized_as_bits() {
        let w = TimeWarnings::TRUNCATED | TimeWarnings::ZERO_DATE;
        assert_eq!(serde_json::to_string(&w).unwrap(), "9");
        assert_eq!(serde_json::from_str::<TimeWarnings>("9").unwrap(), w);
        assert_eq!(serde_json::from_str::<TimeWarnings>("255").unwrap(), TimeWarnings::all());
    }

    #[test]
    fn test_incorrect_value_message() {
        let mut diag = ConversionDiagnostics::for_type("datetime")
            .with_original("2023-02-30")
            .with_field("c1");
        diag.add(TimeWarnings::INVALID_VALUE);

        let out = diag.to_diagnostics();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Warning);
        assert_eq!(out[0].code, SQL0003);
        assert_eq!(
            out[0].message,
            "Incorrect datetime value: '2023-02-30' for column 'c1'"
        );
    }

    #[test]
    fn test_note_and_range_messages() {
        let mut diag = ConversionDiagnostics::for_type("date").with_original("20230115.5");
        diag.add(TimeWarnings::NOTE_TRUNCATED | TimeWarnings::OUT_OF_RANGE);

        let out = diag.to_diagnostics();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].message, "Out of range date value: '20230115.5'");
        assert_eq!(out[1].severity, Severity::Note);
        assert_eq!(out[1].message, "Truncated incorrect date value: '20230115.5'");
    }
}
