//! SQL temporal values
//!
//! This crate provides the canonical DATE, TIME, DATETIME and TIMESTAMP value
//! types together with:
//! - Fixed-point seconds ([`Sec6`], [`Sec9`]) built from integer, floating
//!   point and decimal literals
//! - Number and text conversion with deterministic truncation, rounding and
//!   saturation
//! - The packed integer form shared with storage
//! - Cross-kind conversion (DATETIME to TIME modes, TIME to DATETIME mixing)
//!
//! Values are immutable and always structurally valid. Conversions never
//! fail loudly: they return a value or no value, and record what happened in
//! a [`ConversionDiagnostics`].

pub mod calendar;
pub mod date;
pub mod datetime;
pub mod limits;
pub mod options;
mod frac;
mod packed;
pub mod sec;
pub mod session;
pub mod temporal;
pub mod text;
pub mod time;
pub mod timestamp;

pub use date::Date;
pub use datetime::Datetime;
pub use options::{DateMode, DatetimeToTimeMode, RoundMode, TemporalOptions};
pub use sec::{FixedPointSeconds, Sec6, Sec9};
pub use session::{ChronoZone, FixedClock, LocalToUnix, SessionClock, SessionTimeZone, SystemClock};
pub use temporal::{Temporal, TemporalKind};
pub use text::{DefaultTextParser, RawFields, RawTemporal, TemporalTextParser};
pub use time::Time;
pub use timestamp::Timestamp;

pub use sqlscalar_diagnostics::{ConversionDiagnostics, TimeWarnings};
