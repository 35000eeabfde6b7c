//! CLI functionality for the sqlscalar tool
//!
//! Each command builds a JSON report that [`output`] renders:
//! - `types`: registered descriptors
//! - `aggregate`: folding operand types for a purpose
//! - `convert`: literal to temporal value conversion

pub mod aggregate;
pub mod convert;
pub mod output;
pub mod types;

use anyhow::{Context, Result};
use sqlscalar_temporal::TemporalOptions;
use std::fs;
use std::path::Path;

/// Load conversion options from a JSON file, or the defaults
pub fn load_options(path: Option<&Path>) -> Result<TemporalOptions> {
    let Some(path) = path else {
        return Ok(TemporalOptions::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file: {}", path.display()))?;
    TemporalOptions::from_json(&json).with_context(|| format!("Invalid options file: {}", path.display()))
}
