//! Aggregate command implementation

use anyhow::{Context, Result};
use serde_json::{Value, json};
use sqlscalar_types::{AggregationPurpose, TypeId, TypeRegistry};

/// Configuration for aggregate command
pub struct AggregateConfig {
    pub purpose: String,
    pub operands: Vec<String>,
}

/// Fold the operand types left to right, recording which step answered each pair
pub fn aggregate_report(registry: &TypeRegistry, config: &AggregateConfig) -> Result<Value> {
    let purpose: AggregationPurpose = config.purpose.parse()?;
    let (first, rest) = config
        .operands
        .split_first()
        .context("No operand types given")?;

    let mut current = registry.lookup(first)?.id();
    let mut steps = Vec::with_capacity(rest.len());
    for name in rest {
        let next = registry.lookup(name)?.id();
        let (result, source) = registry.aggregate_with_source(purpose, current, next)?;
        steps.push(json!({
            "left": name_of(registry, current),
            "right": name_of(registry, next),
            "result": name_of(registry, result),
            "source": source.to_string(),
        }));
        current = result;
    }

    Ok(json!({
        "purpose": purpose.name(),
        "operands": config.operands,
        "result": name_of(registry, current),
        "steps": steps,
    }))
}

fn name_of(registry: &TypeRegistry, id: TypeId) -> String {
    registry
        .get(id)
        .map(|ty| ty.name().to_string())
        .unwrap_or_else(|| id.to_string())
}
