//! Types command implementation

use serde_json::{Value, json};
use sqlscalar_types::TypeRegistry;

/// One row per registered descriptor, in id order
pub fn types_report(registry: &TypeRegistry) -> Value {
    let rows: Vec<Value> = registry
        .types()
        .map(|ty| {
            json!({
                "id": ty.id().index(),
                "name": ty.name(),
                "family": ty.family().name(),
                "result": ty.result_category().to_string(),
                "comparison": ty.comparison_category().to_string(),
                "protocol": ty.protocol_kind().code(),
                "flags": ty.capabilities().to_string(),
                "external": ty.descriptor().is_external(),
            })
        })
        .collect();
    Value::Array(rows)
}
