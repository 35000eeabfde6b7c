//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Pretty,
    Table,
}

/// When to color output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal(),
    };
    colored::control::set_override(enabled);
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!("{}", format_success(&format!("Output written to {}", path.display())));
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format JSON value for output
pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Format value as table (if possible)
///
/// A list of objects becomes one row per object with the first object's
/// keys as columns; a single object becomes a key/value table.
pub fn format_as_table(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let Some(Value::Object(first)) = items.first() else {
                return (items.is_empty()).then(|| "(empty list)".to_string());
            };
            let keys: Vec<&String> = first.keys().collect();
            let mut builder = Builder::default();
            builder.push_record(keys.iter().map(|k| k.to_string()));
            for item in items {
                let Value::Object(obj) = item else {
                    return None;
                };
                builder.push_record(keys.iter().map(|k| obj.get(*k).map(format_value).unwrap_or_default()));
            }
            let mut table = builder.build();
            table.with(Style::modern());
            Some(table.to_string())
        }
        Value::Object(obj) => {
            #[derive(Tabled)]
            struct KeyValue {
                #[tabled(rename = "Key")]
                key: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let rows: Vec<KeyValue> = obj
                .iter()
                .map(|(k, v)| KeyValue {
                    key: k.clone(),
                    value: format_value(v),
                })
                .collect();

            Some(Table::new(rows).with(Style::modern()).to_string())
        }
        _ => None,
    }
}

/// Format a simple value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(obj) => format!("{{}} with {} fields", obj.len()),
    }
}

/// Render a report in the specified format
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(value, false),
        OutputFormat::Pretty => format_json(value, true),
        OutputFormat::Table => match format_as_table(value) {
            Some(table) => Ok(table),
            None => format_json(value, true),
        },
    }
}

/// Print output in the specified format
pub fn print_output(value: &Value, format: OutputFormat, output_file: Option<&Path>) -> Result<()> {
    let content = render(value, format)?;
    write_output(&content, output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_list_table_has_header_and_rows() {
        let value = json!([{ "name": "int", "family": "numeric" }, { "name": "date", "family": "temporal" }]);
        let table = format_as_table(&value).unwrap();
        assert!(table.contains("name"));
        assert!(table.contains("temporal"));
        assert_eq!(table.lines().filter(|l| l.contains("int") || l.contains("date")).count(), 2);
    }

    #[test]
    fn test_scalar_has_no_table() {
        assert_eq!(format_as_table(&json!(42)), None);
        assert_eq!(render(&json!(42), OutputFormat::Table).unwrap(), "42");
    }

    #[test]
    fn test_compact_json() {
        assert_eq!(render(&json!({ "a": [1, 2] }), OutputFormat::Json).unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_nested_list_flattened() {
        assert_eq!(format_value(&json!(["truncated", "out_of_range"])), "truncated, out_of_range");
    }
}
