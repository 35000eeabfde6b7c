//! Convert command implementation

use anyhow::{Result, bail};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlscalar_diagnostics::{ConversionDiagnostics, Diagnostic};
use sqlscalar_temporal::{DefaultTextParser, RoundMode, Sec6, Sec9, Temporal, TemporalOptions};
use std::str::FromStr;

/// How the literal is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConvertAs {
    /// Number as `[-]HHHMMSS` TIME or `YYYYMMDD[HHMMSS]` DATETIME
    DatetimeOrTime,
    /// Number as `YYYYMMDD` DATE or `YYYYMMDDHHMMSS` DATETIME
    DatetimeOrDate,
    /// Number of seconds as TIME
    Seconds,
    /// Text literal
    Text,
}

impl ConvertAs {
    fn name(self) -> &'static str {
        match self {
            ConvertAs::DatetimeOrTime => "datetime-or-time",
            ConvertAs::DatetimeOrDate => "datetime-or-date",
            ConvertAs::Seconds => "seconds",
            ConvertAs::Text => "text",
        }
    }

    fn target(self) -> &'static str {
        match self {
            ConvertAs::Seconds => "time",
            _ => "datetime",
        }
    }
}

/// Configuration for convert command
pub struct ConvertConfig {
    pub literal: String,
    pub convert_as: ConvertAs,
    pub round: Option<RoundMode>,
    pub decimals: Option<u8>,
    pub options: TemporalOptions,
}

/// Converted value plus what happened on the way
pub struct ConvertReport {
    pub value: Value,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn convert(config: &ConvertConfig) -> Result<ConvertReport> {
    let mut opts = config.options;
    if let Some(mode) = config.round {
        opts = opts.with_round_mode(mode);
    }
    if let Some(decimals) = config.decimals {
        opts = opts.with_decimals(decimals);
    }

    let mut diag = ConversionDiagnostics::for_type(config.convert_as.target()).with_original(config.literal.as_str());
    let value = match config.convert_as {
        ConvertAs::DatetimeOrTime => parse_number(&config.literal)?.to_datetime_or_time(&opts, &mut diag),
        ConvertAs::DatetimeOrDate => parse_number(&config.literal)?.to_datetime_or_date(&opts, &mut diag),
        ConvertAs::Seconds => Temporal::Time(parse_number(&config.literal)?.sec_to_time(&opts, &mut diag)),
        ConvertAs::Text => Temporal::from_text(&config.literal, &DefaultTextParser, &opts, &mut diag),
    };

    let text = match config.decimals {
        Some(dec) => value.to_string_with(dec),
        None => (!value.is_none()).then(|| value.to_string()),
    };
    let diagnostics = diag.to_diagnostics();
    let report = json!({
        "input": config.literal,
        "as": config.convert_as.name(),
        "kind": value.kind().map(|kind| kind.to_string()),
        "value": text,
        "packed": value.to_packed(),
        "number": value.to_longlong(),
        "double": value.to_double(),
        "decimal": value.to_decimal().map(|d| d.to_string()),
        "warnings": diag.warnings().iter().map(|flag| flag.to_string()).collect::<Vec<_>>(),
        "diagnostics": diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>(),
    });
    Ok(ConvertReport {
        value: report,
        diagnostics,
    })
}

/// Exact decimal when it fits, otherwise a double
fn parse_number(literal: &str) -> Result<Sec9> {
    let trimmed = literal.trim();
    if let Ok(value) = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        return Ok(Sec9::from_decimal(value));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Sec9::from(Sec6::from_f64(value))),
        _ => bail!("'{literal}' is not a number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("123.5").unwrap().sec6().usec(), 500_000);
        assert_eq!(parse_number("1e3").unwrap().sec6().sec(), 1000);
        assert!(parse_number("12:30").is_err());
    }

    #[test]
    fn test_oversized_number_saturates() {
        let sec = parse_number("1e40").unwrap();
        assert!(sec.sec6().truncated());
    }
}
