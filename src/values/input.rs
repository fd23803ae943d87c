//! Value input for create/update/assert bodies
//!
//! Sources, first match wins: `--values` (inline JSON or `@file`), `--set
//! key=value` pairs, then JSON piped on stdin.

use std::fs;
use std::io::{IsTerminal, Read};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use thiserror::Error;

pub type Values = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ValueError {
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },

    #[error("failed to read values file {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(std::io::Error),

    #[error("invalid --set '{0}': expected key=value")]
    InvalidSet(String),

    #[error("invalid reference '{0}': expected object:record_id")]
    InvalidReference(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("values must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error(
        "no values provided: use --values '<json>' (or --values @file.json), \
         --set key=value, or pipe a JSON object on stdin"
    )]
    NoValues,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_object(text: &str, origin: &str) -> Result<Values, ValueError> {
    let value: Value = serde_json::from_str(text).map_err(|source| ValueError::Json {
        origin: origin.to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValueError::NotAnObject(kind_of(&other))),
    }
}

/// Parse the `--values` argument: inline JSON, or `@path` to a JSON file
pub fn parse_values_arg(raw: &str) -> Result<Values, ValueError> {
    match raw.strip_prefix('@') {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| ValueError::File {
                path: path.to_string(),
                source,
            })?;
            parse_object(&text, path)
        }
        None => parse_object(raw, "--values"),
    }
}

/// Resolve values from flags, falling back to stdin when it is piped
pub fn resolve_values(values: Option<&str>, sets: &[String]) -> Result<Values, ValueError> {
    let stdin = std::io::stdin();
    let piped = if stdin.is_terminal() {
        None
    } else {
        Some(stdin.lock())
    };
    resolve_values_from(values, sets, piped)
}

/// Same as [`resolve_values`] with an explicit stdin reader
pub fn resolve_values_from<R: Read>(
    values: Option<&str>,
    sets: &[String],
    stdin: Option<R>,
) -> Result<Values, ValueError> {
    if let Some(raw) = values {
        return parse_values_arg(raw);
    }

    if !sets.is_empty() {
        return parse_sets(sets);
    }

    if let Some(mut reader) = stdin {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(ValueError::Stdin)?;
        if !text.trim().is_empty() {
            return parse_object(&text, "stdin");
        }
    }

    Ok(Values::new())
}

/// Reject an empty values object before a write goes out
pub fn require_values(values: Values) -> Result<Values, ValueError> {
    if values.is_empty() {
        return Err(ValueError::NoValues);
    }
    Ok(values)
}

/// Parse `key=value` pairs. Later pairs overwrite earlier ones.
pub fn parse_sets<S: AsRef<str>>(pairs: &[S]) -> Result<Values, ValueError> {
    let mut values = Values::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| ValueError::InvalidSet(pair.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ValueError::InvalidSet(pair.to_string()));
        }
        values.insert(key.to_string(), parse_set_value(raw));
    }
    Ok(values)
}

/// Coerce the right-hand side of one `--set`
pub fn parse_set_value(raw: &str) -> Value {
    let raw = raw.trim();

    if raw.starts_with('{') && raw.ends_with('}') {
        if let Ok(object @ Value::Object(_)) = serde_json::from_str::<Value>(raw) {
            return object;
        }
    }

    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        if let Ok(array @ Value::Array(_)) = serde_json::from_str::<Value>(raw) {
            return array;
        }
        if inner.trim().is_empty() {
            return Value::Array(Vec::new());
        }
        // shorthand: [a, 2, true]
        return Value::Array(inner.split(',').map(|p| coerce_scalar(p.trim())).collect());
    }

    coerce_scalar(raw)
}

/// Normalize a date or timestamp argument to an RFC 3339 UTC timestamp
pub fn parse_datetime(raw: &str) -> Result<String, ValueError> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
        .ok_or_else(|| ValueError::InvalidDate(raw.to_string()))?;

    Ok(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `-?\d+(\.\d+)?`
fn looks_numeric(raw: &str) -> bool {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    match unsigned.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(unsigned),
    }
}

fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    if looks_numeric(raw) {
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    Value::String(strip_quotes(raw).to_string())
}
