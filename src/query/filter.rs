//! Filter shorthand parser
//!
//! Turns `attribute<op>value` expressions into fragments of the API's
//! filter language and combines several fragments under `$and`.

use serde_json::{json, Map, Number, Value};
use thiserror::Error;

/// Grammar shown to the user when an expression can't be parsed
const GRAMMAR: &str = "attribute<op>value with op one of = != ~ !~ ^ > >= < <=, or attribute?";

#[derive(Debug, Error, PartialEq)]
#[error("invalid filter '{expr}': expected {}", GRAMMAR)]
pub struct FilterSyntaxError {
    pub expr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Contains,
    NotContains,
    StartsWith,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Operator tokens, most specific first.
///
/// `>=`, `<=`, `!=` and `!~` have shorter tokens as prefixes or suffixes
/// (`>`, `<`, `=`, `~`); they must be tried first at any given position.
const OPERATORS: &[(&str, Operator)] = &[
    (">=", Operator::Gte),
    ("<=", Operator::Lte),
    ("!=", Operator::NotEq),
    (">", Operator::Gt),
    ("<", Operator::Lt),
    ("!~", Operator::NotContains),
    ("~", Operator::Contains),
    ("^", Operator::StartsWith),
    ("=", Operator::Eq),
];

impl Operator {
    fn is_numeric(self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }
}

/// Find the earliest operator in `expr`. Returns (byte offset, token, operator).
fn find_operator(expr: &str) -> Option<(usize, &'static str, Operator)> {
    for (pos, _) in expr.char_indices() {
        let rest = &expr[pos..];
        if let Some((token, op)) = OPERATORS.iter().find(|(t, _)| rest.starts_with(*t)) {
            return Some((pos, *token, *op));
        }
    }
    None
}

fn coerce(raw: &str, op: Operator) -> Value {
    if op.is_numeric() {
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

fn single(attribute: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(attribute.to_string(), value);
    Value::Object(map)
}

/// Parse one filter expression into a filter fragment
pub fn parse_one(expr: &str) -> Result<Value, FilterSyntaxError> {
    let err = || FilterSyntaxError {
        expr: expr.to_string(),
    };
    let trimmed = expr.trim();

    // `attr?` only when the rest holds no other operator (`name~why?` is a contains)
    if let Some(attribute) = trimmed.strip_suffix('?') {
        if find_operator(attribute).is_none() {
            let attribute = attribute.trim();
            if attribute.is_empty() {
                return Err(err());
            }
            return Ok(single(attribute, json!({ "$not_empty": true })));
        }
    }

    let (pos, token, op) = find_operator(trimmed).ok_or_else(err)?;
    let attribute = trimmed[..pos].trim();
    if attribute.is_empty() {
        return Err(err());
    }
    let value = coerce(trimmed[pos + token.len()..].trim(), op);

    let fragment = match op {
        Operator::Eq => single(attribute, value),
        Operator::NotEq => json!({ "$not": single(attribute, value) }),
        Operator::Contains => single(attribute, json!({ "$contains": value })),
        Operator::NotContains => {
            json!({ "$not": single(attribute, json!({ "$contains": value })) })
        }
        Operator::StartsWith => single(attribute, json!({ "$starts_with": value })),
        Operator::Gt => single(attribute, json!({ "$gt": value })),
        Operator::Gte => single(attribute, json!({ "$gte": value })),
        Operator::Lt => single(attribute, json!({ "$lt": value })),
        Operator::Lte => single(attribute, json!({ "$lte": value })),
    };

    Ok(fragment)
}

/// AND together fragments. A single fragment is returned as-is.
pub fn combine(mut fragments: Vec<Value>) -> Value {
    match fragments.len() {
        0 => Value::Object(Map::new()),
        1 => fragments.remove(0),
        _ => json!({ "$and": fragments }),
    }
}

/// Parse every expression and combine the results
pub fn parse_all<S: AsRef<str>>(exprs: &[S]) -> Result<Value, FilterSyntaxError> {
    let fragments = exprs
        .iter()
        .map(|e| parse_one(e.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(combine(fragments))
}
