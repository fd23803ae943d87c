//! API response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned with non-2xx responses
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status_code: Option<u16>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Response of cursor-paginated endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct CursorEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<CursorInfo>,
}

/// Cursor pagination info
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CursorInfo {
    pub next_cursor: Option<String>,
}

/// Strip the `{ "data": ... }` envelope. Bodies without one pass through.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
