// src/generator/sanitize.rs
use serde_json::{Map, Value};

/// Marker substituted for anything the client left blank.
pub const MISSING: &str = "MISSING/НЕ ПРЕДОСТАВЛЕНО";

/// Blank-to-MISSING normalization, applied recursively.
///
/// - `null` and whitespace-only strings become `MISSING`
/// - strings are trimmed
/// - empty arrays become `[MISSING]`
/// - numbers and booleans pass through
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Null => Value::String(MISSING.to_string()),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                Value::String(MISSING.to_string())
            } else {
                Value::String(t.to_string())
            }
        }
        Value::Array(items) => {
            if items.is_empty() {
                Value::Array(vec![Value::String(MISSING.to_string())])
            } else {
                Value::Array(items.into_iter().map(sanitize_value).collect())
            }
        }
        Value::Object(map) => Value::Object(sanitize_map(map)),
        other => other,
    }
}

pub fn sanitize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(k, v)| (k, sanitize_value(v)))
        .collect()
}

/// Text form of an intake entry; absent keys read as `MISSING`.
pub fn field_text(intake: &Map<String, Value>, key: &str) -> String {
    match intake.get(key) {
        None => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
