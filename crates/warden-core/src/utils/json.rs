//! JSON coercion helpers
//!
//! Hook payloads, tool inputs and interactive answers all arrive as loosely
//! typed JSON. These helpers give the permission gate, the hook engine and the
//! hook factory one shared interpretation of "blank", "truthy" and "text".

use serde_json::{Map, Value};

/// Returns true for `null`, empty or whitespace-only strings, and empty
/// arrays/objects.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Borrow the string if the value is a string with non-whitespace content.
pub fn non_blank_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// Coerce a JSON primitive to a boolean.
///
/// Booleans map to themselves, the numbers 1 and 0 map to true and false, and
/// strings accept the usual spellings (`true`/`false`, `yes`/`no`, `on`/`off`,
/// `1`/`0`). Anything else yields `None`.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(_) => match coerce_i64(value) {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a JSON primitive to an integer.
///
/// Integral floats and numeric strings are accepted; booleans map to 0/1.
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Extract plain text from a message `content` value.
///
/// A string is returned as-is; an array of content parts is flattened by
/// joining the `text` of every part that has one.
pub fn text_content(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            if texts.is_empty() {
                None
            } else {
                Some(texts.join("\n"))
            }
        }
        _ => None,
    }
}

/// Return the first of `keys` that is present in `object` with a non-blank
/// value.
pub fn first_present_field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !is_blank(value))
}
