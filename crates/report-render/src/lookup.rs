//! Dotted-path access into a report document with a fallback
//!
//! `safe_get(doc, "vehicleDamage.otherVehicleInfo.owner.firstName")` walks
//! one segment at a time; any absent or `null` segment yields `None`.
//! Numeric segments index into arrays (`"witnesses.0.phone"`).

use serde_json::Value;

pub fn safe_get<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

/// Display form of the value at `path`, or `default`
///
/// Strings come back as stored (an empty string is a value, not a miss),
/// booleans as `Yes`/`No`, arrays joined with `", "`. Objects have no text
/// form and fall back to `default`.
pub fn text_or(doc: &Value, path: &str, default: &str) -> String {
    safe_get(doc, path)
        .and_then(display)
        .unwrap_or_else(|| default.to_string())
}

pub fn display(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(display)
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}
