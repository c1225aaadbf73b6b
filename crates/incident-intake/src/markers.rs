//! Lenient decoding of the serialized damage-marker list
//!
//! Losing annotations is preferable to losing the report, so nothing here
//! fails: bad JSON yields an empty list, bad members fall back to defaults.

use chrono::{DateTime, Utc};
use incident_types::{DamageKind, DamageMarker, DamageSeverity, MarkerPoint};
use serde_json::Value;
use tracing::warn;

/// Decode the `damageMarkers` payload
pub fn parse_markers(raw: Option<&str>, now: DateTime<Utc>) -> Vec<DamageMarker> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            warn!(kind = json_kind(&other), "Damage markers payload is not an array, ignoring");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse damage markers, ignoring");
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(_) => Some(marker_from_value(index, item, now)),
            other => {
                warn!(index, kind = json_kind(other), "Skipping damage marker that is not an object");
                None
            }
        })
        .collect()
}

fn marker_from_value(index: usize, item: &Value, now: DateTime<Utc>) -> DamageMarker {
    let coordinates = &item["coordinates"];
    let point = MarkerPoint::new(number(&coordinates["x"]), number(&coordinates["y"]));
    let clamped = point.clamped();
    if clamped != point {
        warn!(
            index,
            x = point.x,
            y = point.y,
            "Damage marker coordinates outside 0..=100, clamping"
        );
    }

    let kind = item["type"]
        .as_str()
        .and_then(DamageKind::parse_choice)
        .unwrap_or_default();
    let severity = item["severity"]
        .as_str()
        .and_then(DamageSeverity::parse_choice)
        .unwrap_or_default();
    let description = item["description"]
        .as_str()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    let timestamp = item["timestamp"]
        .as_str()
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(now);

    DamageMarker {
        coordinates: clamped,
        kind,
        description,
        severity,
        timestamp,
    }
}

/// Numbers, or strings holding numbers; anything else is 0
fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 10, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_malformed_json_is_empty() {
        assert!(parse_markers(Some("[{"), now()).is_empty());
        assert!(parse_markers(Some("{\"x\": 1}"), now()).is_empty());
        assert!(parse_markers(None, now()).is_empty());
    }

    #[test]
    fn test_defaults_for_absent_members() {
        let markers = parse_markers(Some("[{}]"), now());
        assert_eq!(markers.len(), 1);
        let marker = &markers[0];
        assert_eq!(marker.coordinates, MarkerPoint::new(0.0, 0.0));
        assert_eq!(marker.kind, DamageKind::Unknown);
        assert_eq!(marker.severity, DamageSeverity::Moderate);
        assert_eq!(marker.description, None);
        assert_eq!(marker.timestamp, now());
    }

    #[test]
    fn test_unknown_type_and_severity_fall_back() {
        let markers = parse_markers(
            Some(r#"[{"coordinates":{"x":5,"y":6},"type":"smudge","severity":"catastrophic"}]"#),
            now(),
        );
        assert_eq!(markers[0].kind, DamageKind::Unknown);
        assert_eq!(markers[0].severity, DamageSeverity::Moderate);
    }

    #[test]
    fn test_out_of_range_coordinates_are_clamped() {
        let markers = parse_markers(
            Some(r#"[{"coordinates":{"x":-3,"y":"140.5"},"type":"dent"}]"#),
            now(),
        );
        assert_eq!(markers[0].coordinates, MarkerPoint::new(0.0, 100.0));
    }

    #[test]
    fn test_input_timestamp_and_description_are_kept() {
        let markers = parse_markers(
            Some(r#"[{"type":"glass","description":" cracked windshield ","timestamp":"2024-04-09T08:00:00Z"}]"#),
            now(),
        );
        assert_eq!(markers[0].description.as_deref(), Some("cracked windshield"));
        assert_eq!(
            markers[0].timestamp,
            Utc.with_ymd_and_hms(2024, 4, 9, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_non_object_members_are_skipped() {
        let markers = parse_markers(Some(r#"[1, {"type":"dent"}, "x"]"#), now());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, DamageKind::Dent);
    }
}
