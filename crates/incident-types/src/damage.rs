//! Damage markers placed on the rental-vehicle diagram

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::choices::{DamageKind, DamageSeverity};

/// Upper bound of a marker coordinate (percent of diagram width/height)
pub const COORDINATE_MAX: f64 = 100.0;

/// Marker position as a percentage of the diagram's width (`x`) and height (`y`)
///
/// Origin is the top-left corner of the diagram image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerPoint {
    pub x: f64,
    pub y: f64,
}

impl MarkerPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both axes inside `0..=100`
    pub fn in_range(&self) -> bool {
        (0.0..=COORDINATE_MAX).contains(&self.x) && (0.0..=COORDINATE_MAX).contains(&self.y)
    }

    /// Pull both axes into `0..=100`; NaN and infinities become 0
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_axis(self.x),
            y: clamp_axis(self.y),
        }
    }
}

fn clamp_axis(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, COORDINATE_MAX)
}

/// One annotated point of damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageMarker {
    pub coordinates: MarkerPoint,
    #[serde(rename = "type")]
    pub kind: DamageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: DamageSeverity,
    pub timestamp: DateTime<Utc>,
}

impl DamageMarker {
    /// Area of the vehicle the marker falls in
    pub fn zone(&self) -> &'static str {
        location_zone(self.coordinates.x, self.coordinates.y)
    }
}

/// Name the diagram area a percentage coordinate falls into
///
/// Checks run in priority order: the outer 20% columns win over the outer
/// 20% rows, which win over the inner side bands.
pub fn location_zone(x: f64, y: f64) -> &'static str {
    if x < 20.0 {
        "Front Left"
    } else if x > 80.0 {
        "Front Right"
    } else if y < 20.0 {
        "Front"
    } else if y > 80.0 {
        "Rear"
    } else if x < 40.0 {
        "Left Side"
    } else if x > 60.0 {
        "Right Side"
    } else {
        "Center"
    }
}
