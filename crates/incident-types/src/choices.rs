//! Closed value sets used by the incident report
//!
//! Every choice serializes as the lowercase wire string the intake form posts
//! (`"snow_covered"`, `"under_review"`, ...), so persisted documents and the
//! dotted-path accessor used by the renderers see the same spelling.

use serde::{Deserialize, Serialize};

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// All members in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire spelling
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Match a submitted value against the set (case-insensitive, trimmed)
            pub fn parse_choice(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str().eq_ignore_ascii_case(value))
            }

            /// Human label: `"dark_unlit"` becomes `"Dark Unlit"`
            pub fn label(self) -> String {
                humanize(self.as_str())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// Answer to a yes/no radio group
    YesNo { Yes => "yes", No => "no" }
}

choice_enum! {
    /// Lifecycle of a stored report
    ReportStatus {
        Draft => "draft",
        Submitted => "submitted",
        UnderReview => "under_review",
        Approved => "approved",
        Rejected => "rejected",
    }
}

choice_enum! {
    VehicleUse { Work => "work", Personal => "personal" }
}

choice_enum! {
    Weather {
        Clear => "clear",
        Cloudy => "cloudy",
        Rain => "rain",
        Snow => "snow",
        Fog => "fog",
        Other => "other",
    }
}

choice_enum! {
    /// Direction the rental vehicle was travelling
    Direction {
        North => "north",
        South => "south",
        East => "east",
        West => "west",
        Northeast => "northeast",
        Northwest => "northwest",
        Southeast => "southeast",
        Southwest => "southwest",
    }
}

choice_enum! {
    TrafficControl {
        TrafficLight => "traffic_light",
        StopSign => "stop_sign",
        YieldSign => "yield_sign",
        Crosswalk => "crosswalk",
        SchoolZone => "school_zone",
        ConstructionZone => "construction_zone",
        None => "none",
    }
}

choice_enum! {
    TrafficControlStatus {
        Working => "working",
        Malfunctioning => "malfunctioning",
        NotApplicable => "not_applicable",
    }
}

choice_enum! {
    RoadCondition {
        Dry => "dry",
        Wet => "wet",
        Icy => "icy",
        SnowCovered => "snow_covered",
        Gravel => "gravel",
        Construction => "construction",
        Other => "other",
    }
}

choice_enum! {
    Lighting {
        Daylight => "daylight",
        Dawn => "dawn",
        Dusk => "dusk",
        DarkLit => "dark_lit",
        DarkUnlit => "dark_unlit",
    }
}

choice_enum! {
    /// Kind of damage recorded by a diagram marker
    ///
    /// `Unknown` is never offered by the form; it stands in for a marker whose
    /// type was missing or unrecognised.
    DamageKind {
        Dent => "dent",
        Scratch => "scratch",
        Crack => "crack",
        Break => "break",
        Missing => "missing",
        Paint => "paint",
        Glass => "glass",
        Mechanical => "mechanical",
        Other => "other",
        Unknown => "unknown",
    }
}

choice_enum! {
    DamageSeverity {
        Minor => "minor",
        Moderate => "moderate",
        Severe => "severe",
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Draft
    }
}

impl Default for DamageSeverity {
    fn default() -> Self {
        DamageSeverity::Moderate
    }
}

impl Default for YesNo {
    fn default() -> Self {
        YesNo::No
    }
}

impl Default for DamageKind {
    fn default() -> Self {
        DamageKind::Unknown
    }
}

impl DamageKind {
    /// The nine kinds a user can pick, in legend order
    pub const SELECTABLE: [DamageKind; 9] = [
        DamageKind::Dent,
        DamageKind::Scratch,
        DamageKind::Crack,
        DamageKind::Break,
        DamageKind::Missing,
        DamageKind::Paint,
        DamageKind::Glass,
        DamageKind::Mechanical,
        DamageKind::Other,
    ];
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

/// Turn a snake_case wire value into title-cased words
pub fn humanize(raw: &str) -> String {
    raw.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
