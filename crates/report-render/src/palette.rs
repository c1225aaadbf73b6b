//! Colour and symbol coding of damage kinds, shared by both renderers

use incident_types::DamageKind;

use crate::canvas::Color;

/// `#RRGGBB` colour of a marker
pub fn damage_color_hex(kind: DamageKind) -> &'static str {
    match kind {
        DamageKind::Dent => "#FF0000",
        DamageKind::Scratch => "#FFA500",
        DamageKind::Crack => "#FF00FF",
        DamageKind::Break => "#800000",
        DamageKind::Missing => "#000000",
        DamageKind::Paint => "#0000FF",
        DamageKind::Glass => "#00FFFF",
        DamageKind::Mechanical => "#008000",
        DamageKind::Other | DamageKind::Unknown => "#808080",
    }
}

pub fn damage_color(kind: DamageKind) -> Color {
    Color::from_hex(damage_color_hex(kind)).unwrap_or(Color::GRAY)
}

/// Text symbol used where a vector glyph is not available (HTML legend)
pub fn damage_symbol(kind: DamageKind) -> &'static str {
    match kind {
        DamageKind::Dent => "●",
        DamageKind::Scratch => "▬",
        DamageKind::Crack => "✱",
        DamageKind::Break => "■",
        DamageKind::Missing => "✕",
        DamageKind::Paint => "◆",
        DamageKind::Glass => "△",
        DamageKind::Mechanical => "⬡",
        DamageKind::Other => "⬢",
        DamageKind::Unknown => "○",
    }
}
