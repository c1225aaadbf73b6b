//! Vehicle damage diagram for the paginated artifact
//!
//! Everything is drawn relative to a [`Region`]; marker glyphs are placed
//! with [`map_to_region`] so they land where the intake diagram recorded them.

use incident_types::{DamageKind, DamageMarker};

use crate::canvas::{Canvas, Color};
use crate::geometry::{map_to_region, Region};
use crate::metrics::{text_width, Font};
use crate::palette::damage_color;

const GLYPH_SIZE: f32 = 6.0;
const WHEEL_RADIUS: f32 = 8.0;

pub const LEGEND_TITLE: &str = "Damage Type Legend:";
const LEGEND_COLUMNS: usize = 3;
const LEGEND_COLUMN_WIDTH: f32 = 120.0;
const LEGEND_ROW_HEIGHT: f32 = 20.0;

/// Room needed above the region for the "Front" label
pub const LABEL_CLEARANCE: f32 = 14.0;

/// Top view and side view outlines with wheels
pub fn draw_vehicle(canvas: &mut Canvas, region: &Region) {
    let (ox, oy) = (region.origin_x as f32, region.origin_y as f32);
    let (w, h) = (region.width as f32, region.height as f32);

    canvas.save();
    canvas.line_width(1.0);
    canvas.stroke_color(Color::GRAY);
    canvas.fill_color(Color::LIGHT_GRAY);
    canvas.rounded_rect(ox + 0.1 * w, oy, 0.8 * w, 0.4 * h, 5.0);
    canvas.fill_stroke();
    canvas.rect(ox + 0.1 * w, oy + 0.5 * h, 0.8 * w, 0.2 * h);
    canvas.fill_stroke();

    canvas.fill_color(Color::GRAY);
    let wheels = [
        (0.2, 0.1),
        (0.2, 0.3),
        (0.8, 0.1),
        (0.8, 0.3),
        (0.25, 0.65),
        (0.75, 0.65),
    ];
    for (fx, fy) in wheels {
        canvas.circle(ox + fx * w, oy + fy * h, WHEEL_RADIUS);
        canvas.fill();
    }

    canvas.fill_color(Color::BLACK);
    centered_label(canvas, "Front", ox + w / 2.0, oy - 4.0);
    centered_label(canvas, "Top View", ox + w / 2.0, oy + 0.45 * h + 4.0);
    centered_label(canvas, "Side View", ox + w / 2.0, oy + 0.75 * h + 8.0);
    canvas.restore();
}

fn centered_label(canvas: &mut Canvas, text: &str, cx: f32, baseline: f32) {
    let x = cx - text_width(text, Font::Regular, 10.0) / 2.0;
    canvas.text(x, baseline, text, Font::Regular, 10.0);
}

/// Numbered glyph for one marker; `number` is 1-based
pub fn draw_marker(canvas: &mut Canvas, number: usize, marker: &DamageMarker, region: &Region) {
    let (x, y) = map_to_region(marker.coordinates, region);
    let (x, y) = (x as f32, y as f32);
    draw_glyph(canvas, marker.kind, x, y, GLYPH_SIZE);
    canvas.save();
    canvas.fill_color(Color::BLACK);
    canvas.text(
        x + GLYPH_SIZE + 2.0,
        y - GLYPH_SIZE,
        number.to_string(),
        Font::Bold,
        8.0,
    );
    canvas.restore();
}

/// Shape and colour for a damage kind, centred on `(cx, cy)`
pub fn draw_glyph(canvas: &mut Canvas, kind: DamageKind, cx: f32, cy: f32, size: f32) {
    let color = damage_color(kind);
    canvas.save();
    canvas.fill_color(color);
    canvas.stroke_color(color);
    canvas.line_width(1.5);
    match kind {
        DamageKind::Dent => {
            canvas.circle(cx, cy, size);
            canvas.fill();
        }
        DamageKind::Scratch => {
            canvas.rect(cx - size, cy - size / 3.0, size * 2.0, size * 2.0 / 3.0);
            canvas.fill();
        }
        DamageKind::Crack => {
            for i in 0..4 {
                let angle = std::f32::consts::FRAC_PI_4 * i as f32;
                let (dx, dy) = (size * angle.cos(), size * angle.sin());
                canvas.line((cx - dx, cy - dy), (cx + dx, cy + dy));
            }
            canvas.stroke();
        }
        DamageKind::Break => {
            canvas.rect(cx - size, cy - size, size * 2.0, size * 2.0);
            canvas.fill();
        }
        DamageKind::Missing => {
            canvas.line((cx - size, cy - size), (cx + size, cy + size));
            canvas.line((cx - size, cy + size), (cx + size, cy - size));
            canvas.stroke();
        }
        DamageKind::Paint => {
            canvas.polygon(&[
                (cx, cy - size),
                (cx + size, cy),
                (cx, cy + size),
                (cx - size, cy),
            ]);
            canvas.fill();
        }
        DamageKind::Glass => {
            canvas.polygon(&[
                (cx, cy - size),
                (cx + size, cy + size),
                (cx - size, cy + size),
            ]);
            canvas.stroke();
        }
        DamageKind::Mechanical => {
            canvas.polygon(&hexagon(cx, cy, size));
            canvas.stroke();
        }
        DamageKind::Other => {
            canvas.polygon(&hexagon(cx, cy, size));
            canvas.fill();
        }
        DamageKind::Unknown => {
            canvas.circle(cx, cy, size);
            canvas.stroke();
        }
    }
    canvas.restore();
}

fn hexagon(cx: f32, cy: f32, size: f32) -> Vec<(f32, f32)> {
    (0..6)
        .map(|i| {
            let angle = std::f32::consts::FRAC_PI_3 * i as f32;
            (cx + size * angle.cos(), cy + size * angle.sin())
        })
        .collect()
}

/// Height the legend occupies
pub fn legend_height() -> f32 {
    let rows = DamageKind::SELECTABLE.len().div_ceil(LEGEND_COLUMNS);
    LEGEND_ROW_HEIGHT * (rows as f32 + 1.0)
}

/// Legend of every selectable kind, top-left at `(x, top)`
pub fn draw_legend(canvas: &mut Canvas, x: f32, top: f32) {
    canvas.text(x, top + 12.0, LEGEND_TITLE, Font::Bold, 12.0);
    for (i, kind) in DamageKind::SELECTABLE.iter().enumerate() {
        let column = (i % LEGEND_COLUMNS) as f32;
        let row = (i / LEGEND_COLUMNS) as f32;
        let left = x + column * LEGEND_COLUMN_WIDTH;
        let middle = top + LEGEND_ROW_HEIGHT * (row + 1.0) + LEGEND_ROW_HEIGHT / 2.0;
        draw_glyph(canvas, *kind, left + 5.0, middle, 5.0);
        canvas.text(left + 15.0, middle + 4.0, kind.label(), Font::Regular, 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use chrono::Utc;
    use incident_types::{DamageSeverity, MarkerPoint};

    fn marker(kind: DamageKind, x: f64, y: f64) -> DamageMarker {
        DamageMarker {
            coordinates: MarkerPoint::new(x, y),
            kind,
            description: None,
            severity: DamageSeverity::Minor,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_marker_number_sits_beside_mapped_point() {
        let region = Region::new(100.0, 100.0, 400.0, 300.0);
        let mut canvas = Canvas::new(595.0, 842.0);
        draw_marker(&mut canvas, 3, &marker(DamageKind::Dent, 50.0, 50.0), &region);
        let doc = canvas.finish();
        let label = doc.pages[0].commands.iter().find_map(|c| match c {
            Command::DrawString { x, y, text, .. } => Some((*x, *y, text.clone())),
            _ => None,
        });
        assert_eq!(label, Some((308.0, 244.0, "3".to_string())));
    }

    #[test]
    fn test_glyph_uses_kind_colour() {
        let mut canvas = Canvas::new(100.0, 100.0);
        draw_glyph(&mut canvas, DamageKind::Glass, 10.0, 10.0, 5.0);
        let doc = canvas.finish();
        assert!(doc.pages[0]
            .commands
            .contains(&Command::SetStrokeColor(Color::rgb(0.0, 1.0, 1.0))));
    }

    #[test]
    fn test_every_kind_draws_something() {
        for kind in DamageKind::ALL {
            let mut canvas = Canvas::new(100.0, 100.0);
            draw_glyph(&mut canvas, *kind, 50.0, 50.0, 5.0);
            let doc = canvas.finish();
            let painted = doc.pages[0]
                .commands
                .iter()
                .any(|c| matches!(c, Command::Fill | Command::Stroke));
            assert!(painted, "{kind:?}");
        }
    }

    #[test]
    fn test_legend_lists_selectable_kinds() {
        let mut canvas = Canvas::new(595.0, 842.0);
        draw_legend(&mut canvas, 50.0, 100.0);
        let doc = canvas.finish();
        let texts: Vec<&str> = doc.pages[0].texts().collect();
        assert_eq!(texts[0], LEGEND_TITLE);
        assert_eq!(texts.len(), 10);
        assert!(texts.contains(&"Mechanical"));
        assert!(!texts.contains(&"Unknown"));
        assert_eq!(legend_height(), 80.0);
    }

    #[test]
    fn test_vehicle_labels() {
        let mut canvas = Canvas::new(595.0, 842.0);
        draw_vehicle(&mut canvas, &Region::new(100.0, 100.0, 400.0, 300.0));
        let doc = canvas.finish();
        let texts: Vec<&str> = doc.pages[0].texts().collect();
        assert_eq!(texts, vec!["Front", "Top View", "Side View"]);
    }
}
