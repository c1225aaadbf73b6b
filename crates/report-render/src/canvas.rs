//! Page-addressable drawing model
//!
//! Layout records drawing commands per page in a top-left coordinate space
//! (y grows downwards, units are PDF points). Nothing is encoded until the
//! whole document exists, so later passes can revisit any page.

use crate::metrics::Font;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GRAY: Color = Color::rgb(0.85, 0.85, 0.85);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(hex.get(i..i + 2)?, 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(f32),
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    CurveTo {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x: f32,
        y: f32,
    },
    ClosePath,
    Fill,
    Stroke,
    FillStroke,
    DrawRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// `y` is the text baseline
    DrawString {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    /// Every string drawn on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            Command::DrawString { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagedDocument {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl PagedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Cubic Bezier factor for quarter circles
const KAPPA: f32 = 0.552_284_8;

pub struct Canvas {
    width: f32,
    height: f32,
    pages: Vec<Page>,
    current: Page,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: Vec::new(),
            current: Page::default(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Nothing drawn on the current page yet
    pub fn page_is_blank(&self) -> bool {
        self.current.commands.is_empty()
    }

    pub fn push(&mut self, command: Command) {
        self.current.commands.push(command);
    }

    /// Close the current page and start a new one
    pub fn show_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
    }

    pub fn finish(mut self) -> PagedDocument {
        if !self.current.commands.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        PagedDocument {
            width: self.width,
            height: self.height,
            pages: self.pages,
        }
    }

    pub fn text(&mut self, x: f32, baseline: f32, text: impl Into<String>, font: Font, size: f32) {
        self.push(Command::DrawString {
            x,
            y: baseline,
            text: text.into(),
            font,
            size,
        });
    }

    pub fn fill_color(&mut self, color: Color) {
        self.push(Command::SetFillColor(color));
    }

    pub fn stroke_color(&mut self, color: Color) {
        self.push(Command::SetStrokeColor(color));
    }

    pub fn line_width(&mut self, width: f32) {
        self.push(Command::SetLineWidth(width));
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(Command::DrawRect {
            x,
            y,
            width,
            height,
        });
    }

    /// Closed polygon path through `points`
    pub fn polygon(&mut self, points: &[(f32, f32)]) {
        let Some(&(x, y)) = points.first() else {
            return;
        };
        self.push(Command::MoveTo { x, y });
        for &(x, y) in &points[1..] {
            self.push(Command::LineTo { x, y });
        }
        self.push(Command::ClosePath);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.push(Command::MoveTo {
            x: from.0,
            y: from.1,
        });
        self.push(Command::LineTo { x: to.0, y: to.1 });
    }

    /// Circle path approximated by four Bezier arcs
    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        let k = r * KAPPA;
        self.push(Command::MoveTo { x: cx + r, y: cy });
        self.push(Command::CurveTo {
            x1: cx + r,
            y1: cy + k,
            x2: cx + k,
            y2: cy + r,
            x: cx,
            y: cy + r,
        });
        self.push(Command::CurveTo {
            x1: cx - k,
            y1: cy + r,
            x2: cx - r,
            y2: cy + k,
            x: cx - r,
            y: cy,
        });
        self.push(Command::CurveTo {
            x1: cx - r,
            y1: cy - k,
            x2: cx - k,
            y2: cy - r,
            x: cx,
            y: cy - r,
        });
        self.push(Command::CurveTo {
            x1: cx + k,
            y1: cy - r,
            x2: cx + r,
            y2: cy - k,
            x: cx + r,
            y: cy,
        });
        self.push(Command::ClosePath);
    }

    /// Rectangle path with corner radius `r`
    pub fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, r: f32) {
        let r = r.min(width / 2.0).min(height / 2.0);
        let k = r * KAPPA;
        let (right, bottom) = (x + width, y + height);
        self.push(Command::MoveTo { x: x + r, y });
        self.push(Command::LineTo { x: right - r, y });
        self.push(Command::CurveTo {
            x1: right - r + k,
            y1: y,
            x2: right,
            y2: y + r - k,
            x: right,
            y: y + r,
        });
        self.push(Command::LineTo {
            x: right,
            y: bottom - r,
        });
        self.push(Command::CurveTo {
            x1: right,
            y1: bottom - r + k,
            x2: right - r + k,
            y2: bottom,
            x: right - r,
            y: bottom,
        });
        self.push(Command::LineTo { x: x + r, y: bottom });
        self.push(Command::CurveTo {
            x1: x + r - k,
            y1: bottom,
            x2: x,
            y2: bottom - r + k,
            x,
            y: bottom - r,
        });
        self.push(Command::LineTo { x, y: y + r });
        self.push(Command::CurveTo {
            x1: x,
            y1: y + r - k,
            x2: x + r - k,
            y2: y,
            x: x + r,
            y,
        });
        self.push(Command::ClosePath);
    }

    pub fn fill(&mut self) {
        self.push(Command::Fill);
    }

    pub fn stroke(&mut self) {
        self.push(Command::Stroke);
    }

    pub fn fill_stroke(&mut self) {
        self.push(Command::FillStroke);
    }

    pub fn save(&mut self) {
        self.push(Command::SaveState);
    }

    pub fn restore(&mut self) {
        self.push(Command::RestoreState);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(Color::from_hex("#000000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("FF0000"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
    }

    #[test]
    fn test_show_page_and_finish() {
        let mut canvas = Canvas::new(595.0, 842.0);
        canvas.text(50.0, 60.0, "one", Font::Regular, 12.0);
        canvas.show_page();
        canvas.text(50.0, 60.0, "two", Font::Regular, 12.0);
        let doc = canvas.finish();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[1].texts().collect::<Vec<_>>(), vec!["two"]);
    }

    #[test]
    fn test_blank_document_still_has_a_page() {
        assert_eq!(Canvas::new(10.0, 10.0).finish().page_count(), 1);
    }

    #[test]
    fn test_trailing_blank_page_is_dropped() {
        let mut canvas = Canvas::new(10.0, 10.0);
        canvas.rect(0.0, 0.0, 1.0, 1.0);
        canvas.show_page();
        assert_eq!(canvas.finish().page_count(), 1);
    }

    #[test]
    fn test_circle_is_closed_path() {
        let mut canvas = Canvas::new(10.0, 10.0);
        canvas.circle(5.0, 5.0, 2.0);
        let doc = canvas.finish();
        let commands = &doc.pages[0].commands;
        assert_eq!(commands.first(), Some(&Command::MoveTo { x: 7.0, y: 5.0 }));
        assert_eq!(commands.last(), Some(&Command::ClosePath));
        assert_eq!(commands.len(), 6);
    }
}
