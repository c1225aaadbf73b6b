//! Second layout pass: page numbering
//!
//! Runs over a finished [`PagedDocument`], so every footer sees the final
//! page count.

use crate::canvas::{Color, Command, PagedDocument};
use crate::config::FooterConfig;
use crate::metrics::{text_width, Font};

/// Stamp the footer text centred in the bottom margin of every page
pub fn stamp_page_numbers(doc: &mut PagedDocument, footer: &FooterConfig, margin: f32) {
    let total = doc.page_count();
    let baseline = doc.height - margin / 2.0;
    let width = doc.width;
    for (index, page) in doc.pages.iter_mut().enumerate() {
        let text = footer.text(index + 1, total);
        let x = (width - text_width(&text, Font::Regular, footer.font_size)) / 2.0;
        page.commands.extend([
            Command::SaveState,
            Command::SetFillColor(Color::GRAY),
            Command::DrawString {
                x,
                y: baseline,
                text,
                font: Font::Regular,
                size: footer.font_size,
            },
            Command::RestoreState,
        ]);
    }
}
