//! Standard Type1 Helvetica metrics and line wrapping
//!
//! Widths are the AFM advance widths (1/1000 em) for printable ASCII and the
//! WinAnsi punctuation block. Anything else is measured as a digit.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// PostScript name of the standard font
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used in page content streams
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// WinAnsi 0x80..=0x9F: character, code, Helvetica width, Helvetica-Bold width
#[rustfmt::skip]
const WIN_ANSI_HIGH: [(char, u8, u16, u16); 27] = [
    ('\u{20AC}', 0x80, 556, 556),
    ('\u{201A}', 0x82, 222, 278),
    ('\u{0192}', 0x83, 556, 556),
    ('\u{201E}', 0x84, 333, 500),
    ('\u{2026}', 0x85, 1000, 1000),
    ('\u{2020}', 0x86, 556, 556),
    ('\u{2021}', 0x87, 556, 556),
    ('\u{02C6}', 0x88, 333, 333),
    ('\u{2030}', 0x89, 1000, 1000),
    ('\u{0160}', 0x8A, 667, 667),
    ('\u{2039}', 0x8B, 333, 333),
    ('\u{0152}', 0x8C, 1000, 1000),
    ('\u{017D}', 0x8E, 611, 611),
    ('\u{2018}', 0x91, 222, 278),
    ('\u{2019}', 0x92, 222, 278),
    ('\u{201C}', 0x93, 333, 500),
    ('\u{201D}', 0x94, 333, 500),
    ('\u{2022}', 0x95, 350, 350),
    ('\u{2013}', 0x96, 556, 556),
    ('\u{2014}', 0x97, 1000, 1000),
    ('\u{02DC}', 0x98, 333, 333),
    ('\u{2122}', 0x99, 1000, 1000),
    ('\u{0161}', 0x9A, 500, 556),
    ('\u{203A}', 0x9B, 333, 333),
    ('\u{0153}', 0x9C, 944, 944),
    ('\u{017E}', 0x9E, 500, 500),
    ('\u{0178}', 0x9F, 667, 667),
];

fn win_ansi_high(c: char) -> Option<&'static (char, u8, u16, u16)> {
    WIN_ANSI_HIGH.iter().find(|entry| entry.0 == c)
}

fn char_width(c: char, font: Font) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    let code = c as u32;
    if (32..=126).contains(&code) {
        return table[(code - 32) as usize];
    }
    match (win_ansi_high(c), font) {
        (Some(&(_, _, regular, _)), Font::Regular) => regular,
        (Some(&(_, _, _, bold)), Font::Bold) => bold,
        (None, _) => FALLBACK_WIDTH,
    }
}

/// Advance width of `text` in points
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, font) as u32).sum();
    units as f32 * size / 1000.0
}

/// Bytes for a WinAnsi-encoded string operand
///
/// Latin-1 characters map to themselves, typographic punctuation to the
/// 0x80..=0x9F block; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => win_ansi_high(c).map_or(b'?', |entry| entry.1),
        })
        .collect()
}

/// Greedy word wrap into lines no wider than `max_width`
///
/// Explicit newlines are kept; a single word wider than the line is broken
/// between characters. Blank input yields one empty line.
pub fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if text_width(&candidate, font, size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if text_width(word, font, size) <= max_width {
                line = word.to_string();
            } else {
                let mut pieces = break_word(word, font, size, max_width);
                line = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(line);
    }
    lines
}

fn break_word(word: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if text_width(&piece, font, size) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    pieces.push(piece);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(text_width("W", Font::Regular, 1000.0), 944.0);
        assert_eq!(text_width("i", Font::Regular, 1000.0), 222.0);
        assert_eq!(text_width("m", Font::Bold, 1000.0), 889.0);
        assert!((text_width("Page 1 of 3", Font::Regular, 10.0) - 51.15).abs() < 1e-3);
    }

    #[test]
    fn test_punctuation_widths() {
        assert_eq!(text_width("\u{2019}", Font::Regular, 1000.0), 222.0);
        assert_eq!(text_width("\u{201C}", Font::Bold, 1000.0), 500.0);
        assert_eq!(text_width("\u{2014}", Font::Regular, 1000.0), 1000.0);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "The quick brown fox jumps over the lazy dog near the river bank";
        let lines = wrap(text, Font::Regular, 12.0, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Regular, 12.0) <= 120.0, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_keeps_newlines_and_blank() {
        assert_eq!(wrap("a\nb", Font::Regular, 12.0, 500.0), vec!["a", "b"]);
        assert_eq!(wrap("", Font::Regular, 12.0, 500.0), vec![""]);
    }

    #[test]
    fn test_long_word_is_broken() {
        let lines = wrap(&"W".repeat(30), Font::Regular, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "W".repeat(30));
        for line in &lines {
            assert!(text_width(line, Font::Regular, 10.0) <= 50.0);
        }
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Café"), b"Caf\xe9".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_encode_win_ansi_typographic_punctuation() {
        let encoded = encode_win_ansi("Driver\u{2019}s door \u{2014} \u{201C}bent\u{201D}");
        assert_eq!(encoded, b"Driver\x92s door \x97 \x93bent\x94".to_vec());
        assert_eq!(
            encode_win_ansi("\u{2018}\u{2013}\u{2026}\u{20AC}\u{2022}\u{2122}"),
            vec![0x91, 0x96, 0x85, 0x80, 0x95, 0x99]
        );
    }
}
