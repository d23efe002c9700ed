// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Standard-14 font metrics for the three faces EasyDoc draws with.
//
// Widths are the Adobe AFM advance widths (1/1000 em) for printable ASCII
// 0x20..=0x7E. Characters outside that range are measured with an average
// width, which is close enough for centring and line wrapping.

use easydoc_core::options::WatermarkFont;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

/// A standard PDF base font, with just enough metrics to lay text out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    TimesRoman,
    Courier,
}

impl From<WatermarkFont> for StandardFont {
    fn from(font: WatermarkFont) -> Self {
        match font {
            WatermarkFont::Helvetica => Self::Helvetica,
            WatermarkFont::TimesRoman => Self::TimesRoman,
            WatermarkFont::Courier => Self::Courier,
        }
    }
}

impl StandardFont {
    /// `/BaseFont` name in a PDF font dictionary.
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::TimesRoman => "Times-Roman",
            Self::Courier => "Courier",
        }
    }

    /// Ascender minus descender, in 1/1000 em.
    fn height_units(&self) -> f32 {
        match self {
            Self::Helvetica => 718.0 + 207.0,
            Self::TimesRoman => 683.0 + 217.0,
            Self::Courier => 629.0 + 157.0,
        }
    }

    fn char_units(&self, ch: char) -> f32 {
        let code = ch as u32;
        let index = code.wrapping_sub(0x20) as usize;
        match self {
            Self::Courier => 600.0,
            Self::Helvetica => HELVETICA_WIDTHS.get(index).copied().unwrap_or(556) as f32,
            Self::TimesRoman => TIMES_ROMAN_WIDTHS.get(index).copied().unwrap_or(500) as f32,
        }
    }

    /// Advance width of `text` at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.char_units(ch)).sum::<f32>() * size / 1000.0
    }

    /// Line height of the face at `size` points.
    pub fn height_at(&self, size: f32) -> f32 {
        self.height_units() * size / 1000.0
    }
}

/// Encode text for a simple font using WinAnsiEncoding. Latin-1 code points
/// map to themselves; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}
