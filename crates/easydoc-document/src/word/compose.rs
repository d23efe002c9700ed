// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Building new Word documents out of extracted text.

use easydoc_core::options::{WatermarkOptions, WatermarkPosition};

use super::model::{Alignment, Paragraph, TextRun, WordDocument};

/// Watermark run size in half-points (40 pt).
pub const WATERMARK_SIZE_HALF_POINTS: u32 = 80;

/// Concatenate `(file name, raw text)` pairs, each introduced by a
/// `--- Start of <name> ---` line, into one paragraph-per-line document.
pub fn merge_texts<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> WordDocument {
    let mut text = String::new();
    for (name, raw) in sources {
        text.push_str(&format!("\n\n--- Start of {} ---\n\n", name));
        text.push_str(raw);
    }
    WordDocument::from_lines(&text)
}

/// A paragraph-per-line document with the watermark text in the default
/// header (`top`, `middle`) or footer (`bottom`).
///
/// Word headers cannot float text mid-page or carry transparency, so
/// `middle` lands in the header and the opacity is dropped.
pub fn watermarked_from_text(text: &str, options: &WatermarkOptions) -> WordDocument {
    let stamp = Paragraph {
        runs: vec![TextRun {
            text: options.text.clone(),
            bold: true,
            italic: false,
            size_half_points: Some(WATERMARK_SIZE_HALF_POINTS),
            color: Some(options.color.to_hex()),
            font: Some(options.font.display_name().to_string()),
        }],
        alignment: Some(Alignment::Center),
        style: None,
    };

    let mut doc = WordDocument::from_lines(text);
    match options.position {
        WatermarkPosition::Top | WatermarkPosition::Middle => doc.header.push(stamp),
        WatermarkPosition::Bottom => doc.footer.push(stamp),
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use easydoc_core::options::Rgb;

    #[test]
    fn merge_introduces_each_file() {
        let doc = merge_texts([("a.docx", "one\n\n"), ("b.docx", "two\n\n")]);
        let lines: Vec<String> = doc.paragraphs.iter().map(Paragraph::text).collect();
        assert_eq!(
            lines,
            vec![
                "", "", "--- Start of a.docx ---", "", "one", "", "",
                "", "--- Start of b.docx ---", "", "two", "", "",
            ]
        );
    }

    #[test]
    fn bottom_watermark_goes_to_the_footer() {
        let options = WatermarkOptions {
            position: WatermarkPosition::Bottom,
            color: Rgb::parse_hex("#00ff00"),
            ..WatermarkOptions::default()
        };
        let doc = watermarked_from_text("body", &options);
        assert!(doc.header.is_empty());
        let run = &doc.footer[0].runs[0];
        assert_eq!(run.text, "CONFIDENTIAL");
        assert!(run.bold);
        assert_eq!(run.size_half_points, Some(80));
        assert_eq!(run.color.as_deref(), Some("00FF00"));
        assert_eq!(run.font.as_deref(), Some("Helvetica"));
        assert_eq!(doc.footer[0].alignment, Some(Alignment::Center));
    }

    #[test]
    fn middle_watermark_goes_to_the_header() {
        let doc = watermarked_from_text("body", &WatermarkOptions::default());
        assert_eq!(doc.header.len(), 1);
        assert!(doc.footer.is_empty());
        assert_eq!(doc.paragraphs.len(), 1);
    }
}
