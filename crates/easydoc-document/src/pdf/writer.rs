// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: new documents from plain text (lopdf, standard-14 Helvetica)
// or from raster images (printpdf 0.8).
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use easydoc_core::PaperSize;
use easydoc_core::error::EasydocError;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId, StringFormat, dictionary};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use super::assemble::PdfAssembler;
use super::fonts::{StandardFont, encode_win_ansi};

/// Text flow geometry, in millimetres from the top-left corner.
const TEXT_FONT_SIZE: f32 = 16.0;
const TEXT_LEFT_MM: f32 = 15.0;
const TEXT_TOP_MM: f32 = 15.0;
const TEXT_LINE_STEP_MM: f32 = 7.0;
/// A new page starts once the baseline would pass this depth.
const TEXT_BOTTOM_LIMIT_MM: f32 = 280.0;
const TEXT_WRAP_WIDTH_MM: f32 = 180.0;
const TEXT_FONT: StandardFont = StandardFont::Helvetica;
const TEXT_FONT_RESOURCE: &[u8] = b"F1";

const IMAGES_TITLE: &str = "EasyDoc Images";

/// Creates new PDF documents from text content or raster images.
pub struct PdfWriter {
    /// Paper size for page creation.
    paper_size: PaperSize,
}

impl PdfWriter {
    /// Create a new writer targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self { paper_size }
    }

    /// Create a new writer defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    // -- Text to PDF ----------------------------------------------------------

    /// Create a PDF from plain text content.
    ///
    /// Helvetica 16 pt, wrapped to 180 mm. Lines advance 7 mm from a first
    /// baseline 15 mm below the top edge; a page break happens before any
    /// line whose baseline would sit deeper than 280 mm. Strings are written
    /// in WinAnsiEncoding, so Latin-1 text survives and other characters
    /// become `?`.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn create_from_text(&self, text: &str) -> Result<Vec<u8>, EasydocError> {
        let (page_w, page_h) = self.page_dimensions();
        info!(paper = ?self.paper_size, "Creating text PDF");

        let wrap_width_pt = Mm(TEXT_WRAP_WIDTH_MM).into_pt().0;
        let lines = wrap_text(text, TEXT_FONT, TEXT_FONT_SIZE, wrap_width_pt);
        let page_h_pt = page_h.into_pt().0;
        let media_box = [0.0, 0.0, page_w.into_pt().0, page_h_pt];
        let left_pt = Mm(TEXT_LEFT_MM).into_pt().0;

        let mut assembler = PdfAssembler::new();
        let font_id = assembler.document_mut().add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => TEXT_FONT.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });

        let mut operations: Vec<Operation> = Vec::new();
        let mut y_mm = TEXT_TOP_MM;

        for line in &lines {
            if y_mm > TEXT_BOTTOM_LIMIT_MM {
                push_text_page(
                    &mut assembler,
                    media_box,
                    font_id,
                    std::mem::take(&mut operations),
                )?;
                y_mm = TEXT_TOP_MM;
            }
            if !line.is_empty() {
                let baseline = page_h_pt - Mm(y_mm).into_pt().0;
                operations.extend(show_line(left_pt, baseline, line));
            }
            y_mm += TEXT_LINE_STEP_MM;
        }
        push_text_page(&mut assembler, media_box, font_id, operations)?;

        debug!(
            total_lines = lines.len(),
            pages = assembler.page_count(),
            "Text layout complete"
        );
        assembler.into_bytes()
    }

    // -- Images to PDF --------------------------------------------------------

    /// Create a PDF with one page per image, in order.
    ///
    /// Each image is scaled to the full page width, or to the full page
    /// height when that would overflow, and centred.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn create_from_images(&self, images: &[DynamicImage]) -> Result<Vec<u8>, EasydocError> {
        let (page_w, page_h) = self.page_dimensions();
        info!(paper = ?self.paper_size, "Creating image PDF");

        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        let mut doc = PdfDocument::new(IMAGES_TITLE);
        let mut pages = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            let (width_px, height_px) = (image.width(), image.height());
            if width_px == 0 || height_px == 0 {
                return Err(EasydocError::ImageError(format!(
                    "image {} has no pixels",
                    index + 1
                )));
            }

            let (final_w, final_h) =
                fit_to_page(width_px as f32 / height_px as f32, page_w_pt, page_h_pt);

            let raw = RawImage {
                pixels: RawImageData::U8(image.to_rgb8().into_raw()),
                width: width_px as usize,
                height: height_px as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // At 72 dpi one pixel is one point, so scale maps pixels to the
            // final size directly.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt((page_w_pt - final_w) / 2.0)),
                    translate_y: Some(Pt((page_h_pt - final_h) / 2.0)),
                    scale_x: Some(final_w / width_px as f32),
                    scale_y: Some(final_h / height_px as f32),
                    dpi: Some(72.0),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(page_w, page_h, ops));

            debug!(page = index + 1, final_w, final_h, "Image placed on page");
        }

        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }
}

/// One line of text as a self-contained BT/ET block.
fn show_line(x: f32, y: f32, line: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(TEXT_FONT_RESOURCE.to_vec()),
                TEXT_FONT_SIZE.into(),
            ],
        ),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn push_text_page(
    assembler: &mut PdfAssembler,
    media_box: [f32; 4],
    font_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<(), EasydocError> {
    let content = Content { operations }.encode().map_err(|err| {
        EasydocError::PdfError(format!("failed to encode text content: {}", err))
    })?;
    assembler.push_page(
        media_box,
        dictionary! {
            "Font" => dictionary! { TEXT_FONT_RESOURCE.to_vec() => font_id },
        },
        content,
    )?;
    Ok(())
}

/// Size of an image with aspect `ratio` (width / height) fitted to the page:
/// full width, unless the height would overflow, then full height.
pub fn fit_to_page(ratio: f32, page_w: f32, page_h: f32) -> (f32, f32) {
    let mut width = page_w;
    let mut height = page_w / ratio;
    if height > page_h {
        height = page_h;
        width = page_h * ratio;
    }
    (width, height)
}

// -- Text wrapping helper -----------------------------------------------------

/// Wrap text so no line is wider than `max_width` points in `font` at `size`.
///
/// Existing newlines are kept (empty paragraphs stay as empty lines). Words
/// are packed greedily; a word wider than the line is broken by character.
pub fn wrap_text(text: &str, font: StandardFont, size: f32, max_width: f32) -> Vec<String> {
    let width = |s: &str| font.text_width(s, size);
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in words {
            if width(word) > max_width {
                // Flush any accumulated line, then force-break the word.
                if !current_line.is_empty() {
                    result.push(std::mem::take(&mut current_line));
                }
                for ch in word.chars() {
                    let mut candidate = current_line.clone();
                    candidate.push(ch);
                    if width(&candidate) > max_width && !current_line.is_empty() {
                        result.push(std::mem::take(&mut current_line));
                    }
                    current_line.push(ch);
                }
            } else if current_line.is_empty() {
                current_line.push_str(word);
            } else if width(&current_line) + width(" ") + width(word) <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current_line, word.to_string()));
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::text::extract_text;
    use lopdf::Document;

    #[test]
    fn wide_images_fill_the_page_width() {
        let (w, h) = fit_to_page(1.5, 595.0, 842.0);
        assert_eq!(w, 595.0);
        assert!((h - 595.0 / 1.5).abs() < 1e-3);
    }

    #[test]
    fn tall_images_fill_the_page_height() {
        let (w, h) = fit_to_page(0.25, 595.0, 842.0);
        assert_eq!(h, 842.0);
        assert!((w - 842.0 * 0.25).abs() < 1e-3);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_text("Hello world", StandardFont::Helvetica, 16.0, 500.0);
        assert_eq!(lines, vec!["Hello world".to_string()]);
    }

    #[test]
    fn long_text_wraps_within_width() {
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let max = Mm(TEXT_WRAP_WIDTH_MM).into_pt().0;
        let lines = wrap_text(&text, StandardFont::Helvetica, 16.0, max);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(StandardFont::Helvetica.text_width(line, 16.0) <= max);
        }
    }

    #[test]
    fn oversized_words_are_broken() {
        let word = "W".repeat(100);
        let lines = wrap_text(&word, StandardFont::Helvetica, 16.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn blank_paragraphs_are_kept() {
        let lines = wrap_text("a\n\nb", StandardFont::Helvetica, 16.0, 500.0);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn text_paginates_after_the_bottom_limit() {
        // Baselines 15, 22, ... 280 fit on page one: 38 lines.
        let text = (1..=39).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let bytes = PdfWriter::a4().create_from_text(&text).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn latin_text_survives_extraction() {
        let bytes = PdfWriter::a4()
            .create_from_text("Hello world\nCaf\u{e9} au lait \u{2603}")
            .unwrap();
        let text = extract_text(&PdfReader::from_bytes(&bytes).unwrap());
        assert_eq!(text, "--- Page 1 ---\nHello world Caf\u{e9} au lait ?\n\n");
    }

    #[test]
    fn wide_image_is_drawn_at_full_width() {
        let bytes = PdfWriter::a4()
            .create_from_images(&[DynamicImage::new_rgb8(300, 200)])
            .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = doc.get_pages()[&1];
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let placement: Vec<f32> = content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .unwrap()
            .operands
            .iter()
            .map(|operand| operand.as_float().unwrap())
            .collect();

        let page_w = Mm(210.0).into_pt().0;
        let page_h = Mm(297.0).into_pt().0;
        let expected = [
            page_w,
            0.0,
            0.0,
            page_w / 1.5,
            0.0,
            (page_h - page_w / 1.5) / 2.0,
        ];
        for (actual, expected) in placement.iter().zip(expected) {
            assert!((actual - expected).abs() < 0.5, "{placement:?}");
        }
        assert_eq!(placement.len(), 6);
    }

    #[test]
    fn one_page_per_image() {
        let images = vec![
            DynamicImage::new_rgb8(30, 20),
            DynamicImage::new_rgb8(300, 200),
        ];
        let bytes = PdfWriter::a4().create_from_images(&images).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
