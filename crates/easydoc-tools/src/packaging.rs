// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Suggested output names.
//
// Renames replace only the first occurrence of the extension text, wherever
// it sits in the name, so `a.pdf.pdf` becomes `a.pdf` and `x.docx.bak`
// becomes `x.txt.bak`.

pub const IMAGES_TO_PDF: &str = "images_converted.pdf";
pub const MERGED_PDF: &str = "merged_document.pdf";
pub const WATERMARKED_PDF: &str = "watermarked.pdf";
pub const LOCKED_PDF: &str = "locked.pdf";
pub const PDF_IMAGES: &str = "pdf_images.zip";
pub const EXTRACTED_TEXT: &str = "extracted_text.txt";
pub const MERGED_DOCX: &str = "merged.docx";
pub const WATERMARKED_DOCX: &str = "watermarked.docx";
pub const PDF_TO_WORD: &str = "converted_from_pdf.docx";
/// Returned for tool ids the registry does not know.
pub const PLACEHOLDER: &str = "demo_result.txt";

/// Replace the first `from` in `name` with `to`.
pub fn replace_extension(name: &str, from: &str, to: &str) -> String {
    name.replacen(from, to, 1)
}

/// `<stem>_split.zip`, the stem being the name with `.pdf` removed once.
pub fn split_archive_name(name: &str) -> String {
    format!("{}_split.zip", replace_extension(name, ".pdf", ""))
}

/// `layout_<n>up.pdf`
pub fn layout_name(pages_per_sheet: usize) -> String {
    format!("layout_{}up.pdf", pages_per_sheet)
}

/// `converted.<ext>`
pub fn converted_image_name(extension: &str) -> String {
    format!("converted.{}", extension)
}
