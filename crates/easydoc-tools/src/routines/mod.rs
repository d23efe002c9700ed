// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion routines, one async function per tool.
//
// Each routine reads its inputs, hands the bytes to the synchronous codecs in
// easydoc-document, and names the output. Codec values (lopdf documents in
// particular) live only inside the synchronous helpers so that routine
// futures stay `Send`.

pub mod image;
pub mod pdf;
pub mod word;

use easydoc_core::config::EngineConfig;
use easydoc_core::error::{EasydocError, Result};
use easydoc_core::types::{Artifact, DocumentType, InputFile};
use easydoc_document::PdfRenderer;
use tracing::debug;

/// Immutable state shared by every dispatch.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub config: EngineConfig,
    pub renderer: PdfRenderer,
}

impl ToolContext {
    pub fn new(config: EngineConfig) -> Self {
        let renderer = PdfRenderer::new(&config);
        Self { config, renderer }
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// What a routine produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub artifact: Artifact,
    pub name: String,
    /// Informational note shown alongside a successful result.
    pub message: Option<String>,
}

impl Outcome {
    pub fn new(bytes: Vec<u8>, document_type: DocumentType, name: impl Into<String>) -> Self {
        Self {
            artifact: Artifact::new(bytes, document_type),
            name: name.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The input a single-input tool works on. Extra files are ignored.
pub(crate) fn first_file(files: &[InputFile]) -> Result<&InputFile> {
    let (first, rest) = files.split_first().ok_or(EasydocError::NoFiles)?;
    if !rest.is_empty() {
        debug!(ignored = rest.len(), "Single-input tool; extra files ignored");
    }
    Ok(first)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Inputs built in code for routine and dispatcher tests.

    use std::io::Cursor;

    use easydoc_core::types::InputFile;
    use easydoc_document::word::write_docx;
    use easydoc_document::WordDocument;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// A PDF with `pages` pages, each showing `"<name> page <n>"`.
    pub fn pdf_file(name: &str, pages: usize) -> InputFile {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids = Vec::new();
        for n in 1..=pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("{name} page {n}"))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        InputFile::from_bytes(name, "application/pdf", bytes)
    }

    pub fn docx_file(name: &str, lines: &str) -> InputFile {
        let bytes = write_docx(&WordDocument::from_lines(lines)).unwrap();
        InputFile::from_bytes(
            name,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            bytes,
        )
    }

    pub fn png_file(name: &str, width: u32, height: u32) -> InputFile {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])));
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        InputFile::from_bytes(name, "image/png", bytes)
    }

    pub fn jpeg_file(name: &str, width: u32, height: u32) -> InputFile {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([30, 30, 200])));
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg).unwrap();
        InputFile::from_bytes(name, "image/jpeg", bytes)
    }
}
