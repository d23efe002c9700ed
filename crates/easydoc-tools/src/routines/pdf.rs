// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF tools: image import, merge, split, N-up layout, watermark, lock,
// page rendering, text extraction, and text import.

use easydoc_core::error::{EasydocError, Result};
use easydoc_core::options::{ConversionOptions, LayoutOptions, LockOptions, WatermarkOptions};
use easydoc_core::types::{DocumentType, InputFile};
use easydoc_document::archive::numbered_archive;
use easydoc_document::pdf::layout::layout_n_up;
use easydoc_document::pdf::text::extract_text;
use easydoc_document::pdf::watermark::apply_watermark;
use easydoc_document::{ImageProcessor, PdfReader, PdfWriter};
use tracing::{info, instrument};

use super::{Outcome, ToolContext, first_file};
use crate::packaging;
use crate::readers::{read_bytes, read_data_uri, read_text};

/// One A4 page per image, in selection order.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn images_to_pdf(ctx: &ToolContext, files: &[InputFile]) -> Result<Outcome> {
    if files.is_empty() {
        return Err(EasydocError::NoFiles);
    }
    let mut images = Vec::with_capacity(files.len());
    for file in files {
        let uri = read_data_uri(file).await?;
        images.push(ImageProcessor::from_data_uri(&uri)?.into_dynamic());
    }

    let bytes = PdfWriter::new(ctx.config.paper_size).create_from_images(&images)?;
    info!(pages = images.len(), "Images placed");
    Ok(Outcome::new(bytes, DocumentType::Pdf, packaging::IMAGES_TO_PDF))
}

/// All pages of every input, file by file.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn merge(files: &[InputFile]) -> Result<Outcome> {
    if files.is_empty() {
        return Err(EasydocError::NoFiles);
    }
    let mut inputs = Vec::with_capacity(files.len());
    for file in files {
        inputs.push(read_bytes(file).await?);
    }

    let bytes = merge_bytes(&inputs)?;
    Ok(Outcome::new(bytes, DocumentType::Pdf, packaging::MERGED_PDF))
}

fn merge_bytes(inputs: &[Vec<u8>]) -> Result<Vec<u8>> {
    let readers = inputs
        .iter()
        .map(|data| PdfReader::from_bytes(data))
        .collect::<Result<Vec<_>>>()?;
    PdfReader::merge(&readers)
}

/// One single-page PDF per source page, zipped.
#[instrument(skip_all)]
pub async fn split(ctx: &ToolContext, files: &[InputFile]) -> Result<Outcome> {
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let pages = PdfReader::from_bytes(&data)?.split_pages()?;
    let archive = numbered_archive(&pages, "page_", "pdf", ctx.config.archive_compression)?;
    info!(pages = pages.len(), "Document split");
    Ok(Outcome::new(
        archive,
        DocumentType::Zip,
        packaging::split_archive_name(&file.name),
    ))
}

/// Two or four source pages per A4 sheet.
#[instrument(skip_all)]
pub async fn layout(files: &[InputFile], options: &ConversionOptions) -> Result<Outcome> {
    let layout = LayoutOptions::try_from(options)?;
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let bytes = layout_n_up(&PdfReader::from_bytes(&data)?, layout.pages_per_sheet)?;
    Ok(Outcome::new(
        bytes,
        DocumentType::Pdf,
        packaging::layout_name(layout.pages_per_sheet.count()),
    ))
}

/// Stamp the watermark text on every page.
#[instrument(skip_all)]
pub async fn watermark(files: &[InputFile], options: &ConversionOptions) -> Result<Outcome> {
    let watermark = WatermarkOptions::from(options);
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let bytes = apply_watermark(&PdfReader::from_bytes(&data)?, &watermark)?;
    Ok(Outcome::new(bytes, DocumentType::Pdf, packaging::WATERMARKED_PDF))
}

/// Encrypt with the given password.
#[instrument(skip_all)]
pub async fn lock(files: &[InputFile], options: &ConversionOptions) -> Result<Outcome> {
    let lock = LockOptions::try_from(options)?;
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let bytes = PdfReader::from_bytes(&data)?.lock(&lock.password)?;
    Ok(Outcome::new(bytes, DocumentType::Pdf, packaging::LOCKED_PDF))
}

/// Every page rendered to PNG, zipped.
#[instrument(skip_all)]
pub async fn to_images(ctx: &ToolContext, files: &[InputFile]) -> Result<Outcome> {
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let pages = ctx.renderer.render_pages(&data)?;
    let archive = numbered_archive(&pages, "page_", "png", ctx.config.archive_compression)?;
    Ok(Outcome::new(archive, DocumentType::Zip, packaging::PDF_IMAGES))
}

/// Page-by-page text dump.
#[instrument(skip_all)]
pub async fn to_text(files: &[InputFile]) -> Result<Outcome> {
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let text = extract_text(&PdfReader::from_bytes(&data)?);
    Ok(Outcome::new(
        text.into_bytes(),
        DocumentType::PlainText,
        packaging::EXTRACTED_TEXT,
    ))
}

/// Plain text laid out on A4 pages.
#[instrument(skip_all)]
pub async fn text_to_pdf(ctx: &ToolContext, files: &[InputFile]) -> Result<Outcome> {
    let file = first_file(files)?;
    let text = read_text(file).await?;

    let bytes = PdfWriter::new(ctx.config.paper_size).create_from_text(&text)?;
    Ok(Outcome::new(
        bytes,
        DocumentType::Pdf,
        packaging::replace_extension(&file.name, ".txt", ".pdf"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routines::fixtures::{pdf_file, png_file};
    use std::io::Cursor;

    fn page_count(bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
    }

    fn layout_options(mode: &str) -> ConversionOptions {
        ConversionOptions {
            layout_mode: Some(mode.to_string()),
            ..ConversionOptions::default()
        }
    }

    #[tokio::test]
    async fn merge_keeps_file_then_page_order() {
        let files = [pdf_file("a.pdf", 2), pdf_file("b.pdf", 3)];
        let outcome = merge(&files).await.unwrap();

        assert_eq!(outcome.name, "merged_document.pdf");
        assert_eq!(outcome.artifact.media_type, "application/pdf");
        let text = extract_text(&PdfReader::from_bytes(&outcome.artifact.bytes).unwrap());
        let first_b = text.find("b.pdf page 1").unwrap();
        assert!(text.find("a.pdf page 2").unwrap() < first_b);
        assert_eq!(page_count(&outcome.artifact.bytes), 5);
    }

    #[tokio::test]
    async fn split_of_a_merge_yields_single_pages() {
        let merged = merge(&[pdf_file("a.pdf", 2), pdf_file("b.pdf", 1)]).await.unwrap();
        let input = InputFile::from_bytes("merged.pdf", "application/pdf", merged.artifact.bytes);

        let outcome = split(&ToolContext::default(), &[input]).await.unwrap();
        assert_eq!(outcome.name, "merged_split.zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(outcome.artifact.bytes)).unwrap();
        assert_eq!(archive.len(), 3);
        for n in 1..=3 {
            let mut entry = archive.by_name(&format!("page_{n}.pdf")).unwrap();
            let mut bytes = Vec::new();
            std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
            assert_eq!(page_count(&bytes), 1);
        }
    }

    #[tokio::test]
    async fn layout_sheet_counts_round_up() {
        let files = [pdf_file("doc.pdf", 5)];

        let two = layout(&files, &ConversionOptions::default()).await.unwrap();
        assert_eq!(two.name, "layout_2up.pdf");
        assert_eq!(page_count(&two.artifact.bytes), 3);

        let four = layout(&files, &layout_options("4")).await.unwrap();
        assert_eq!(four.name, "layout_4up.pdf");
        assert_eq!(page_count(&four.artifact.bytes), 2);
    }

    #[tokio::test]
    async fn layout_rejects_unknown_modes() {
        let err = layout(&[pdf_file("doc.pdf", 1)], &layout_options("3"))
            .await
            .unwrap_err();
        assert!(matches!(err, EasydocError::InvalidOption { .. }));
    }

    #[tokio::test]
    async fn lock_requires_a_password() {
        let files = [pdf_file("doc.pdf", 1)];
        for password in [None, Some(String::new())] {
            let options = ConversionOptions {
                password,
                ..ConversionOptions::default()
            };
            let err = lock(&files, &options).await.unwrap_err();
            assert_eq!(err.to_string(), "Password is required to lock the PDF.");
        }
    }

    #[tokio::test]
    async fn locked_output_needs_the_password() {
        let options = ConversionOptions {
            password: Some("secret".to_string()),
            ..ConversionOptions::default()
        };

        let outcome = lock(&[pdf_file("doc.pdf", 1)], &options).await.unwrap();
        assert_eq!(outcome.name, "locked.pdf");

        let locked = lopdf::Document::load_mem(&outcome.artifact.bytes).unwrap();
        assert!(locked.is_encrypted());
        assert!(locked.authenticate_user_password("secret").is_ok());
        assert!(locked.authenticate_user_password("guess").is_err());
    }

    #[tokio::test]
    async fn watermark_keeps_page_count() {
        let outcome = watermark(&[pdf_file("doc.pdf", 2)], &ConversionOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.name, "watermarked.pdf");
        assert_eq!(page_count(&outcome.artifact.bytes), 2);
    }

    #[tokio::test]
    async fn text_extraction_has_page_headers() {
        let outcome = to_text(&[pdf_file("doc.pdf", 2)]).await.unwrap();
        let text = String::from_utf8(outcome.artifact.bytes).unwrap();

        assert_eq!(outcome.name, "extracted_text.txt");
        assert!(text.starts_with("--- Page 1 ---\ndoc.pdf page 1"));
        assert!(text.contains("--- Page 2 ---\ndoc.pdf page 2"));
    }

    #[tokio::test]
    async fn each_image_gets_a_page() {
        let files = [png_file("a.png", 300, 200), png_file("b.png", 300, 200)];
        let outcome = images_to_pdf(&ToolContext::default(), &files).await.unwrap();

        assert_eq!(outcome.name, "images_converted.pdf");
        assert_eq!(page_count(&outcome.artifact.bytes), 2);
    }

    #[tokio::test]
    async fn text_file_becomes_a_named_pdf() {
        let file = InputFile::from_bytes("notes.txt", "text/plain", b"hello\nworld".to_vec());
        let outcome = text_to_pdf(&ToolContext::default(), &[file]).await.unwrap();

        assert_eq!(outcome.name, "notes.pdf");
        assert_eq!(page_count(&outcome.artifact.bytes), 1);
    }

    #[tokio::test]
    async fn accented_text_round_trips_through_pdf() {
        let file = InputFile::from_bytes(
            "menu.txt",
            "text/plain",
            "Cr\u{e8}me br\u{fb}l\u{e9}e\nna\u{ef}ve".as_bytes().to_vec(),
        );
        let pdf = text_to_pdf(&ToolContext::default(), &[file]).await.unwrap();
        let input = InputFile::from_bytes("menu.pdf", "application/pdf", pdf.artifact.bytes);

        let outcome = to_text(&[input]).await.unwrap();
        assert_eq!(
            String::from_utf8(outcome.artifact.bytes).unwrap(),
            "--- Page 1 ---\nCr\u{e8}me br\u{fb}l\u{e9}e na\u{ef}ve\n\n"
        );
    }

    #[tokio::test]
    async fn garbage_input_is_a_pdf_error() {
        let file = InputFile::from_bytes("bad.pdf", "application/pdf", b"not a pdf".to_vec());
        let err = to_text(&[file]).await.unwrap_err();
        assert!(matches!(err, EasydocError::PdfError(_)));
    }
}
