// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word tools: text extraction, PDF export, merge, watermark, and PDF import.

use easydoc_core::error::{EasydocError, Result};
use easydoc_core::options::{ConversionOptions, WatermarkOptions};
use easydoc_core::types::{DocumentType, InputFile};
use easydoc_document::pdf::text::extract_text;
use easydoc_document::word::compose::{merge_texts, watermarked_from_text};
use easydoc_document::word::html::{html_to_lines, to_html};
use easydoc_document::word::{extract_raw_text, read_docx, write_docx};
use easydoc_document::{PdfReader, PdfWriter, WordDocument};
use tracing::{debug, instrument};

use super::{Outcome, ToolContext, first_file};
use crate::packaging;
use crate::readers::read_bytes;

pub const MERGED_MESSAGE: &str = "Merged text content of documents.";
pub const WATERMARKED_MESSAGE: &str = "Created new DOCX with watermark.";

/// Body text, one blank line after each paragraph.
#[instrument(skip_all)]
pub async fn to_text(files: &[InputFile]) -> Result<Outcome> {
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let text = extract_raw_text(&data)?;
    Ok(Outcome::new(
        text.into_bytes(),
        DocumentType::PlainText,
        packaging::replace_extension(&file.name, ".docx", ".txt"),
    ))
}

/// Body rendered through HTML to plain lines, then laid out like text.
#[instrument(skip_all)]
pub async fn to_pdf(ctx: &ToolContext, files: &[InputFile]) -> Result<Outcome> {
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let lines = html_to_lines(&to_html(&read_docx(&data)?));
    debug!(lines = lines.lines().count(), "Document flattened");
    let bytes = PdfWriter::new(ctx.config.paper_size).create_from_text(&lines)?;
    Ok(Outcome::new(
        bytes,
        DocumentType::Pdf,
        packaging::replace_extension(&file.name, ".docx", ".pdf"),
    ))
}

/// Concatenated text of every input as a new document.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn merge(files: &[InputFile]) -> Result<Outcome> {
    if files.is_empty() {
        return Err(EasydocError::NoFiles);
    }
    let mut texts = Vec::with_capacity(files.len());
    for file in files {
        let data = read_bytes(file).await?;
        texts.push(extract_raw_text(&data)?);
    }

    let doc = merge_texts(
        files
            .iter()
            .zip(&texts)
            .map(|(file, text)| (file.name.as_str(), text.as_str())),
    );
    let bytes = write_docx(&doc)?;
    Ok(Outcome::new(bytes, DocumentType::Docx, packaging::MERGED_DOCX).with_message(MERGED_MESSAGE))
}

/// The input's text in a new document carrying the watermark in its
/// header or footer.
#[instrument(skip_all)]
pub async fn watermark(files: &[InputFile], options: &ConversionOptions) -> Result<Outcome> {
    let watermark = WatermarkOptions::from(options);
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let doc = watermarked_from_text(&extract_raw_text(&data)?, &watermark);
    let bytes = write_docx(&doc)?;
    Ok(
        Outcome::new(bytes, DocumentType::Docx, packaging::WATERMARKED_DOCX)
            .with_message(WATERMARKED_MESSAGE),
    )
}

/// Extracted PDF text, one paragraph per line.
#[instrument(skip_all)]
pub async fn from_pdf(files: &[InputFile]) -> Result<Outcome> {
    let file = first_file(files)?;
    let data = read_bytes(file).await?;

    let text = extract_text(&PdfReader::from_bytes(&data)?);
    let bytes = write_docx(&WordDocument::from_lines(&text))?;
    Ok(Outcome::new(bytes, DocumentType::Docx, packaging::PDF_TO_WORD))
}
