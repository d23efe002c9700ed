// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word reader — unpack a .docx and parse its main document part.

use std::io::{Cursor, Read};

use easydoc_core::error::EasydocError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, instrument};
use zip::ZipArchive;

use super::model::{Alignment, Paragraph, TextRun, WordDocument};

const DOCUMENT_PART: &str = "word/document.xml";

/// Parse the body of a .docx file. Headers, footers and styling beyond
/// bold/italic/alignment/paragraph style are not read.
#[instrument(skip_all, fields(bytes_len = data.len()))]
pub fn read_docx(data: &[u8]) -> Result<WordDocument, EasydocError> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|err| EasydocError::WordError(format!("not a .docx package: {}", err)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|err| EasydocError::WordError(format!("missing {}: {}", DOCUMENT_PART, err)))?
        .read_to_string(&mut xml)
        .map_err(|err| EasydocError::WordError(format!("cannot read {}: {}", DOCUMENT_PART, err)))?;

    let paragraphs = parse_paragraphs(&xml)?;
    debug!(paragraphs = paragraphs.len(), "Word document parsed");

    Ok(WordDocument {
        paragraphs,
        ..WordDocument::default()
    })
}

/// Body text of a .docx, each paragraph followed by a blank line.
pub fn extract_raw_text(data: &[u8]) -> Result<String, EasydocError> {
    Ok(read_docx(data)?.raw_text())
}

/// Collect every `w:p` in a WordprocessingML fragment, in document order of
/// their closing tags.
pub fn parse_paragraphs(xml: &str) -> Result<Vec<Paragraph>, EasydocError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    // Text boxes nest paragraphs inside runs of an outer paragraph.
    let mut open: Vec<Paragraph> = Vec::new();
    let mut run: Option<TextRun> = None;
    let mut in_text = false;
    let mut in_run_properties = false;
    // Depth inside `mc:Fallback`, which repeats the `mc:Choice` content.
    let mut fallback_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| EasydocError::WordError(format!("malformed document XML: {}", err)))?;

        match event {
            Event::Start(ref element) => {
                let name = element.local_name();
                if fallback_depth > 0 || name.as_ref() == b"Fallback" {
                    fallback_depth += 1;
                    continue;
                }
                match name.as_ref() {
                    b"p" => open.push(Paragraph::default()),
                    b"r" => run = Some(TextRun::default()),
                    b"rPr" => in_run_properties = true,
                    b"t" => in_text = run.is_some(),
                    _ => apply_property(element, &mut open, &mut run, in_run_properties),
                }
            }
            Event::Empty(ref element) => {
                if fallback_depth > 0 {
                    continue;
                }
                match element.local_name().as_ref() {
                    b"p" => paragraphs.push(Paragraph::default()),
                    b"tab" => push_text(&mut run, "\t"),
                    b"br" | b"cr" => push_text(&mut run, "\n"),
                    _ => apply_property(element, &mut open, &mut run, in_run_properties),
                }
            }
            Event::Text(ref text) => {
                if in_text && fallback_depth == 0 {
                    let value = text.unescape().map_err(|err| {
                        EasydocError::WordError(format!("bad text content: {}", err))
                    })?;
                    push_text(&mut run, &value);
                }
            }
            Event::CData(ref data) => {
                if in_text && fallback_depth == 0 {
                    push_text(&mut run, &String::from_utf8_lossy(data));
                }
            }
            Event::End(ref element) => {
                if fallback_depth > 0 {
                    fallback_depth -= 1;
                    continue;
                }
                match element.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"rPr" => in_run_properties = false,
                    b"r" => {
                        if let (Some(finished), Some(paragraph)) = (run.take(), open.last_mut()) {
                            paragraph.runs.push(finished);
                        }
                    }
                    b"p" => {
                        if let Some(finished) = open.pop() {
                            paragraphs.push(finished);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_text(run: &mut Option<TextRun>, text: &str) {
    if let Some(run) = run.as_mut() {
        run.text.push_str(text);
    }
}

/// Handle the paragraph and run property elements EasyDoc keeps.
fn apply_property(
    element: &BytesStart<'_>,
    open: &mut [Paragraph],
    run: &mut Option<TextRun>,
    in_run_properties: bool,
) {
    let value = attribute(element, b"val");
    match element.local_name().as_ref() {
        b"pStyle" => {
            if let Some(paragraph) = open.last_mut() {
                paragraph.style = value;
            }
        }
        b"jc" => {
            if let Some(paragraph) = open.last_mut() {
                paragraph.alignment = value.as_deref().and_then(Alignment::parse);
            }
        }
        b"b" if in_run_properties => {
            if let Some(run) = run.as_mut() {
                run.bold = is_on(value.as_deref());
            }
        }
        b"i" if in_run_properties => {
            if let Some(run) = run.as_mut() {
                run.italic = is_on(value.as_deref());
            }
        }
        b"sz" if in_run_properties => {
            if let Some(run) = run.as_mut() {
                run.size_half_points = value.and_then(|v| v.parse().ok());
            }
        }
        b"color" if in_run_properties => {
            if let Some(run) = run.as_mut() {
                run.color = value.filter(|v| v != "auto");
            }
        }
        b"rFonts" if in_run_properties => {
            if let Some(run) = run.as_mut() {
                run.font = attribute(element, b"ascii");
            }
        }
        _ => {}
    }
}

/// Toggle properties are on unless explicitly switched off.
fn is_on(value: Option<&str>) -> bool {
    !matches!(value, Some("0" | "false" | "off"))
}

fn attribute(element: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local_name)
        .and_then(|attr| attr.unescape_value().ok().map(|value| value.into_owned()))
}
