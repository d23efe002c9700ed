// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word writer — package a `WordDocument` as a minimal .docx.

use easydoc_core::config::ArchiveCompression;
use easydoc_core::error::EasydocError;
use quick_xml::escape::escape;
use tracing::{debug, instrument};

use super::model::{Paragraph, TextRun, WordDocument};
use crate::archive::ArchiveBuilder;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const HEADER_REL_ID: &str = "rIdHeader1";
const FOOTER_REL_ID: &str = "rIdFooter1";

/// Serialise `doc` as a .docx package on an A4 page.
#[instrument(skip_all, fields(paragraphs = doc.paragraphs.len()))]
pub fn write_docx(doc: &WordDocument) -> Result<Vec<u8>, EasydocError> {
    let has_header = !doc.header.is_empty();
    let has_footer = !doc.footer.is_empty();

    let bytes = package(doc, has_header, has_footer).map_err(|err| match err {
        EasydocError::ArchiveError(detail) => {
            EasydocError::WordError(format!("failed to package .docx: {}", detail))
        }
        other => other,
    })?;
    debug!(output_bytes = bytes.len(), has_header, has_footer, "Word document written");
    Ok(bytes)
}

// -- Package parts ------------------------------------------------------------

fn package(doc: &WordDocument, has_header: bool, has_footer: bool) -> Result<Vec<u8>, EasydocError> {
    let mut archive = ArchiveBuilder::new(ArchiveCompression::Deflated);
    archive.add("[Content_Types].xml", content_types(has_header, has_footer).as_bytes())?;
    archive.add("_rels/.rels", package_relationships().as_bytes())?;
    archive.add("word/document.xml", document_part(doc, has_header, has_footer).as_bytes())?;
    archive.add(
        "word/_rels/document.xml.rels",
        document_relationships(has_header, has_footer).as_bytes(),
    )?;
    if has_header {
        archive.add("word/header1.xml", story_part("hdr", &doc.header).as_bytes())?;
    }
    if has_footer {
        archive.add("word/footer1.xml", story_part("ftr", &doc.footer).as_bytes())?;
    }
    archive.finish()
}

fn content_types(has_header: bool, has_footer: bool) -> String {
    let mut xml = format!(
        "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>"
    );
    if has_header {
        xml.push_str(
            "<Override PartName=\"/word/header1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml\"/>",
        );
    }
    if has_footer {
        xml.push_str(
            "<Override PartName=\"/word/footer1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml\"/>",
        );
    }
    xml.push_str("</Types>");
    xml
}

fn package_relationships() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{NS_REL}/officeDocument\" Target=\"word/document.xml\"/>\
         </Relationships>"
    )
}

fn document_relationships(has_header: bool, has_footer: bool) -> String {
    let mut xml = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">"
    );
    if has_header {
        xml.push_str(&format!(
            "<Relationship Id=\"{HEADER_REL_ID}\" Type=\"{NS_REL}/header\" Target=\"header1.xml\"/>"
        ));
    }
    if has_footer {
        xml.push_str(&format!(
            "<Relationship Id=\"{FOOTER_REL_ID}\" Type=\"{NS_REL}/footer\" Target=\"footer1.xml\"/>"
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn document_part(doc: &WordDocument, has_header: bool, has_footer: bool) -> String {
    let mut xml = format!(
        "{XML_DECL}<w:document xmlns:w=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\"><w:body>"
    );
    for paragraph in &doc.paragraphs {
        write_paragraph(&mut xml, paragraph);
    }

    xml.push_str("<w:sectPr>");
    if has_header {
        xml.push_str(&format!(
            "<w:headerReference w:type=\"default\" r:id=\"{HEADER_REL_ID}\"/>"
        ));
    }
    if has_footer {
        xml.push_str(&format!(
            "<w:footerReference w:type=\"default\" r:id=\"{FOOTER_REL_ID}\"/>"
        ));
    }
    // A4 in twentieths of a point, one-inch margins.
    xml.push_str(
        "<w:pgSz w:w=\"11906\" w:h=\"16838\"/>\
         <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
         w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/>",
    );
    xml.push_str("</w:sectPr></w:body></w:document>");
    xml
}

/// A header (`hdr`) or footer (`ftr`) part.
fn story_part(root: &str, paragraphs: &[Paragraph]) -> String {
    let mut xml = format!("{XML_DECL}<w:{root} xmlns:w=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\">");
    for paragraph in paragraphs {
        write_paragraph(&mut xml, paragraph);
    }
    xml.push_str(&format!("</w:{root}>"));
    xml
}

// -- Paragraphs and runs ------------------------------------------------------

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    xml.push_str("<w:p>");
    if paragraph.style.is_some() || paragraph.alignment.is_some() {
        xml.push_str("<w:pPr>");
        if let Some(style) = &paragraph.style {
            xml.push_str(&format!("<w:pStyle w:val=\"{}\"/>", escape(style.as_str())));
        }
        if let Some(alignment) = paragraph.alignment {
            xml.push_str(&format!("<w:jc w:val=\"{}\"/>", alignment.as_str()));
        }
        xml.push_str("</w:pPr>");
    }
    for run in &paragraph.runs {
        write_run(xml, run);
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &TextRun) {
    xml.push_str("<w:r>");

    let mut properties = String::new();
    if let Some(font) = &run.font {
        let font = escape(font.as_str());
        properties.push_str(&format!("<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/>"));
    }
    if run.bold {
        properties.push_str("<w:b/>");
    }
    if run.italic {
        properties.push_str("<w:i/>");
    }
    if let Some(color) = &run.color {
        properties.push_str(&format!("<w:color w:val=\"{}\"/>", escape(color.as_str())));
    }
    if let Some(size) = run.size_half_points {
        properties.push_str(&format!("<w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/>"));
    }
    if !properties.is_empty() {
        xml.push_str("<w:rPr>");
        xml.push_str(&properties);
        xml.push_str("</w:rPr>");
    }

    // Tabs and line breaks are elements of their own between text nodes.
    let mut segment = String::new();
    for ch in run.text.chars() {
        match ch {
            '\t' | '\n' => {
                flush_text(xml, &mut segment);
                xml.push_str(if ch == '\t' { "<w:tab/>" } else { "<w:br/>" });
            }
            '\r' => {}
            other => segment.push(other),
        }
    }
    flush_text(xml, &mut segment);
    xml.push_str("</w:r>");
}

fn flush_text(xml: &mut String, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    xml.push_str("<w:t xml:space=\"preserve\">");
    xml.push_str(&escape(segment.as_str()));
    xml.push_str("</w:t>");
    segment.clear();
}
