// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-text extraction from PDF content streams.
//
// Every string shown by a text operator (Tj, ', ", TJ) becomes one fragment;
// fragments on a page are joined with single spaces. Strings are decoded
// through the current font's encoding (WinAnsi and friends, or a ToUnicode
// CMap for CID fonts). Strings shown before any known font fall back to
// UTF-16BE with a byte-order mark, or Latin-1.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Encoding, Object, ObjectId};
use tracing::{debug, instrument, warn};

use super::assemble::{page_content, page_resources};
use super::reader::PdfReader;

/// Form XObjects may nest; stop following `Do` beyond this depth.
const MAX_FORM_DEPTH: usize = 8;

/// TJ kerning adjustments at or below this (in 1/1000 em) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = -200.0;

/// Text of every page, each as `--- Page <n> ---\n<text>\n\n`.
#[instrument(skip_all, fields(pages = reader.page_count()))]
pub fn extract_text(reader: &PdfReader) -> String {
    let mut output = String::new();
    for (index, page_id) in reader.page_ids().into_iter().enumerate() {
        let text = page_text(reader.document(), page_id);
        output.push_str(&format!("--- Page {} ---\n{}\n\n", index + 1, text));
    }
    debug!(chars = output.len(), "Text extracted");
    output
}

/// Fragments of one page joined by single spaces.
pub fn page_text(document: &Document, page_id: ObjectId) -> String {
    let resources = page_resources(document, page_id);
    let mut fragments = Vec::new();
    collect_fragments(
        document,
        &page_content(document, page_id),
        &resources,
        0,
        &mut fragments,
    );
    fragments.join(" ")
}

/// Encodings of the fonts in `resources`, keyed by resource name.
fn font_encodings<'a>(
    document: &'a Document,
    resources: &'a Dictionary,
) -> BTreeMap<Vec<u8>, Encoding<'a>> {
    let mut encodings = BTreeMap::new();
    let Some(fonts) = resources
        .get(b"Font")
        .ok()
        .and_then(|fonts| deref(document, fonts))
        .and_then(|fonts| fonts.as_dict().ok())
    else {
        return encodings;
    };

    for (name, font) in fonts.iter() {
        let Some(font) = deref(document, font).and_then(|font| font.as_dict().ok()) else {
            continue;
        };
        match font.get_font_encoding(document) {
            Ok(encoding) => {
                encodings.insert(name.clone(), encoding);
            }
            Err(err) => {
                debug!(font = %String::from_utf8_lossy(name), %err, "Font has no usable encoding");
            }
        }
    }
    encodings
}

fn collect_fragments(
    document: &Document,
    content: &[u8],
    resources: &Dictionary,
    depth: usize,
    fragments: &mut Vec<String>,
) {
    let operations = match Content::decode(content) {
        Ok(content) => content.operations,
        Err(err) => {
            warn!(%err, "Skipping undecodable content stream");
            return;
        }
    };

    let encodings = font_encodings(document, resources);
    let mut current: Option<&Encoding> = None;

    for op in operations {
        match op.operator.as_str() {
            "Tf" => {
                current = op
                    .operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Tj" | "'" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    push_fragment(fragments, decode_shown(current, bytes));
                }
            }
            "\"" => {
                // aw ac string
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    push_fragment(fragments, decode_shown(current, bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    push_fragment(fragments, decode_tj_array(current, items));
                }
            }
            "Do" => {
                if depth >= MAX_FORM_DEPTH {
                    continue;
                }
                let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) else {
                    continue;
                };
                if let Some((form_content, form_resources)) =
                    resolve_form(document, resources, name)
                {
                    let inner = form_resources.unwrap_or_else(|| resources.clone());
                    collect_fragments(document, &form_content, &inner, depth + 1, fragments);
                }
            }
            _ => {}
        }
    }
}

fn push_fragment(fragments: &mut Vec<String>, text: String) {
    if !text.is_empty() {
        fragments.push(text);
    }
}

fn decode_tj_array(encoding: Option<&Encoding>, items: &[Object]) -> String {
    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&decode_shown(encoding, bytes)),
            Object::Integer(_) | Object::Real(_) => {
                let adjust = item.as_float().unwrap_or(0.0);
                if adjust <= TJ_SPACE_THRESHOLD && !text.ends_with(' ') {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }
    text
}

/// Decode a shown string through the font encoding, if there is one.
fn decode_shown(encoding: Option<&Encoding>, bytes: &[u8]) -> String {
    if let Some(encoding) = encoding {
        match Document::decode_text(encoding, bytes) {
            Ok(text) => return text,
            Err(err) => debug!(%err, "Font encoding failed; decoding bytes directly"),
        }
    }
    decode_pdf_string(bytes)
}

/// Decode a string without font information: UTF-16BE with BOM, otherwise
/// Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// Look up `/XObject/<name>` and return its decoded content if it is a form.
fn resolve_form(
    document: &Document,
    resources: &Dictionary,
    name: &[u8],
) -> Option<(Vec<u8>, Option<Dictionary>)> {
    let xobjects = deref(document, resources.get(b"XObject").ok()?)?.as_dict().ok()?;
    let stream = deref(document, xobjects.get(name).ok()?)?.as_stream().ok()?;

    let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok()?;
    if subtype != b"Form" {
        return None;
    }

    let form_resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .and_then(|res| deref(document, res))
        .and_then(|res| res.as_dict().ok())
        .cloned();

    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    Some((content, form_resources))
}

fn deref<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}
