// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text watermark stamped over every page of an existing PDF.

use easydoc_core::error::EasydocError;
use easydoc_core::options::{WatermarkOptions, WatermarkPosition};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::{debug, info, instrument};

use super::assemble::{media_box, page_resources};
use super::fonts::{StandardFont, encode_win_ansi};
use super::reader::PdfReader;

pub const WATERMARK_FONT_SIZE: f32 = 50.0;

/// Distance from the top or bottom edge for the `top`/`bottom` anchors.
const EDGE_OFFSET: f32 = 100.0;

// Resource names unlikely to collide with anything already on the page.
const FONT_RESOURCE: &str = "EasydocWmFont";
const STATE_RESOURCE: &str = "EasydocWmGs";

/// Baseline origin of the watermark text on a `width` x `height` page.
pub fn watermark_origin(
    position: WatermarkPosition,
    font: StandardFont,
    text: &str,
    width: f32,
    height: f32,
) -> (f32, f32) {
    let text_width = font.text_width(text, WATERMARK_FONT_SIZE);
    let text_height = font.height_at(WATERMARK_FONT_SIZE);
    let x = width / 2.0 - text_width / 2.0;
    let y = match position {
        WatermarkPosition::Top => height - EDGE_OFFSET,
        WatermarkPosition::Middle => height / 2.0 - text_height / 2.0,
        WatermarkPosition::Bottom => EDGE_OFFSET,
    };
    (x, y)
}

/// Return a copy of the document with `options.text` drawn on every page.
#[instrument(skip_all, fields(pages = reader.page_count(), position = ?options.position))]
pub fn apply_watermark(
    reader: &PdfReader,
    options: &WatermarkOptions,
) -> Result<Vec<u8>, EasydocError> {
    let mut doc = reader.document().clone();
    let font = StandardFont::from(options.font);

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    });
    let state_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => Object::Real(options.opacity),
    });
    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

    for page_id in reader.page_ids() {
        let bbox = media_box(&doc, page_id);
        let (x, y) = watermark_origin(
            options.position,
            font,
            &options.text,
            bbox[2] - bbox[0],
            bbox[3] - bbox[1],
        );
        let stamp = stamp_content(options, bbox[0] + x, bbox[1] + y)?;
        let stamp_id = doc.add_object(Stream::new(Dictionary::new(), stamp));

        let resources = watermark_resources(&doc, page_id, font_id, state_id);
        let contents = wrapped_contents(&doc, page_id, save_id, stamp_id);

        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| EasydocError::PdfError(format!("cannot edit page: {}", err)))?;
        page.set("Resources", resources);
        page.set("Contents", contents);
        debug!(?page_id, x, y, "Watermark placed");
    }

    doc.compress();
    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(|err| {
        EasydocError::PdfError(format!("failed to serialise watermarked PDF: {}", err))
    })?;

    info!(output_bytes = output.len(), "Watermark applied");
    Ok(output)
}

fn stamp_content(options: &WatermarkOptions, x: f32, y: f32) -> Result<Vec<u8>, EasydocError> {
    let (r, g, b) = options.color.to_unit();
    let operations = vec![
        // Closes the `q` pushed ahead of the original content.
        Operation::new("Q", vec![]),
        Operation::new("q", vec![]),
        Operation::new("gs", vec![Object::Name(STATE_RESOURCE.into())]),
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(FONT_RESOURCE.into()), WATERMARK_FONT_SIZE.into()],
        ),
        Operation::new("rg", vec![r.into(), g.into(), b.into()]),
        Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&options.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ];
    Content { operations }
        .encode()
        .map_err(|err| EasydocError::PdfError(format!("failed to encode watermark: {}", err)))
}

/// The page's effective resources as an owned dictionary, plus our font and
/// graphics state.
fn watermark_resources(
    doc: &Document,
    page_id: ObjectId,
    font_id: ObjectId,
    state_id: ObjectId,
) -> Dictionary {
    let mut resources = page_resources(doc, page_id);

    let mut fonts = owned_subdictionary(doc, &resources, b"Font");
    fonts.set(FONT_RESOURCE, Object::Reference(font_id));
    resources.set("Font", fonts);

    let mut states = owned_subdictionary(doc, &resources, b"ExtGState");
    states.set(STATE_RESOURCE, Object::Reference(state_id));
    resources.set("ExtGState", states);

    resources
}

fn owned_subdictionary(doc: &Document, resources: &Dictionary, key: &[u8]) -> Dictionary {
    match resources.get(key) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).cloned().unwrap_or_default(),
        _ => Dictionary::new(),
    }
}

/// `[save, original..., stamp]` so the original content's graphics state
/// cannot leak into the watermark.
fn wrapped_contents(doc: &Document, page_id: ObjectId, save_id: ObjectId, stamp_id: ObjectId) -> Object {
    let mut streams = vec![Object::Reference(save_id)];
    streams.extend(
        doc.get_page_contents(page_id)
            .into_iter()
            .map(Object::Reference),
    );
    streams.push(Object::Reference(stamp_id));
    Object::Array(streams)
}
