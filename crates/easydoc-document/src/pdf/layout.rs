// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// N-up layout — place 2 or 4 source pages, scaled down, on each A4 sheet.
//
// Each source page is wrapped in a Form XObject (its content and resources,
// bounded by its MediaBox) and drawn on the sheet with a scaling `cm`.

use easydoc_core::error::EasydocError;
use easydoc_core::options::PagesPerSheet;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument};

use super::assemble::{ObjectCloner, PdfAssembler, media_box, page_content, page_resources};
use super::reader::PdfReader;

/// A4 portrait in points.
pub const SHEET_WIDTH: f32 = 595.28;
pub const SHEET_HEIGHT: f32 = 841.89;

/// Lower-left corner of `slot` on the sheet for a page of `page_width`.
pub fn slot_placement(pages_per_sheet: PagesPerSheet, slot: usize, page_width: f32) -> (f32, f32) {
    match pages_per_sheet {
        PagesPerSheet::Two => {
            let scaled = page_width * pages_per_sheet.scale();
            let x = (SHEET_WIDTH - scaled) / 2.0;
            let y = if slot == 0 { SHEET_HEIGHT / 2.0 + 20.0 } else { 20.0 };
            (x, y)
        }
        PagesPerSheet::Four => {
            let (column, row) = (slot % 2, slot / 2);
            let x = if column == 0 { 20.0 } else { SHEET_WIDTH / 2.0 + 10.0 };
            let y = if row == 0 { SHEET_HEIGHT / 2.0 + 10.0 } else { 20.0 };
            (x, y)
        }
    }
}

/// Lay the document out N-up. The last sheet may have empty slots.
#[instrument(skip(reader), fields(pages = reader.page_count()))]
pub fn layout_n_up(
    reader: &PdfReader,
    pages_per_sheet: PagesPerSheet,
) -> Result<Vec<u8>, EasydocError> {
    let source = reader.document();
    let page_ids = reader.page_ids();
    let per_sheet = pages_per_sheet.count();
    let scale = pages_per_sheet.scale();

    let mut assembler = PdfAssembler::new();
    let mut cloner = ObjectCloner::new(source);

    for chunk in page_ids.chunks(per_sheet) {
        let mut xobjects = Dictionary::new();
        let mut operations = Vec::new();

        for (slot, &page_id) in chunk.iter().enumerate() {
            let bbox = media_box(source, page_id);
            let form_id = embed_page_as_form(&mut assembler, &mut cloner, page_id, bbox);
            let name = format!("P{}", slot);
            xobjects.set(name.as_bytes().to_vec(), Object::Reference(form_id));

            let (x, y) = slot_placement(pages_per_sheet, slot, bbox[2] - bbox[0]);
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    scale.into(),
                    0.0f32.into(),
                    0.0f32.into(),
                    scale.into(),
                    (x - bbox[0] * scale).into(),
                    (y - bbox[1] * scale).into(),
                ],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations }.encode().map_err(|err| {
            EasydocError::PdfError(format!("failed to encode sheet content: {}", err))
        })?;
        assembler.push_page(
            [0.0, 0.0, SHEET_WIDTH, SHEET_HEIGHT],
            dictionary! { "XObject" => xobjects },
            content,
        )?;
        debug!(sheet = assembler.page_count(), slots = chunk.len(), "Sheet laid out");
    }

    info!(
        sheets = assembler.page_count(),
        per_sheet, "N-up layout complete"
    );
    assembler.into_bytes()
}

fn embed_page_as_form(
    assembler: &mut PdfAssembler,
    cloner: &mut ObjectCloner<'_>,
    page_id: ObjectId,
    bbox: [f32; 4],
) -> ObjectId {
    let source_resources = Object::Dictionary(page_resources(cloner.source(), page_id));
    let content = page_content(cloner.source(), page_id);

    let target = assembler.document_mut();
    let resources = cloner.clone_object(target, &source_resources);
    let form = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => bbox.iter().map(|&v| Object::Real(v)).collect::<Vec<Object>>(),
            "Resources" => resources,
        },
        content,
    );
    target.add_object(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::assemble::tests::sample_pdf;
    use crate::pdf::text::extract_text;

    fn sheets(pages: usize, mode: PagesPerSheet) -> usize {
        let reader = PdfReader::from_bytes(&sample_pdf("Page", pages)).unwrap();
        let output = layout_n_up(&reader, mode).unwrap();
        PdfReader::from_bytes(&output).unwrap().page_count()
    }

    #[test]
    fn two_up_sheet_count_rounds_up() {
        assert_eq!(sheets(1, PagesPerSheet::Two), 1);
        assert_eq!(sheets(4, PagesPerSheet::Two), 2);
        assert_eq!(sheets(5, PagesPerSheet::Two), 3);
    }

    #[test]
    fn four_up_sheet_count_rounds_up() {
        assert_eq!(sheets(4, PagesPerSheet::Four), 1);
        assert_eq!(sheets(5, PagesPerSheet::Four), 2);
        assert_eq!(sheets(9, PagesPerSheet::Four), 3);
    }

    #[test]
    fn two_up_slots_are_centred_and_stacked() {
        let (x0, y0) = slot_placement(PagesPerSheet::Two, 0, 595.0);
        let (x1, y1) = slot_placement(PagesPerSheet::Two, 1, 595.0);
        assert_eq!(x0, x1);
        assert!((x0 - (SHEET_WIDTH - 595.0 * 0.65) / 2.0).abs() < 1e-3);
        assert!((y0 - (SHEET_HEIGHT / 2.0 + 20.0)).abs() < 1e-3);
        assert_eq!(y1, 20.0);
    }

    #[test]
    fn four_up_slots_form_a_grid() {
        let corners: Vec<(f32, f32)> = (0..4)
            .map(|slot| slot_placement(PagesPerSheet::Four, slot, 595.0))
            .collect();
        let top = SHEET_HEIGHT / 2.0 + 10.0;
        let right = SHEET_WIDTH / 2.0 + 10.0;
        assert_eq!(corners, vec![(20.0, top), (right, top), (20.0, 20.0), (right, 20.0)]);
    }

    #[test]
    fn source_text_survives_inside_forms() {
        let reader = PdfReader::from_bytes(&sample_pdf("Slot", 3)).unwrap();
        let output = layout_n_up(&reader, PagesPerSheet::Two).unwrap();
        let text = extract_text(&PdfReader::from_bytes(&output).unwrap());
        assert!(text.contains("--- Page 1 ---\nSlot 1 Slot 2\n"));
        assert!(text.contains("--- Page 2 ---\nSlot 3\n"));
    }
}
