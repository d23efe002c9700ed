// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the PDF paths in the easydoc-document crate:
// text layout, merging, N-up layout, and text extraction over a synthetic
// multi-page document.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use easydoc_core::options::PagesPerSheet;
use easydoc_document::pdf::layout::layout_n_up;
use easydoc_document::pdf::text::extract_text;
use easydoc_document::{PdfReader, PdfWriter};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// About 120 lines of prose, which lays out to four A4 pages.
fn sample_text() -> String {
    (1..=120)
        .map(|n| format!("Line {n}: the quick brown fox jumps over the lazy dog."))
        .collect::<Vec<_>>()
        .join("\n")
}

fn sample_pdf() -> Vec<u8> {
    PdfWriter::a4()
        .create_from_text(&sample_text())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_text_to_pdf(c: &mut Criterion) {
    let text = sample_text();
    c.bench_function("text_to_pdf (120 lines)", |b| {
        b.iter(|| black_box(PdfWriter::a4().create_from_text(black_box(&text))));
    });
}

fn bench_merge(c: &mut Criterion) {
    let bytes = sample_pdf();
    c.bench_function("merge (2 x 4 pages)", |b| {
        b.iter(|| {
            let readers: Vec<PdfReader> = (0..2)
                .filter_map(|_| PdfReader::from_bytes(black_box(&bytes)).ok())
                .collect();
            black_box(PdfReader::merge(&readers))
        });
    });
}

fn bench_layout(c: &mut Criterion) {
    let bytes = sample_pdf();
    let Ok(reader) = PdfReader::from_bytes(&bytes) else {
        return;
    };
    c.bench_function("layout 4-up (4 pages)", |b| {
        b.iter(|| black_box(layout_n_up(black_box(&reader), PagesPerSheet::Four)));
    });
}

fn bench_extract_text(c: &mut Criterion) {
    let bytes = sample_pdf();
    let Ok(reader) = PdfReader::from_bytes(&bytes) else {
        return;
    };
    c.bench_function("extract_text (4 pages)", |b| {
        b.iter(|| black_box(extract_text(black_box(&reader))));
    });
}

criterion_group!(
    benches,
    bench_text_to_pdf,
    bench_merge,
    bench_layout,
    bench_extract_text
);
criterion_main!(benches);
