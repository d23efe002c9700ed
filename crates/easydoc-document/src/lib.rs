// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// easydoc-document — Document codecs for EasyDoc.
//
// Provides PDF operations (create, merge, split, N-up layout, watermark, lock,
// text extraction, rendering), Word (.docx) reading and writing, raster image
// re-encoding, and in-memory zip archives. Everything here is synchronous and
// works on bytes; reading inputs and choosing output names is left to callers.

pub mod archive;
pub mod image;
pub mod pdf;
pub mod word;

// Re-export the primary structs so callers can use `easydoc_document::PdfReader` etc.
pub use archive::ArchiveBuilder;
pub use crate::image::processor::ImageProcessor;
pub use pdf::reader::PdfReader;
pub use pdf::render::PdfRenderer;
pub use pdf::writer::PdfWriter;
pub use word::model::WordDocument;
