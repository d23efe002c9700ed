// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading, merging, splitting, laying out, stamping, locking,
// text extraction, rendering, and creating PDFs.

pub mod assemble;
pub mod fonts;
pub mod layout;
pub mod reader;
pub mod render;
pub mod text;
pub mod watermark;
pub mod writer;

pub use reader::PdfReader;
pub use render::PdfRenderer;
pub use writer::PdfWriter;
