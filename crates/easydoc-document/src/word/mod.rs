// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word (.docx) module — read body text, render to HTML, compose and write
// new documents.

pub mod compose;
pub mod html;
pub mod model;
pub mod reader;
pub mod writer;

pub use model::{Paragraph, TextRun, WordDocument};
pub use reader::{extract_raw_text, read_docx};
pub use writer::write_docx;
