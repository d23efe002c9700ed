// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// easydoc-tools — Tool registry and dispatcher for EasyDoc.
//
// Turns a tool id, a list of input files and an option bag into a single
// ProcessingResult. Inputs are read asynchronously with tokio; the
// conversions themselves run inline on the codecs in easydoc-document.

pub mod dispatcher;
pub mod packaging;
pub mod readers;
pub mod registry;
pub mod routines;

pub use dispatcher::Dispatcher;
pub use routines::{Outcome, ToolContext};
