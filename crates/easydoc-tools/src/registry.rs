// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool id to routine mapping.

use easydoc_core::error::Result;
use easydoc_core::options::ConversionOptions;
use easydoc_core::types::{InputFile, ToolId};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::routines::{self, Outcome, ToolContext};

/// Start the routine for `tool`. Every known tool has exactly one routine;
/// the match is exhaustive so a new `ToolId` cannot go unrouted.
pub fn run<'a>(
    tool: ToolId,
    ctx: &'a ToolContext,
    files: &'a [InputFile],
    options: &'a ConversionOptions,
) -> BoxFuture<'a, Result<Outcome>> {
    match tool {
        ToolId::ImageToPdf => routines::pdf::images_to_pdf(ctx, files).boxed(),
        ToolId::PdfToImage => routines::pdf::to_images(ctx, files).boxed(),
        ToolId::PdfMerge => routines::pdf::merge(files).boxed(),
        ToolId::PdfSplit => routines::pdf::split(ctx, files).boxed(),
        ToolId::PdfLayout => routines::pdf::layout(files, options).boxed(),
        ToolId::TextToPdf => routines::pdf::text_to_pdf(ctx, files).boxed(),
        ToolId::PdfToText => routines::pdf::to_text(files).boxed(),
        ToolId::PdfWatermark => routines::pdf::watermark(files, options).boxed(),
        ToolId::PdfLock => routines::pdf::lock(files, options).boxed(),
        ToolId::WordToPdf => routines::word::to_pdf(ctx, files).boxed(),
        ToolId::PdfToWord => routines::word::from_pdf(files).boxed(),
        ToolId::WordMerge => routines::word::merge(files).boxed(),
        ToolId::WordToText => routines::word::to_text(files).boxed(),
        ToolId::WordWatermark => routines::word::watermark(files, options).boxed(),
        ToolId::ImageConvert => routines::image::convert(ctx, files, options).boxed(),
    }
}
