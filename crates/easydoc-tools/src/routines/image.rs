// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster re-encoding.

use easydoc_core::error::Result;
use easydoc_core::options::{ConversionOptions, ImageOptions};
use easydoc_core::types::InputFile;
use easydoc_document::ImageProcessor;
use tracing::{info, instrument};

use super::{Outcome, ToolContext, first_file};
use crate::packaging;
use crate::readers::read_data_uri;

/// Re-encode to the requested format, or swap PNG and JPEG when none is
/// given.
#[instrument(skip_all)]
pub async fn convert(
    ctx: &ToolContext,
    files: &[InputFile],
    options: &ConversionOptions,
) -> Result<Outcome> {
    let image_options = ImageOptions::try_from(options)?;
    let file = first_file(files)?;
    let target = image_options.resolve(&file.media_type);
    let uri = read_data_uri(file).await?;

    let processor = ImageProcessor::from_data_uri(&uri)?;
    let bytes = processor.encode(target, ctx.config.jpeg_quality)?;
    info!(
        from = %file.media_type,
        to = target.extension(),
        width = processor.width(),
        height = processor.height(),
        "Image converted"
    );
    Ok(Outcome::new(
        bytes,
        target.document_type(),
        packaging::converted_image_name(target.extension()),
    ))
}
