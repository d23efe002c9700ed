// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF page rasterisation through pdfium.

use std::io::Cursor;
use std::path::PathBuf;

use easydoc_core::config::EngineConfig;
use easydoc_core::error::EasydocError;
use image::ImageFormat;
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument, warn};

/// Renders PDF pages to PNG.
///
/// Holds only the binding location; the pdfium library is bound for each
/// render call so the renderer itself stays `Send + Sync`.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    /// Directory containing the pdfium shared library, `None` for the system
    /// library search path.
    library_path: Option<PathBuf>,
    scale: f32,
}

impl PdfRenderer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            library_path: config.pdfium_library_path.clone(),
            scale: config.render_scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn bind(&self) -> Result<Pdfium, EasydocError> {
        let bindings = match &self.library_path {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|err| {
            EasydocError::RenderError(format!("cannot load the pdfium library: {:?}", err))
        })?;
        Ok(Pdfium::new(bindings))
    }

    /// Render every page to a PNG, in page order.
    #[instrument(skip_all, fields(bytes_len = data.len(), scale = self.scale))]
    pub fn render_pages(&self, data: &[u8]) -> Result<Vec<Vec<u8>>, EasydocError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(map_pdfium_error)?;

        let config = PdfRenderConfig::new().scale_page_by_factor(self.scale);
        let mut images = Vec::new();

        for (index, page) in document.pages().iter().enumerate() {
            let bitmap = page.render_with_config(&config).map_err(|err| {
                EasydocError::RenderError(format!("page {} failed to render: {:?}", index + 1, err))
            })?;
            let image = bitmap.as_image();
            debug!(
                page = index + 1,
                width = image.width(),
                height = image.height(),
                "Page rendered"
            );

            let mut png = Vec::new();
            image
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|err| {
                    EasydocError::ImageError(format!("failed to encode page {}: {}", index + 1, err))
                })?;
            images.push(png);
        }

        info!(pages = images.len(), "PDF rendered to images");
        Ok(images)
    }
}

fn map_pdfium_error(err: PdfiumError) -> EasydocError {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            EasydocError::PdfError("document is password protected".to_string())
        }
        other => {
            warn!(error = ?other, "pdfium rejected the document");
            EasydocError::RenderError(format!("failed to open PDF for rendering: {:?}", other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_scale_from_config() {
        let config = EngineConfig {
            render_scale: 3.0,
            ..EngineConfig::default()
        };
        assert_eq!(PdfRenderer::new(&config).scale(), 3.0);
    }

    #[test]
    fn missing_library_is_a_render_error() {
        let config = EngineConfig {
            pdfium_library_path: Some(PathBuf::from("/nonexistent/pdfium/dir")),
            ..EngineConfig::default()
        };
        let err = PdfRenderer::new(&config).render_pages(b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, EasydocError::RenderError(_)));
    }
}
