// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode raster images (raw bytes or `data:` URIs) and
// re-encode them as PNG, JPEG, or WebP using the `image` crate.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use easydoc_core::error::EasydocError;
use easydoc_core::options::RasterFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

/// A single decoded in-memory image.
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, EasydocError> {
        let img = image::load_from_memory(data).map_err(|err| {
            EasydocError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Decode a `data:<media-type>;base64,<payload>` URI.
    #[instrument(skip(uri), fields(uri_len = uri.len()))]
    pub fn from_data_uri(uri: &str) -> Result<Self, EasydocError> {
        let payload = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .filter(|(header, _)| header.ends_with(";base64"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| {
                EasydocError::ImageError("not a base64 data URI".to_string())
            })?;
        let data = STANDARD.decode(payload.trim()).map_err(|err| {
            EasydocError::ImageError(format!("invalid base64 in data URI: {}", err))
        })?;
        Self::from_bytes(&data)
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Output ---------------------------------------------------------------

    /// Encode in `format`; `jpeg_quality` applies to JPEG only.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn encode(&self, format: RasterFormat, jpeg_quality: u8) -> Result<Vec<u8>, EasydocError> {
        let bytes = match format {
            RasterFormat::Png => self.to_png_bytes()?,
            RasterFormat::Jpeg => self.to_jpeg_bytes(jpeg_quality)?,
            RasterFormat::Webp => self.to_webp_bytes()?,
        };
        debug!(output_bytes = bytes.len(), ?format, "Image encoded");
        Ok(bytes)
    }

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, EasydocError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    /// Alpha is discarded.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, EasydocError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder).map_err(|err| {
            EasydocError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    /// Encode the current image as lossless WebP.
    pub fn to_webp_bytes(&self) -> Result<Vec<u8>, EasydocError> {
        let mut buffer = Vec::new();
        let rgba = self.image.to_rgba8();
        rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buffer))
            .map_err(|err| EasydocError::ImageError(format!("WebP encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, EasydocError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| EasydocError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}
