// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.
//
// Passed once at startup to the dispatcher, which hands the relevant parts to
// each codec wrapper. Nothing here is read from ambient global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Compression used for multi-file archive outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCompression {
    Stored,
    #[default]
    Deflated,
}

/// Settings shared by every conversion routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Page size for newly created documents (image and text to PDF).
    pub paper_size: crate::PaperSize,
    /// Directory containing the pdfium shared library. `None` binds the
    /// system library.
    pub pdfium_library_path: Option<PathBuf>,
    /// Scale factor used when rendering PDF pages to images.
    pub render_scale: f32,
    /// JPEG quality (1-100) for raster re-encoding.
    pub jpeg_quality: u8,
    pub archive_compression: ArchiveCompression,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::A4,
            pdfium_library_path: None,
            render_scale: 2.0,
            jpeg_quality: 90,
            archive_compression: ArchiveCompression::Deflated,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }
}
