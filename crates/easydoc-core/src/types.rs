// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the EasyDoc conversion toolkit.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a selected input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported document types, used for media-type inference and artifact
/// labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Png,
    Jpeg,
    Webp,
    Gif,
    Bmp,
    Tiff,
    PlainText,
    Docx,
    Zip,
}

impl DocumentType {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::PlainText => "text/plain",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Zip => "application/zip",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "txt" => Some(Self::PlainText),
            "docx" => Some(Self::Docx),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }

    /// Infer document type from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PDF points (1/72 inch).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (mm_to_pt(w as f32), mm_to_pt(h as f32))
    }
}

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

// ---------------------------------------------------------------------------
// Tool catalogue
// ---------------------------------------------------------------------------

/// Grouping shown by tool pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolCategory {
    Pdf,
    Word,
    Image,
    Utility,
}

impl ToolCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF Tools",
            Self::Word => "Word Tools",
            Self::Image => "Image Tools",
            Self::Utility => "Utilities",
        }
    }
}

/// Every conversion the dispatcher knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolId {
    ImageToPdf,
    PdfToImage,
    PdfMerge,
    PdfSplit,
    PdfLayout,
    TextToPdf,
    PdfToText,
    PdfWatermark,
    PdfLock,
    WordToPdf,
    PdfToWord,
    WordMerge,
    WordToText,
    WordWatermark,
    ImageConvert,
}

impl ToolId {
    pub const ALL: [ToolId; 15] = [
        Self::ImageToPdf,
        Self::PdfToImage,
        Self::PdfMerge,
        Self::PdfSplit,
        Self::PdfLayout,
        Self::TextToPdf,
        Self::PdfToText,
        Self::PdfWatermark,
        Self::PdfLock,
        Self::WordToPdf,
        Self::PdfToWord,
        Self::WordMerge,
        Self::WordToText,
        Self::WordWatermark,
        Self::ImageConvert,
    ];

    /// Stable string key used by callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImageToPdf => "img-to-pdf",
            Self::PdfToImage => "pdf-to-img",
            Self::PdfMerge => "pdf-merge",
            Self::PdfSplit => "pdf-split",
            Self::PdfLayout => "pdf-layout",
            Self::TextToPdf => "text-to-pdf",
            Self::PdfToText => "pdf-to-text",
            Self::PdfWatermark => "pdf-watermark",
            Self::PdfLock => "pdf-lock",
            Self::WordToPdf => "word-to-pdf",
            Self::PdfToWord => "pdf-to-word",
            Self::WordMerge => "word-merge",
            Self::WordToText => "word-to-text",
            Self::WordWatermark => "word-watermark",
            Self::ImageConvert => "image-convert",
        }
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| format!("unknown tool id: {s}"))
    }
}

/// Static metadata describing one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ToolCategory,
    /// Accepted media-type filter, e.g. `image/*` or `.docx`.
    pub accepts: &'static str,
    /// Whether the tool takes more than one input file.
    pub multiple: bool,
}

/// The ordered tool table consumed by tool pickers.
pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        id: ToolId::ImageToPdf,
        name: "Image to PDF",
        description: "Convert JPG, PNG images to PDF documents.",
        category: ToolCategory::Pdf,
        accepts: "image/*",
        multiple: true,
    },
    ToolDescriptor {
        id: ToolId::PdfToImage,
        name: "PDF to Image",
        description: "Extract pages from PDF as high-quality images.",
        category: ToolCategory::Pdf,
        accepts: "application/pdf",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::PdfMerge,
        name: "PDF Merge",
        description: "Combine multiple PDFs into a single file.",
        category: ToolCategory::Pdf,
        accepts: "application/pdf",
        multiple: true,
    },
    ToolDescriptor {
        id: ToolId::PdfSplit,
        name: "PDF Split",
        description: "Separate PDF pages into individual files.",
        category: ToolCategory::Pdf,
        accepts: "application/pdf",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::PdfLayout,
        name: "PDF Layout",
        description: "Change PDF layout (2-up, 4-up).",
        category: ToolCategory::Pdf,
        accepts: "application/pdf",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::TextToPdf,
        name: "Text to PDF",
        description: "Convert .txt files to PDF format.",
        category: ToolCategory::Pdf,
        accepts: ".txt",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::PdfToText,
        name: "PDF to Text",
        description: "Extract text content from PDF files.",
        category: ToolCategory::Pdf,
        accepts: "application/pdf",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::PdfWatermark,
        name: "Watermark PDF",
        description: "Add text watermarks to your documents.",
        category: ToolCategory::Pdf,
        accepts: "application/pdf",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::PdfLock,
        name: "Lock PDF",
        description: "Encrypt PDF with a password.",
        category: ToolCategory::Pdf,
        accepts: "application/pdf",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::WordToPdf,
        name: "Word to PDF",
        description: "Convert DOCX files to PDF documents.",
        category: ToolCategory::Word,
        accepts: ".docx",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::PdfToWord,
        name: "PDF to Word",
        description: "Convert PDF documents to editable Word files.",
        category: ToolCategory::Word,
        accepts: "application/pdf",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::WordMerge,
        name: "Word Merge",
        description: "Combine multiple Word documents.",
        category: ToolCategory::Word,
        accepts: ".docx",
        multiple: true,
    },
    ToolDescriptor {
        id: ToolId::WordToText,
        name: "Word to Text",
        description: "Extract text from Word documents.",
        category: ToolCategory::Word,
        accepts: ".docx",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::WordWatermark,
        name: "Watermark Word",
        description: "Add text watermark to Word documents.",
        category: ToolCategory::Word,
        accepts: ".docx",
        multiple: false,
    },
    ToolDescriptor {
        id: ToolId::ImageConvert,
        name: "Image Converter",
        description: "Convert images between PNG, JPEG, and WEBP.",
        category: ToolCategory::Image,
        accepts: "image/*",
        multiple: false,
    },
];

// ---------------------------------------------------------------------------
// Inputs and results
// ---------------------------------------------------------------------------

/// Where an input file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already held in memory (e.g. a browser or drag-and-drop buffer).
    Memory(Arc<[u8]>),
    /// A file on disk, read when the dispatcher needs it.
    Path(PathBuf),
}

/// A file selected by the user. Immutable once created.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub id: FileId,
    /// Original file name, including extension.
    pub name: String,
    /// Declared media type (may be empty when unknown).
    pub media_type: String,
    pub source: FileSource,
}

impl InputFile {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            id: FileId::new(),
            name: name.into(),
            media_type: media_type.into(),
            source: FileSource::Memory(data.into()),
        }
    }

    /// Reference a file on disk. The media type is inferred from the
    /// extension; unknown extensions yield `application/octet-stream`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = DocumentType::from_path(&path)
            .map(|t| t.mime_type())
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            id: FileId::new(),
            name,
            media_type,
            source: FileSource::Path(path),
        }
    }
}

/// A produced output: bytes plus the media type to label them with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl Artifact {
    pub fn new(bytes: Vec<u8>, document_type: DocumentType) -> Self {
        Self {
            bytes,
            media_type: document_type.mime_type().to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Uniform outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub success: bool,
    pub artifact: Option<Artifact>,
    pub suggested_name: Option<String>,
    /// Failure cause, or an informational note on success.
    pub message: Option<String>,
    /// Plain-language suggestion attached to failures.
    pub hint: Option<String>,
}

impl ProcessingResult {
    pub fn completed(artifact: Artifact, suggested_name: impl Into<String>) -> Self {
        Self {
            success: true,
            artifact: Some(artifact),
            suggested_name: Some(suggested_name.into()),
            message: None,
            hint: None,
        }
    }

    pub fn failed(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            success: false,
            artifact: None,
            suggested_name: None,
            message: Some(message.into()),
            hint,
        }
    }

    /// Attach an informational note to a result.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
