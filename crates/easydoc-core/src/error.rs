// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for EasyDoc.

use thiserror::Error;

/// Top-level error type for all EasyDoc operations.
#[derive(Debug, Error)]
pub enum EasydocError {
    // -- Input / option errors --
    #[error("No files provided")]
    NoFiles,

    #[error("Password is required to lock the PDF.")]
    MissingPassword,

    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    // -- Codec errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("Word document operation failed: {0}")]
    WordError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("page rendering failed: {0}")]
    RenderError(String),

    #[error("archive creation failed: {0}")]
    ArchiveError(String),

    // -- Storage / configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Containment --
    /// A conversion routine panicked; the payload text is kept for logs.
    #[error("Processing failed.")]
    Internal(String),
}

/// Coarse classification of an [`EasydocError`], used by callers that only
/// care about who has to act on a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No input files were supplied.
    InputMissing,
    /// A tool option was missing or malformed.
    OptionInvalid,
    /// A parse, build, or encode step rejected the input.
    CodecFailure,
    /// A file could not be read or a configuration file could not be loaded.
    IoFailure,
    /// A routine broke its own contract.
    Internal,
}

impl EasydocError {
    /// Convenience constructor for [`EasydocError::InvalidOption`].
    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFiles => ErrorKind::InputMissing,
            Self::MissingPassword | Self::InvalidOption { .. } => ErrorKind::OptionInvalid,
            Self::PdfError(_)
            | Self::WordError(_)
            | Self::ImageError(_)
            | Self::RenderError(_)
            | Self::ArchiveError(_) => ErrorKind::CodecFailure,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::IoFailure,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EasydocError>;
