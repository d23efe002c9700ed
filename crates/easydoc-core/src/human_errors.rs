// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how a front end presents the failure.

use crate::error::EasydocError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user has to change something (pick files, fill in a field).
    ActionRequired,
    /// The input itself cannot be processed by this tool.
    Permanent,
    /// Something in the environment failed; trying again may help.
    Transient,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same input could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `EasydocError` into a `HumanError`.
pub fn humanize_error(err: &EasydocError) -> HumanError {
    match err {
        EasydocError::NoFiles => HumanError {
            message: "No files were selected.".into(),
            suggestion: "Choose or drop at least one file, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EasydocError::MissingPassword => HumanError {
            message: "A password is needed.".into(),
            suggestion: "Type the password you want to protect the PDF with.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EasydocError::InvalidOption { name, .. } => HumanError {
            message: "One of the settings isn't valid.".into(),
            suggestion: format!("Check the \"{name}\" setting and pick one of the offered values."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EasydocError::PdfError(detail) => {
            if detail.contains("encrypt") || detail.contains("password") {
                HumanError {
                    message: "This PDF is password protected.".into(),
                    suggestion: "Unlock the PDF in another program first, then try again.".into(),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: "We couldn't read this PDF.".into(),
                    suggestion: "The file may be damaged or not really a PDF. Try opening it in a PDF viewer and saving a fresh copy.".into(),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            }
        }

        EasydocError::WordError(_) => HumanError {
            message: "We couldn't read this Word document.".into(),
            suggestion: "Only .docx files are supported. Re-save older .doc files as .docx first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        EasydocError::ImageError(_) => HumanError {
            message: "We couldn't read this image.".into(),
            suggestion: "Try a PNG or JPEG file instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        EasydocError::RenderError(_) => HumanError {
            message: "Pages couldn't be turned into images.".into(),
            suggestion: "The PDF renderer isn't available or rejected the file. Check that the pdfium library is installed.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        EasydocError::ArchiveError(_) => HumanError {
            message: "The download bundle couldn't be created.".into(),
            suggestion: "Try again with fewer pages or files.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        EasydocError::Io(_) => HumanError {
            message: "A file couldn't be opened.".into(),
            suggestion: "Make sure the file still exists and you have permission to read it, then select it again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        EasydocError::Serialization(_) => HumanError {
            message: "Settings couldn't be read.".into(),
            suggestion: "Check the configuration file for typos.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EasydocError::Internal(_) => HumanError {
            message: "Something went wrong while converting.".into(),
            suggestion: "Try again. If it keeps failing, this file trips up the converter; try re-saving it first.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_password_needs_user_action() {
        let human = humanize_error(&EasydocError::MissingPassword);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn encrypted_pdf_is_recognised() {
        let human = humanize_error(&EasydocError::PdfError(
            "failed to load PDF from memory: document is encrypted".into(),
        ));
        assert_eq!(human.message, "This PDF is password protected.");
    }

    #[test]
    fn io_errors_are_retriable() {
        let err = EasydocError::from(std::io::Error::other("disk unplugged"));
        assert!(humanize_error(&err).retriable);
    }

    #[test]
    fn internal_failures_keep_the_generic_message() {
        let err = EasydocError::Internal("index out of bounds".into());
        assert_eq!(err.to_string(), "Processing failed.");
        assert!(humanize_error(&err).retriable);
    }

    #[test]
    fn invalid_option_names_the_setting() {
        let human = humanize_error(&EasydocError::invalid_option("layoutMode", "bad"));
        assert!(human.suggestion.contains("layoutMode"));
    }
}
