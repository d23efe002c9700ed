// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The dispatch boundary: tool id, files and options in, ProcessingResult
// out. Routine errors and panics both come back as failed results.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use easydoc_core::config::EngineConfig;
use easydoc_core::error::{EasydocError, Result};
use easydoc_core::human_errors::humanize_error;
use easydoc_core::options::ConversionOptions;
use easydoc_core::types::{Artifact, DocumentType, InputFile, ProcessingResult, ToolId};
use futures::FutureExt;
use sha2::{Digest, Sha256};
use tracing::{Instrument, error, info, info_span, warn};

use crate::packaging;
use crate::registry;
use crate::routines::{Outcome, ToolContext};

pub const MAINTENANCE_MESSAGE: &str = "Tool under maintenance.";
const FALLBACK_FAILURE: &str = "Processing failed.";

/// Routes conversion requests to their routines.
///
/// Holds only immutable configuration, so one dispatcher can serve any
/// number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    ctx: ToolContext,
}

impl Dispatcher {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            ctx: ToolContext::new(config),
        }
    }

    /// Run `tool_id` over `files`.
    ///
    /// Unknown tool ids succeed with a placeholder artifact and a
    /// maintenance note instead of failing.
    pub async fn process(
        &self,
        tool_id: &str,
        files: &[InputFile],
        options: &ConversionOptions,
    ) -> ProcessingResult {
        let span = info_span!("dispatch", tool = tool_id, files = files.len());
        self.process_inner(tool_id, files, options)
            .instrument(span)
            .await
    }

    async fn process_inner(
        &self,
        tool_id: &str,
        files: &[InputFile],
        options: &ConversionOptions,
    ) -> ProcessingResult {
        if files.is_empty() {
            return failure(EasydocError::NoFiles);
        }

        let tool = match tool_id.parse::<ToolId>() {
            Ok(tool) => tool,
            Err(reason) => {
                warn!(%reason, "No routine registered; returning placeholder");
                return placeholder();
            }
        };

        contain(registry::run(tool, &self.ctx, files, options)).await
    }
}

/// Await a routine, turning its error or panic into a failed result.
async fn contain(routine: impl Future<Output = Result<Outcome>>) -> ProcessingResult {
    match AssertUnwindSafe(routine).catch_unwind().await {
        Ok(Ok(outcome)) => success(outcome),
        Ok(Err(err)) => failure(err),
        Err(payload) => failure(EasydocError::Internal(panic_text(payload.as_ref()))),
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Hex SHA-256 of `data`.
pub fn fingerprint(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn success(outcome: Outcome) -> ProcessingResult {
    info!(
        name = %outcome.name,
        output_bytes = outcome.artifact.len(),
        sha256 = %fingerprint(&outcome.artifact.bytes),
        "Tool completed"
    );
    let result = ProcessingResult::completed(outcome.artifact, outcome.name);
    match outcome.message {
        Some(message) => result.with_message(message),
        None => result,
    }
}

fn failure(err: EasydocError) -> ProcessingResult {
    let hint = humanize_error(&err);
    error!(error = %err, kind = ?err.kind(), "Tool failed");
    let mut message = err.to_string();
    if message.is_empty() {
        message = FALLBACK_FAILURE.to_string();
    }
    ProcessingResult::failed(message, Some(hint.suggestion))
}

fn placeholder() -> ProcessingResult {
    let artifact = Artifact::new(MAINTENANCE_MESSAGE.as_bytes().to_vec(), DocumentType::PlainText);
    ProcessingResult::completed(artifact, packaging::PLACEHOLDER).with_message(MAINTENANCE_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routines::fixtures::{docx_file, pdf_file, png_file};

    fn exactly_one_outcome(result: &ProcessingResult) {
        if result.success {
            assert!(result.artifact.is_some());
            assert!(result.suggested_name.is_some());
        } else {
            assert!(result.artifact.is_none());
            assert!(result.message.is_some());
        }
    }

    #[tokio::test]
    async fn no_files_is_a_failure() {
        let dispatcher = Dispatcher::default();
        let result = dispatcher
            .process("pdf-merge", &[], &ConversionOptions::default())
            .await;

        exactly_one_outcome(&result);
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("No files provided"));
        assert!(result.hint.is_some());
    }

    #[tokio::test]
    async fn unknown_tool_returns_placeholder() {
        let dispatcher = Dispatcher::default();
        let result = dispatcher
            .process("zip-tool", &[pdf_file("a.pdf", 1)], &ConversionOptions::default())
            .await;

        exactly_one_outcome(&result);
        assert!(result.success);
        assert_eq!(result.suggested_name.as_deref(), Some("demo_result.txt"));
        assert_eq!(result.message.as_deref(), Some(MAINTENANCE_MESSAGE));
    }

    #[tokio::test]
    async fn routine_errors_become_failures() {
        let dispatcher = Dispatcher::default();
        let result = dispatcher
            .process("pdf-lock", &[pdf_file("a.pdf", 1)], &ConversionOptions::default())
            .await;

        exactly_one_outcome(&result);
        assert!(!result.success);
        assert_eq!(
            result.message.as_deref(),
            Some("Password is required to lock the PDF.")
        );
    }

    #[tokio::test]
    async fn unreadable_path_is_contained() {
        let dispatcher = Dispatcher::default();
        let file = InputFile::from_path("/no/such/dir/input.pdf");
        let result = dispatcher
            .process("pdf-to-text", &[file], &ConversionOptions::default())
            .await;

        exactly_one_outcome(&result);
        assert!(!result.success);
    }

    async fn converter_bug() -> Result<Outcome> {
        panic!("page index {} out of range", 7)
    }

    #[tokio::test]
    async fn panicking_routines_become_failures() {
        let result = contain(converter_bug()).await;

        exactly_one_outcome(&result);
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some(FALLBACK_FAILURE));
        assert!(result.hint.is_some());
    }

    #[test]
    fn panic_payloads_are_described() {
        assert_eq!(panic_text(&"static"), "static");
        assert_eq!(panic_text(&String::from("owned")), "owned");
        assert_eq!(panic_text(&42u8), "unknown panic");
    }

    #[tokio::test]
    async fn informational_messages_survive() {
        let dispatcher = Dispatcher::default();
        let files = [docx_file("a.docx", "one"), docx_file("b.docx", "two")];
        let result = dispatcher
            .process("word-merge", &files, &ConversionOptions::default())
            .await;

        exactly_one_outcome(&result);
        assert!(result.success);
        assert_eq!(result.message.as_deref(), Some("Merged text content of documents."));
    }

    #[tokio::test]
    async fn every_outcome_is_exclusive() {
        let dispatcher = Dispatcher::default();
        let pdf = [pdf_file("a.pdf", 3)];
        let image = [png_file("a.png", 10, 10)];
        for tool in ToolId::ALL {
            let files: &[InputFile] = match tool {
                ToolId::ImageToPdf | ToolId::ImageConvert => &image,
                _ => &pdf,
            };
            let result = dispatcher
                .process(tool.as_str(), files, &ConversionOptions::default())
                .await;
            exactly_one_outcome(&result);
        }
    }

    #[tokio::test]
    async fn dispatcher_is_shareable_across_tasks() {
        let dispatcher = std::sync::Arc::new(Dispatcher::default());
        let handles: Vec<_> = (0..2)
            .map(|n| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    let files = [pdf_file(&format!("{n}.pdf"), 2)];
                    dispatcher
                        .process("pdf-merge", &files, &ConversionOptions::default())
                        .await
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().success);
        }
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
