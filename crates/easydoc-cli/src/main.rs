// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// EasyDoc — local document conversion toolkit
//
// Entry point. Initialises logging, loads the engine configuration, runs one
// tool through the dispatcher and saves the artifact.

mod args;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use easydoc_core::types::{InputFile, TOOLS};
use easydoc_core::{EngineConfig, ProcessingResult};
use easydoc_tools::Dispatcher;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.list {
        print_tools();
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    let options = cli.conversion_options()?;
    let tool = cli.tool.as_deref().unwrap_or_default();
    let files: Vec<InputFile> = cli.files.iter().map(InputFile::from_path).collect();

    info!(tool, files = files.len(), "EasyDoc starting");
    let result = Dispatcher::new(config).process(tool, &files, &options).await;
    if report(result, &cli.output_dir).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("cannot load configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(path) = &cli.pdfium_path {
        config.pdfium_library_path = Some(path.clone());
    }
    Ok(config)
}

/// Save a successful artifact, or print the failure and its hint. Returns
/// whether the tool succeeded.
async fn report(result: ProcessingResult, output_dir: &Path) -> Result<bool> {
    let ProcessingResult {
        success,
        artifact,
        suggested_name,
        message,
        hint,
    } = result;

    match (success, artifact, suggested_name) {
        (true, Some(artifact), Some(name)) => {
            let path = output_path(output_dir, &name);
            tokio::fs::create_dir_all(output_dir)
                .await
                .with_context(|| format!("cannot create {}", output_dir.display()))?;
            tokio::fs::write(&path, &artifact.bytes)
                .await
                .with_context(|| format!("cannot write {}", path.display()))?;

            if let Some(note) = message {
                info!(%note, "Tool note");
            }
            println!("{}", path.display());
            Ok(true)
        }
        _ => {
            let message = message.unwrap_or_else(|| "Processing failed.".to_string());
            warn!(%message, "Conversion failed");
            eprintln!("error: {message}");
            if let Some(hint) = hint {
                eprintln!("hint: {hint}");
            }
            Ok(false)
        }
    }
}

/// Suggested names are plain file names; anything path-like is reduced to
/// its last component.
fn output_path(output_dir: &Path, suggested_name: &str) -> PathBuf {
    let file_name = Path::new(suggested_name)
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "output".into());
    output_dir.join(file_name)
}

fn print_tools() {
    let mut category = None;
    for tool in TOOLS {
        if category != Some(tool.category) {
            category = Some(tool.category);
            println!("{}", tool.category.label());
        }
        let inputs = if tool.multiple { "files" } else { "file" };
        println!(
            "  {:<16} {} ({} {})",
            tool.id.as_str(),
            tool.description,
            tool.accepts,
            inputs
        );
    }
}
