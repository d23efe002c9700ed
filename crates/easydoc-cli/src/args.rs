// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command line arguments and their mapping onto the option bag.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use easydoc_core::ConversionOptions;

/// Convert, merge, split, watermark and lock documents locally.
#[derive(Parser, Debug)]
#[command(
    name = "easydoc",
    version,
    about = "Convert, merge, split, watermark and lock PDF, Word and image files locally",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Tool id, e.g. pdf-merge or word-to-text (see --list).
    #[arg(required_unless_present = "list")]
    pub tool: Option<String>,

    /// Input files, in order.
    pub files: Vec<PathBuf>,

    /// Directory the output is written to.
    #[arg(short, long, env = "EASYDOC_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Tool options as a JSON object with camelCase keys.
    #[arg(long)]
    pub options: Option<String>,

    /// Password for pdf-lock.
    #[arg(long, env = "EASYDOC_PASSWORD")]
    pub password: Option<String>,

    /// Pages per sheet for pdf-layout (2 or 4).
    #[arg(long)]
    pub layout_mode: Option<String>,

    /// Output format for image-convert (png, jpeg, webp).
    #[arg(long)]
    pub target_format: Option<String>,

    #[arg(long)]
    pub watermark_text: Option<String>,

    /// top, middle or bottom.
    #[arg(long)]
    pub watermark_position: Option<String>,

    /// Helvetica, Times Roman or Courier.
    #[arg(long)]
    pub watermark_font: Option<String>,

    /// Hex colour such as #FF0000.
    #[arg(long)]
    pub watermark_color: Option<String>,

    /// Fill opacity between 0 and 1.
    #[arg(long)]
    pub watermark_opacity: Option<f32>,

    /// Engine configuration file (JSON).
    #[arg(long, env = "EASYDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the pdfium library, overriding the configuration.
    #[arg(long, env = "EASYDOC_PDFIUM_PATH")]
    pub pdfium_path: Option<PathBuf>,

    /// Print the available tools and exit.
    #[arg(long)]
    pub list: bool,

    /// Enable debug-level logs.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The option bag: `--options` JSON first, individual flags on top.
    pub fn conversion_options(&self) -> Result<ConversionOptions> {
        let mut options = match &self.options {
            Some(json) => serde_json::from_str(json).context("--options is not a valid options object")?,
            None => ConversionOptions::default(),
        };

        override_with(&mut options.password, &self.password);
        override_with(&mut options.layout_mode, &self.layout_mode);
        override_with(&mut options.target_format, &self.target_format);
        override_with(&mut options.watermark_text, &self.watermark_text);
        override_with(&mut options.watermark_position, &self.watermark_position);
        override_with(&mut options.watermark_font, &self.watermark_font);
        override_with(&mut options.watermark_color, &self.watermark_color);
        if self.watermark_opacity.is_some() {
            options.watermark_opacity = self.watermark_opacity;
        }
        Ok(options)
    }
}

fn override_with(slot: &mut Option<String>, flag: &Option<String>) {
    if let Some(value) = flag {
        *slot = Some(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_json_options() {
        let cli = Cli::try_parse_from([
            "easydoc",
            "pdf-layout",
            "in.pdf",
            "--options",
            r#"{"layoutMode": 2, "watermarkText": "DRAFT"}"#,
            "--layout-mode",
            "4",
        ])
        .unwrap();

        let options = cli.conversion_options().unwrap();
        assert_eq!(options.layout_mode.as_deref(), Some("4"));
        assert_eq!(options.watermark_text.as_deref(), Some("DRAFT"));
        assert_eq!(cli.files, [PathBuf::from("in.pdf")]);
    }

    #[test]
    fn list_needs_no_tool() {
        let cli = Cli::try_parse_from(["easydoc", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.tool.is_none());
    }

    #[test]
    fn malformed_json_is_reported() {
        let cli = Cli::try_parse_from(["easydoc", "pdf-lock", "a.pdf", "--options", "{"]).unwrap();
        assert!(cli.conversion_options().is_err());
    }
}
