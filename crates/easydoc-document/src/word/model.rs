// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory model of the parts of a Word document EasyDoc reads and writes.

/// Paragraph justification (`w:jc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Both,
}

impl Alignment {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "distribute" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

/// A run of uniformly formatted text. `\t` and `\n` in `text` stand for
/// tab and break elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points (`w:sz`).
    pub size_half_points: Option<u32>,
    /// Hex colour without a leading `#`.
    pub color: Option<String>,
    pub font: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub alignment: Option<Alignment>,
    /// Style id from `w:pStyle`, e.g. `Heading1`.
    pub style: Option<String>,
}

impl Paragraph {
    /// A paragraph holding a single unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
            ..Self::default()
        }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Heading level 1-6 when the style id names one (`Heading1`, `heading 2`,
    /// `Title` counts as level 1).
    pub fn heading_level(&self) -> Option<u8> {
        let style = self.style.as_deref()?.to_ascii_lowercase();
        if style == "title" {
            return Some(1);
        }
        let level = style.strip_prefix("heading")?.trim().parse::<u8>().ok()?;
        (1..=6).contains(&level).then_some(level)
    }
}

/// Body paragraphs plus the default header and footer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDocument {
    pub paragraphs: Vec<Paragraph>,
    pub header: Vec<Paragraph>,
    pub footer: Vec<Paragraph>,
}

impl WordDocument {
    /// One plain paragraph per `\n`-separated line.
    pub fn from_lines(text: &str) -> Self {
        Self {
            paragraphs: text.split('\n').map(Paragraph::plain).collect(),
            ..Self::default()
        }
    }

    /// Body text with every paragraph followed by a blank line.
    pub fn raw_text(&self) -> String {
        let mut text = String::new();
        for paragraph in &self.paragraphs {
            text.push_str(&paragraph.text());
            text.push_str("\n\n");
        }
        text
    }
}
