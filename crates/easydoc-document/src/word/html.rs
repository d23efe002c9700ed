// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTML rendition of a Word document body, and the tag stripper that turns
// that HTML back into printable lines for Word→PDF.

use std::sync::LazyLock;

use quick_xml::escape::escape;
use regex::Regex;

use super::model::{Paragraph, WordDocument};

static PARAGRAPH_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</p>").expect("literal regex"));
static DIV_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</div>").expect("literal regex"));
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("literal regex"));
static BLOCK_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</(h[1-6]|li)>").expect("literal regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("literal regex"));

/// Body paragraphs as HTML: `<p>` or `<h1>`-`<h6>` per paragraph style,
/// `<strong>`/`<em>` for bold/italic runs, `<br />` for breaks.
pub fn to_html(doc: &WordDocument) -> String {
    let mut html = String::new();
    for paragraph in &doc.paragraphs {
        let tag = match paragraph.heading_level() {
            Some(level) => format!("h{level}"),
            None => "p".to_string(),
        };
        html.push('<');
        html.push_str(&tag);
        html.push('>');
        write_runs(&mut html, paragraph);
        html.push_str("</");
        html.push_str(&tag);
        html.push('>');
    }
    html
}

fn write_runs(html: &mut String, paragraph: &Paragraph) {
    for run in &paragraph.runs {
        let mut text = String::new();
        for (index, line) in run.text.split('\n').enumerate() {
            if index > 0 {
                text.push_str("<br />");
            }
            text.push_str(&escape(line));
        }
        if run.italic {
            text = format!("<em>{text}</em>");
        }
        if run.bold {
            text = format!("<strong>{text}</strong>");
        }
        html.push_str(&text);
    }
}

/// Flatten HTML to lines of plain text: block ends and breaks become
/// newlines, other tags are dropped, the basic entities are decoded, and
/// lines are trimmed with empty ones removed.
pub fn html_to_lines(html: &str) -> String {
    let text = PARAGRAPH_CLOSE.replace_all(html, "\n\n");
    let text = DIV_CLOSE.replace_all(&text, "\n");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = BLOCK_CLOSE.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
