// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion options.
//
// Callers hand over one loose `ConversionOptions` bag (the shape a form or a
// JSON payload naturally has). Each tool family converts it into its own typed
// option struct before the routine runs, so malformed values are rejected up
// front and keys a tool does not use are simply ignored.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EasydocError, Result};

/// The per-invocation option bag, keyed the way the UI names its controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionOptions {
    pub password: Option<String>,
    pub target_format: Option<String>,
    pub watermark_text: Option<String>,
    pub watermark_position: Option<String>,
    pub watermark_font: Option<String>,
    pub watermark_color: Option<String>,
    pub watermark_opacity: Option<f32>,
    #[serde(deserialize_with = "string_or_number")]
    pub layout_mode: Option<String>,
}

/// Accept `"4"` as well as `4` for fields that forms send as strings.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|value| match value {
        Loose::Text(text) => text,
        Loose::Number(number) => number.to_string(),
    }))
}

// -- Lock ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOptions {
    pub password: String,
}

impl TryFrom<&ConversionOptions> for LockOptions {
    type Error = EasydocError;

    fn try_from(options: &ConversionOptions) -> Result<Self> {
        match options.password.as_deref() {
            Some(password) if !password.is_empty() => Ok(Self {
                password: password.to_string(),
            }),
            _ => Err(EasydocError::MissingPassword),
        }
    }
}

// -- Watermark ----------------------------------------------------------------

pub const DEFAULT_WATERMARK_TEXT: &str = "CONFIDENTIAL";
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.3;

/// Vertical anchor of a watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkPosition {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl WatermarkPosition {
    /// Unknown values fall back to the middle anchor.
    pub fn parse(value: &str) -> Self {
        match value {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Middle,
        }
    }
}

/// The three standard faces offered for watermarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WatermarkFont {
    #[default]
    Helvetica,
    TimesRoman,
    Courier,
}

impl WatermarkFont {
    /// Unknown names fall back to Helvetica.
    pub fn parse(value: &str) -> Self {
        match value {
            "Times Roman" => Self::TimesRoman,
            "Courier" => Self::Courier,
            _ => Self::Helvetica,
        }
    }

    /// Display name, also used as the font family in Word output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::TimesRoman => "Times Roman",
            Self::Courier => "Courier",
        }
    }
}

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    /// Parse `#RRGGBB` (the `#` is optional, digits are case-insensitive).
    /// Anything else yields black.
    pub fn parse_hex(value: &str) -> Self {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::BLACK;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).unwrap_or(0)
        };
        Self {
            r: channel(0..2),
            g: channel(2..4),
            b: channel(4..6),
        }
    }

    /// Upper-case `RRGGBB` without the leading `#`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channels scaled to 0.0..=1.0.
    pub fn to_unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    pub text: String,
    pub position: WatermarkPosition,
    pub font: WatermarkFont,
    pub color: Rgb,
    /// Fill alpha in 0.0..=1.0.
    pub opacity: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: DEFAULT_WATERMARK_TEXT.to_string(),
            position: WatermarkPosition::Middle,
            font: WatermarkFont::Helvetica,
            color: Rgb::RED,
            opacity: DEFAULT_WATERMARK_OPACITY,
        }
    }
}

impl From<&ConversionOptions> for WatermarkOptions {
    fn from(options: &ConversionOptions) -> Self {
        let defaults = Self::default();
        let opacity = match options.watermark_opacity {
            Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
            _ => defaults.opacity,
        };
        Self {
            text: options.watermark_text.clone().unwrap_or(defaults.text),
            position: options
                .watermark_position
                .as_deref()
                .map(WatermarkPosition::parse)
                .unwrap_or(defaults.position),
            font: options
                .watermark_font
                .as_deref()
                .map(WatermarkFont::parse)
                .unwrap_or(defaults.font),
            color: options
                .watermark_color
                .as_deref()
                .map(Rgb::parse_hex)
                .unwrap_or(defaults.color),
            opacity,
        }
    }
}

// -- Layout -------------------------------------------------------------------

/// How many source pages share one output sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PagesPerSheet {
    #[default]
    Two,
    Four,
}

impl PagesPerSheet {
    pub fn count(&self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    /// Scale factor applied to each embedded page.
    pub fn scale(&self) -> f32 {
        match self {
            Self::Two => 0.65,
            Self::Four => 0.45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutOptions {
    pub pages_per_sheet: PagesPerSheet,
}

impl TryFrom<&ConversionOptions> for LayoutOptions {
    type Error = EasydocError;

    fn try_from(options: &ConversionOptions) -> Result<Self> {
        let pages_per_sheet = match options.layout_mode.as_deref().map(str::trim) {
            None | Some("2") => PagesPerSheet::Two,
            Some("4") => PagesPerSheet::Four,
            Some(other) => {
                return Err(EasydocError::invalid_option(
                    "layoutMode",
                    format!("expected \"2\" or \"4\", got \"{other}\""),
                ));
            }
        };
        Ok(Self { pages_per_sheet })
    }
}

// -- Raster images --------------------------------------------------------------

/// Raster formats the image converter can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
    Webp,
}

impl RasterFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    pub fn document_type(&self) -> crate::DocumentType {
        match self {
            Self::Png => crate::DocumentType::Png,
            Self::Jpeg => crate::DocumentType::Jpeg,
            Self::Webp => crate::DocumentType::Webp,
        }
    }

    /// Format chosen when no explicit target is given: PNG and JPEG swap,
    /// everything else (WEBP included) becomes PNG.
    pub fn toggled_from(media_type: &str) -> Self {
        match media_type {
            "image/png" => Self::Jpeg,
            _ => Self::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageOptions {
    pub target: Option<RasterFormat>,
}

impl ImageOptions {
    /// The format to emit for a source with the given media type.
    pub fn resolve(&self, source_media_type: &str) -> RasterFormat {
        self.target
            .unwrap_or_else(|| RasterFormat::toggled_from(source_media_type))
    }
}

impl TryFrom<&ConversionOptions> for ImageOptions {
    type Error = EasydocError;

    fn try_from(options: &ConversionOptions) -> Result<Self> {
        let target = match options.target_format.as_deref() {
            None | Some("") => None,
            Some(value) => Some(RasterFormat::parse(value).ok_or_else(|| {
                EasydocError::invalid_option(
                    "targetFormat",
                    format!("unsupported raster format \"{value}\""),
                )
            })?),
        };
        Ok(Self { target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bag_ignores_unknown_keys_and_accepts_numeric_layout() {
        let json = r#"{"layoutMode": 4, "watermarkText": "DRAFT", "somethingElse": true}"#;
        let options: ConversionOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.layout_mode.as_deref(), Some("4"));
        assert_eq!(options.watermark_text.as_deref(), Some("DRAFT"));
        assert_eq!(options.password, None);
    }

    #[test]
    fn lock_requires_non_empty_password() {
        let mut options = ConversionOptions::default();
        assert!(matches!(
            LockOptions::try_from(&options),
            Err(EasydocError::MissingPassword)
        ));
        options.password = Some(String::new());
        assert!(LockOptions::try_from(&options).is_err());
        options.password = Some("s3cret".into());
        assert_eq!(LockOptions::try_from(&options).unwrap().password, "s3cret");
    }

    #[test]
    fn watermark_defaults() {
        let wm = WatermarkOptions::from(&ConversionOptions::default());
        assert_eq!(wm.text, "CONFIDENTIAL");
        assert_eq!(wm.position, WatermarkPosition::Middle);
        assert_eq!(wm.font, WatermarkFont::Helvetica);
        assert_eq!(wm.color, Rgb::RED);
        assert!((wm.opacity - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn watermark_values_are_normalised() {
        let options = ConversionOptions {
            watermark_position: Some("sideways".into()),
            watermark_font: Some("Courier".into()),
            watermark_color: Some("not-a-colour".into()),
            watermark_opacity: Some(3.5),
            ..Default::default()
        };
        let wm = WatermarkOptions::from(&options);
        assert_eq!(wm.position, WatermarkPosition::Middle);
        assert_eq!(wm.font, WatermarkFont::Courier);
        assert_eq!(wm.color, Rgb::BLACK);
        assert_eq!(wm.opacity, 1.0);
    }

    #[test]
    fn hex_colours() {
        assert_eq!(Rgb::parse_hex("#00ff7F"), Rgb { r: 0, g: 255, b: 127 });
        assert_eq!(Rgb::parse_hex("336699").to_hex(), "336699");
        assert_eq!(Rgb::parse_hex("#12345"), Rgb::BLACK);
        assert_eq!(Rgb::parse_hex("#GGHHII"), Rgb::BLACK);
    }

    #[test]
    fn layout_modes() {
        let mut options = ConversionOptions::default();
        assert_eq!(
            LayoutOptions::try_from(&options).unwrap().pages_per_sheet,
            PagesPerSheet::Two
        );
        options.layout_mode = Some("4".into());
        assert_eq!(
            LayoutOptions::try_from(&options).unwrap().pages_per_sheet,
            PagesPerSheet::Four
        );
        options.layout_mode = Some("3".into());
        assert!(LayoutOptions::try_from(&options).is_err());
    }

    #[test]
    fn raster_target_resolution() {
        let auto = ImageOptions::default();
        assert_eq!(auto.resolve("image/png"), RasterFormat::Jpeg);
        assert_eq!(auto.resolve("image/jpeg"), RasterFormat::Png);
        assert_eq!(auto.resolve("image/webp"), RasterFormat::Png);

        let options = ConversionOptions {
            target_format: Some("webp".into()),
            ..Default::default()
        };
        let explicit = ImageOptions::try_from(&options).unwrap();
        assert_eq!(explicit.resolve("image/png"), RasterFormat::Webp);

        let bad = ConversionOptions {
            target_format: Some("tiff".into()),
            ..Default::default()
        };
        assert!(ImageOptions::try_from(&bad).is_err());
    }
}
