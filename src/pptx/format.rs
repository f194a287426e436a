//! Format types for PPTX slides.

use std::fmt;

/// Image formats that can be embedded in a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Get the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Get the file extension for this image format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// Detect image format from bytes (magic number detection).
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        None
    }
}

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Formats as the six-digit upper-case hex used by `a:srgbClr`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub(crate) fn as_attr(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
        }
    }
}

/// Character formatting applied to a paragraph's run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunFormat {
    /// Font size in points
    pub size: Option<f64>,
    /// Bold text
    pub bold: bool,
    /// Text color
    pub color: Option<Color>,
}

impl RunFormat {
    pub fn new(size: f64, color: Color) -> Self {
        Self {
            size: Some(size),
            bold: false,
            color: Some(color),
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A single paragraph made of one text run.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub format: RunFormat,
    /// Indent level (0-8)
    pub level: u8,
    pub alignment: Option<Alignment>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
            level: 0,
            alignment: None,
        }
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level.min(8);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// The text content of a shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBody {
    pub paragraphs: Vec<Paragraph>,
    /// Wrap lines at the shape boundary
    pub word_wrap: bool,
}

impl TextBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrapped() -> Self {
        Self {
            paragraphs: Vec::new(),
            word_wrap: true,
        }
    }

    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.paragraphs.push(paragraph);
        self
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_image_format() {
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a"), None);
        assert_eq!(ImageFormat::detect_from_bytes(&[]), None);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::rgb(30, 144, 255).to_string(), "1E90FF");
        assert_eq!(Color::rgb(0, 0, 0).to_string(), "000000");
    }

    #[test]
    fn test_paragraph_level_is_clamped() {
        let p = Paragraph::new("x", RunFormat::default()).level(12);
        assert_eq!(p.level, 8);
    }
}
