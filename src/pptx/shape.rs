/// Shape types and XML generation for slide parts.
use crate::pptx::error::{PptxError, Result};
use crate::pptx::format::{Color, ImageFormat, TextBody};
use crate::pptx::unit::font_size_attr;
use bytes::Bytes;
use std::borrow::Cow;
use std::fmt::Write as FmtWrite;

/// Language tag written on every text run.
const RUN_LANG: &str = "zh-TW";

/// Escape text for element content and attribute values.
///
/// Characters that XML 1.0 does not allow at all (most C0 controls and the
/// noncharacters U+FFFE and U+FFFF) are dropped before escaping, since no
/// escape sequence can represent them.
pub(crate) fn escape_xml(s: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
    };
    if s.chars().all(allowed) {
        quick_xml::escape::escape(s)
    } else {
        let cleaned: String = s.chars().filter(|&c| allowed(c)).collect();
        Cow::Owned(quick_xml::escape::escape(cleaned.as_str()).into_owned())
    }
}

/// Absolute position and size of a shape, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge of the frame.
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    /// Bottom edge of the frame.
    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Whether two frames share any area.
    pub fn overlaps(&self, other: &Frame) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Preset geometry of an auto shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Rectangle,
    RoundedRectangle,
}

impl Geometry {
    fn preset(&self) -> &'static str {
        match self {
            Self::Rectangle => "rect",
            Self::RoundedRectangle => "roundRect",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::RoundedRectangle => "Rounded Rectangle",
        }
    }
}

/// A shape on a slide (auto shape, text box or picture).
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Shape ID, unique within its slide
    pub(crate) shape_id: u32,
    pub(crate) kind: ShapeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    AutoShape {
        geometry: Geometry,
        frame: Frame,
        fill: Option<Color>,
        /// Outline color; `None` hides the outline
        line: Option<Color>,
        text: Option<TextBody>,
    },
    TextBox {
        frame: Frame,
        body: TextBody,
    },
    Picture {
        data: Bytes,
        format: ImageFormat,
        frame: Frame,
        description: String,
    },
}

impl Shape {
    pub(crate) fn new(shape_id: u32, kind: ShapeKind) -> Self {
        Self { shape_id, kind }
    }

    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn frame(&self) -> Frame {
        match &self.kind {
            ShapeKind::AutoShape { frame, .. }
            | ShapeKind::TextBox { frame, .. }
            | ShapeKind::Picture { frame, .. } => *frame,
        }
    }

    /// Text carried by this shape, if any.
    pub fn text_body(&self) -> Option<&TextBody> {
        match &self.kind {
            ShapeKind::AutoShape { text, .. } => text.as_ref(),
            ShapeKind::TextBox { body, .. } => Some(body),
            ShapeKind::Picture { .. } => None,
        }
    }

    pub fn is_picture(&self) -> bool {
        matches!(self.kind, ShapeKind::Picture { .. })
    }

    /// Get image data if this shape is a picture.
    pub(crate) fn image_data(&self) -> Option<(&Bytes, ImageFormat)> {
        match &self.kind {
            ShapeKind::Picture { data, format, .. } => Some((data, *format)),
            _ => None,
        }
    }

    /// Generate XML for this shape.
    ///
    /// Pictures need the relationship ID of their image part.
    pub(crate) fn to_xml(&self, xml: &mut String, image_rel_id: Option<&str>) -> Result<()> {
        match &self.kind {
            ShapeKind::AutoShape {
                geometry,
                frame,
                fill,
                line,
                text,
            } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{} {}"/>"#,
                    self.shape_id,
                    geometry.name(),
                    self.shape_id
                )?;
                xml.push_str("<p:cNvSpPr/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, frame)?;
                write!(
                    xml,
                    r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#,
                    geometry.preset()
                )?;
                match fill {
                    Some(color) => write_solid_fill(xml, *color)?,
                    None => xml.push_str("<a:noFill/>"),
                }
                match line {
                    Some(color) => {
                        xml.push_str("<a:ln>");
                        write_solid_fill(xml, *color)?;
                        xml.push_str("</a:ln>");
                    },
                    None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
                }
                xml.push_str("</p:spPr>");

                if let Some(body) = text {
                    xml.push_str("<p:txBody>");
                    let wrap = if body.word_wrap { "square" } else { "none" };
                    write!(xml, r#"<a:bodyPr wrap="{}" rtlCol="0" anchor="t"/>"#, wrap)?;
                    xml.push_str("<a:lstStyle/>");
                    write_paragraphs(xml, body)?;
                    xml.push_str("</p:txBody>");
                }

                xml.push_str("</p:sp>");
            },
            ShapeKind::TextBox { frame, body } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
                    self.shape_id, self.shape_id
                )?;
                xml.push_str("<p:cNvSpPr txBox=\"1\"/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("<a:noFill/>");
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                let wrap = if body.word_wrap { "square" } else { "none" };
                write!(xml, r#"<a:bodyPr wrap="{}" rtlCol="0">"#, wrap)?;
                xml.push_str("<a:spAutoFit/>");
                xml.push_str("</a:bodyPr>");
                xml.push_str("<a:lstStyle/>");
                write_paragraphs(xml, body)?;
                xml.push_str("</p:txBody>");

                xml.push_str("</p:sp>");
            },
            ShapeKind::Picture {
                frame,
                description,
                ..
            } => {
                let rid = image_rel_id.ok_or_else(|| {
                    PptxError::Xml(format!(
                        "picture {} has no image relationship",
                        self.shape_id
                    ))
                })?;

                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    self.shape_id,
                    self.shape_id,
                    escape_xml(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            },
        }

        Ok(())
    }
}

fn write_xfrm(xml: &mut String, frame: &Frame) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, frame.x, frame.y)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, frame.width, frame.height)?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

fn write_solid_fill(xml: &mut String, color: Color) -> Result<()> {
    write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color)?;
    Ok(())
}

fn write_paragraphs(xml: &mut String, body: &TextBody) -> Result<()> {
    if body.paragraphs.is_empty() {
        // A text body needs at least one paragraph
        xml.push_str("<a:p/>");
        return Ok(());
    }

    for paragraph in &body.paragraphs {
        xml.push_str("<a:p>");

        if paragraph.level > 0 || paragraph.alignment.is_some() {
            xml.push_str("<a:pPr");
            if paragraph.level > 0 {
                write!(xml, r#" lvl="{}""#, paragraph.level)?;
            }
            if let Some(alignment) = paragraph.alignment {
                write!(xml, r#" algn="{}""#, alignment.as_attr())?;
            }
            xml.push_str("/>");
        }

        let format = &paragraph.format;
        write!(xml, r#"<a:r><a:rPr lang="{}" altLang="en-US""#, RUN_LANG)?;
        if let Some(size) = format.size {
            write!(xml, r#" sz="{}""#, font_size_attr(size))?;
        }
        if format.bold {
            xml.push_str(r#" b="1""#);
        }
        xml.push_str(r#" dirty="0">"#);
        if let Some(color) = format.color {
            write_solid_fill(xml, color)?;
        }
        xml.push_str("</a:rPr>");
        write!(xml, "<a:t>{}</a:t>", escape_xml(&paragraph.text))?;
        xml.push_str("</a:r>");

        xml.push_str("</a:p>");
    }

    Ok(())
}
