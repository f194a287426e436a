/// Slide type and slide part XML generation.
use crate::pptx::error::{PptxError, Result};
use crate::pptx::format::{Color, ImageFormat, TextBody};
use crate::pptx::shape::{Frame, Geometry, Shape, ShapeKind, escape_xml};
use bytes::Bytes;
use std::fmt::Write as FmtWrite;

/// A slide under construction.
///
/// Templates build a `Slide` and hand it to [`Deck::push_slide`](super::Deck::push_slide),
/// which assigns its presentation-level ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// Slide ID (assigned when the slide joins a deck)
    pub(crate) slide_id: u32,
    /// Short name used in diagnostics and as the slide's `cSld` name
    pub(crate) name: String,
    /// Full-canvas background fill
    pub(crate) background: Color,
    /// Shapes in z-order
    pub(crate) shapes: Vec<Shape>,
}

impl Slide {
    /// Create an empty slide with a solid background.
    pub fn new(name: impl Into<String>, background: Color) -> Self {
        Self {
            slide_id: 0,
            name: name.into(),
            background,
            shapes: Vec::new(),
        }
    }

    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    // IDs: 1=group, 2+=shapes
    fn next_shape_id(&self) -> u32 {
        (self.shapes.len() + 2) as u32
    }

    /// Add a text box to the slide. Returns the shape ID.
    pub fn add_text_box(&mut self, frame: Frame, body: TextBody) -> u32 {
        let shape_id = self.next_shape_id();
        self.shapes
            .push(Shape::new(shape_id, ShapeKind::TextBox { frame, body }));
        shape_id
    }

    /// Add a preset auto shape to the slide. Returns the shape ID.
    pub fn add_shape(
        &mut self,
        geometry: Geometry,
        frame: Frame,
        fill: Option<Color>,
        line: Option<Color>,
        text: Option<TextBody>,
    ) -> u32 {
        let shape_id = self.next_shape_id();
        self.shapes.push(Shape::new(
            shape_id,
            ShapeKind::AutoShape {
                geometry,
                frame,
                fill,
                line,
                text,
            },
        ));
        shape_id
    }

    /// Add a picture to the slide from encoded PNG or JPEG bytes.
    pub fn add_picture(
        &mut self,
        data: Bytes,
        frame: Frame,
        description: impl Into<String>,
    ) -> Result<u32> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| PptxError::InvalidImage("Unknown image format".to_string()))?;
        if frame.width <= 0 || frame.height <= 0 {
            return Err(PptxError::InvalidGeometry(format!(
                "picture extent {}x{} is empty",
                frame.width, frame.height
            )));
        }

        let shape_id = self.next_shape_id();
        self.shapes.push(Shape::new(
            shape_id,
            ShapeKind::Picture {
                data,
                format,
                frame,
                description: description.into(),
            },
        ));
        Ok(shape_id)
    }

    /// Number of pictures on this slide.
    pub fn picture_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_picture()).count()
    }

    /// All paragraph texts on the slide, in shape then paragraph order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .filter_map(Shape::text_body)
            .flat_map(|body| body.paragraphs.iter().map(|p| p.text.as_str()))
            .collect()
    }

    /// Collect all images from this slide in shape order.
    pub(crate) fn collect_images(&self) -> Vec<(&Bytes, ImageFormat)> {
        self.shapes.iter().filter_map(Shape::image_data).collect()
    }

    /// Generate slide XML content.
    ///
    /// # Arguments
    /// * `image_rel_ids` - Relationship IDs of this slide's pictures, in shape order
    pub(crate) fn to_xml_with_rels(&self, image_rel_ids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        );
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);

        write!(xml, r#"<p:cSld name="{}">"#, escape_xml(&self.name))?;

        // Background must come before spTree
        xml.push_str("<p:bg><p:bgPr>");
        write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            self.background
        )?;
        xml.push_str("<a:effectLst/>");
        xml.push_str("</p:bgPr></p:bg>");

        xml.push_str("<p:spTree>");
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str("<a:xfrm>");
        xml.push_str(r#"<a:off x="0" y="0"/>"#);
        xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
        xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
        xml.push_str("</a:xfrm>");
        xml.push_str("</p:grpSpPr>");

        let mut image_counter = 0;
        for shape in &self.shapes {
            let rel_id = if shape.is_picture() {
                let rid = image_rel_ids.get(image_counter).map(String::as_str);
                image_counter += 1;
                rid
            } else {
                None
            };
            shape.to_xml(&mut xml, rel_id)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::format::{Paragraph, RunFormat};

    fn png_bytes() -> Bytes {
        Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
    }

    #[test]
    fn test_shape_ids_are_sequential() {
        let mut slide = Slide::new("test", Color::rgb(255, 255, 255));
        let a = slide.add_shape(
            Geometry::Rectangle,
            Frame::new(0, 0, 1, 1),
            Some(Color::rgb(0, 0, 0)),
            None,
            None,
        );
        let b = slide.add_text_box(Frame::new(0, 0, 1, 1), TextBody::new());
        assert_eq!((a, b), (2, 3));
        assert_eq!(slide.shape_count(), 2);
    }

    #[test]
    fn test_add_picture_rejects_unknown_data() {
        let mut slide = Slide::new("test", Color::rgb(255, 255, 255));
        let err = slide
            .add_picture(Bytes::from_static(b"GIF89a"), Frame::new(0, 0, 1, 1), "x")
            .unwrap_err();
        assert!(matches!(err, PptxError::InvalidImage(_)));

        let err = slide
            .add_picture(png_bytes(), Frame::new(0, 0, 0, 1), "x")
            .unwrap_err();
        assert!(matches!(err, PptxError::InvalidGeometry(_)));
        assert_eq!(slide.picture_count(), 0);
    }

    #[test]
    fn test_texts_in_order() {
        let mut slide = Slide::new("test", Color::rgb(255, 255, 255));
        slide.add_text_box(
            Frame::new(0, 0, 1, 1),
            TextBody::new().with_paragraph(Paragraph::new("one", RunFormat::default())),
        );
        slide.add_text_box(
            Frame::new(0, 0, 1, 1),
            TextBody::new()
                .with_paragraph(Paragraph::new("two", RunFormat::default()))
                .with_paragraph(Paragraph::new("three", RunFormat::default())),
        );
        assert_eq!(slide.texts(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_xml_generation() {
        let mut slide = Slide::new("title", Color::rgb(240, 248, 255));
        slide.add_picture(png_bytes(), Frame::new(0, 0, 10, 10), "logo").unwrap();
        slide.add_text_box(
            Frame::new(0, 0, 1, 1),
            TextBody::new().with_paragraph(Paragraph::new("Hello & bye", RunFormat::default())),
        );

        let xml = slide.to_xml_with_rels(&["rId2".to_string()]).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<p:cSld name="title">"#));
        assert!(xml.contains(r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="F0F8FF"/>"#));
        assert!(xml.contains(r#"r:embed="rId2""#));
        assert!(xml.contains("Hello &amp; bye"));
        assert!(xml.ends_with("</p:sld>"));
    }
}
