/// In-memory presentation (deck) for PPTX output.
use crate::pptx::error::{PptxError, Result};
use crate::pptx::slide::Slide;
use crate::pptx::template;
use crate::pptx::unit::inches;
use std::fmt::Write as FmtWrite;

/// First slide ID; PowerPoint requires IDs of at least 256.
const FIRST_SLIDE_ID: u32 = 256;

/// An ordered sequence of slides plus the canvas size shared by all of them.
///
/// Slides are appended once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    /// Slides in the presentation
    slides: Vec<Slide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
    /// Document title written to the core properties
    title: Option<String>,
}

impl Deck {
    /// Create a new empty deck with default dimensions.
    ///
    /// Default size is 10" x 7.5" (standard 4:3 aspect ratio).
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            slide_width: 9_144_000,
            slide_height: 6_858_000,
            title: None,
        }
    }

    /// Create an empty 16" x 9" deck.
    pub fn widescreen() -> Self {
        let mut deck = Self::new();
        deck.set_slide_size(inches(16.0), inches(9.0));
        deck
    }

    /// Append a slide and assign its slide ID.
    pub fn push_slide(&mut self, mut slide: Slide) -> &Slide {
        slide.slide_id = FIRST_SLIDE_ID + self.slides.len() as u32;
        self.slides.push(slide);
        &self.slides[self.slides.len() - 1]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Set the slide size in EMUs.
    pub fn set_slide_size(&mut self, width: i64, height: i64) {
        self.slide_width = width;
        self.slide_height = height;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Generate presentation.xml content.
    ///
    /// # Arguments
    /// * `master_rel_id` - Relationship ID of the slide master
    /// * `slide_rel_ids` - Relationship IDs of the slides, in slide order
    pub(crate) fn generate_presentation_xml(
        &self,
        master_rel_id: &str,
        slide_rel_ids: &[String],
    ) -> Result<String> {
        if slide_rel_ids.len() != self.slides.len() {
            return Err(PptxError::Xml(format!(
                "{} slide relationships for {} slides",
                slide_rel_ids.len(),
                self.slides.len()
            )));
        }

        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">"#);

        xml.push_str("<p:sldMasterIdLst>");
        write!(
            xml,
            r#"<p:sldMasterId id="2147483648" r:id="{}"/>"#,
            master_rel_id
        )?;
        xml.push_str("</p:sldMasterIdLst>");

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rel_id) in self.slides.iter().zip(slide_rel_ids) {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    slide.slide_id(),
                    rel_id
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )?;
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str(&template::default_text_style_xml());
        xml.push_str("</p:presentation>");

        Ok(xml)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::format::Color;

    #[test]
    fn test_create_deck() {
        let deck = Deck::new();
        assert_eq!(deck.slide_count(), 0);
        assert_eq!(deck.slide_width(), 9_144_000);
        assert_eq!(deck.slide_height(), 6_858_000);
    }

    #[test]
    fn test_widescreen_is_16_by_9() {
        let deck = Deck::widescreen();
        assert_eq!(deck.slide_width(), 14_630_400);
        assert_eq!(deck.slide_height(), 8_229_600);
        assert_eq!(deck.slide_width() * 9, deck.slide_height() * 16);
    }

    #[test]
    fn test_push_slide_assigns_ids() {
        let mut deck = Deck::widescreen();
        deck.push_slide(Slide::new("a", Color::rgb(255, 255, 255)));
        let second = deck.push_slide(Slide::new("b", Color::rgb(255, 255, 255)));
        assert_eq!(second.slide_id(), 257);
        assert_eq!(deck.slides()[0].slide_id(), 256);
    }

    #[test]
    fn test_xml_generation() {
        let mut deck = Deck::widescreen();
        deck.push_slide(Slide::new("a", Color::rgb(255, 255, 255)));

        let xml = deck
            .generate_presentation_xml("rId1", &["rId2".to_string()])
            .unwrap();
        assert!(xml.contains("<p:presentation"));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="14630400" cy="8229600"/>"#));

        assert!(deck.generate_presentation_xml("rId1", &[]).is_err());
    }
}
