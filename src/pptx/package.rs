//! PresentationML package assembly and ZIP serialization.
//!
//! A [`Deck`] is turned into a set of parts (XML documents and media files),
//! each with its own relationships, and then written as a ZIP container with
//! `[Content_Types].xml` and `_rels/.rels`. Part order, relationship IDs and
//! ZIP entry timestamps are fixed, so identical decks give identical bytes.

use crate::pptx::constants::{content_type as ct, relationship_type as rt};
use crate::pptx::deck::Deck;
use crate::pptx::error::Result;
use crate::pptx::format::ImageFormat;
use crate::pptx::shape::escape_xml;
use crate::pptx::template;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,
    /// Relationship type URI
    reltype: &'static str,
    /// Target reference relative to the source part
    target_ref: String,
}

impl Relationship {
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }
}

/// Relationships of one source part, numbered in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its ID.
    pub fn add(&mut self, reltype: &'static str, target_ref: impl Into<String>) -> String {
        let r_id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Relationship {
            r_id: r_id.clone(),
            reltype,
            target_ref: target_ref.into(),
        });
        r_id
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Serialize to a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                rel.r_id,
                rel.reltype,
                escape_xml(&rel.target_ref)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// A part of the package: its name, content type, bytes and relationships.
#[derive(Debug, Clone)]
pub struct Part {
    /// Absolute part name without the leading slash (e.g. "ppt/slides/slide1.xml")
    partname: String,
    content_type: &'static str,
    blob: Bytes,
    rels: Relationships,
}

impl Part {
    pub fn new(
        partname: impl Into<String>,
        content_type: &'static str,
        blob: impl Into<Bytes>,
        rels: Relationships,
    ) -> Self {
        Self {
            partname: partname.into(),
            content_type,
            blob: blob.into(),
            rels,
        }
    }

    pub fn partname(&self) -> &str {
        &self.partname
    }

    pub fn content_type(&self) -> &str {
        self.content_type
    }

    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Name of the `.rels` part that belongs to this part.
    fn rels_partname(&self) -> String {
        match self.partname.rsplit_once('/') {
            Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
            None => format!("_rels/{}.rels", self.partname),
        }
    }

    fn ext(&self) -> &str {
        self.partname
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }
}

/// A complete package ready to be written.
#[derive(Debug, Clone, Default)]
pub struct Package {
    /// Package-level relationships (`_rels/.rels`)
    rels: Relationships,
    parts: Vec<Part>,
}

impl Package {
    /// Build the package for a deck.
    pub fn from_deck(deck: &Deck) -> Result<Self> {
        let mut package = Package::default();
        let mut pres_rels = Relationships::new();

        // Master and layout reference each other; the layout is always rId1 of the master.
        let master_rid = pres_rels.add(rt::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
        let mut master_rels = Relationships::new();
        let layout_rid = master_rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        master_rels.add(rt::THEME, "../theme/theme1.xml");
        package.parts.push(Part::new(
            "ppt/slideMasters/slideMaster1.xml",
            ct::PML_SLIDE_MASTER,
            template::slide_master_xml(&layout_rid),
            master_rels,
        ));

        let mut layout_rels = Relationships::new();
        layout_rels.add(rt::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        package.parts.push(Part::new(
            "ppt/slideLayouts/slideLayout1.xml",
            ct::PML_SLIDE_LAYOUT,
            template::blank_slide_layout_xml(),
            layout_rels,
        ));

        // Identical image bytes are stored once and shared by every slide that shows them.
        let mut media_names: HashMap<Bytes, String> = HashMap::new();
        let mut slide_rel_ids = Vec::with_capacity(deck.slide_count());

        for (index, slide) in deck.slides().iter().enumerate() {
            let number = index + 1;
            let mut slide_rels = Relationships::new();
            slide_rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");

            let mut image_rel_ids = Vec::new();
            for (data, format) in slide.collect_images() {
                let media_name = match media_names.get(data) {
                    Some(name) => name.clone(),
                    None => {
                        let name = media_name(media_names.len() + 1, format);
                        package.parts.push(Part::new(
                            format!("ppt/media/{name}"),
                            format.mime_type(),
                            data.clone(),
                            Relationships::new(),
                        ));
                        media_names.insert(data.clone(), name.clone());
                        name
                    },
                };
                image_rel_ids.push(slide_rels.add(rt::IMAGE, format!("../media/{media_name}")));
            }

            package.parts.push(Part::new(
                format!("ppt/slides/slide{number}.xml"),
                ct::PML_SLIDE,
                slide.to_xml_with_rels(&image_rel_ids)?,
                slide_rels,
            ));
            slide_rel_ids.push(pres_rels.add(rt::SLIDE, format!("slides/slide{number}.xml")));
        }

        pres_rels.add(rt::PRES_PROPS, "presProps.xml");
        pres_rels.add(rt::VIEW_PROPS, "viewProps.xml");
        pres_rels.add(rt::THEME, "theme/theme1.xml");
        pres_rels.add(rt::TABLE_STYLES, "tableStyles.xml");

        let presentation_xml = deck.generate_presentation_xml(&master_rid, &slide_rel_ids)?;
        package.parts.push(Part::new(
            "ppt/presentation.xml",
            ct::PML_PRESENTATION_MAIN,
            presentation_xml,
            pres_rels,
        ));
        for (partname, content_type, xml) in [
            ("ppt/presProps.xml", ct::PML_PRES_PROPS, template::pres_props_xml()),
            ("ppt/viewProps.xml", ct::PML_VIEW_PROPS, template::view_props_xml()),
            ("ppt/theme/theme1.xml", ct::OFC_THEME, template::theme_xml()),
            ("ppt/tableStyles.xml", ct::PML_TABLE_STYLES, template::table_styles_xml()),
            (
                "docProps/core.xml",
                ct::OPC_CORE_PROPERTIES,
                template::core_props_xml(deck.title()),
            ),
            (
                "docProps/app.xml",
                ct::OFC_EXTENDED_PROPERTIES,
                template::app_props_xml(deck.slide_count()),
            ),
        ] {
            package
                .parts
                .push(Part::new(partname, content_type, xml, Relationships::new()));
        }

        package.rels.add(rt::OFFICE_DOCUMENT, "ppt/presentation.xml");
        package.rels.add(rt::CORE_PROPERTIES, "docProps/core.xml");
        package.rels.add(rt::EXTENDED_PROPERTIES, "docProps/app.xml");

        Ok(package)
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, partname: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.partname == partname)
    }

    /// Generate `[Content_Types].xml`.
    ///
    /// Media use extension defaults; every XML part gets an override.
    pub fn content_types_xml(&self) -> String {
        let mut defaults: BTreeMap<&str, &str> = BTreeMap::new();
        defaults.insert("rels", ct::OPC_RELATIONSHIPS);
        defaults.insert("xml", ct::XML);
        let mut overrides: BTreeMap<String, &str> = BTreeMap::new();

        for part in &self.parts {
            match (part.ext(), part.content_type) {
                ("png", ct::PNG) | ("jpeg", ct::JPEG) => {
                    defaults.insert(part.ext(), part.content_type);
                },
                _ => {
                    overrides.insert(format!("/{}", part.partname), part.content_type);
                },
            }
        }

        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, content_type) in defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{ext}" ContentType="{content_type}"/>"#
            ));
        }
        for (partname, content_type) in overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{content_type}"/>"#,
                escape_xml(&partname)
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    /// Write the package as a ZIP container.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        // Fixed timestamp keeps output independent of the wall clock
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(writer);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(self.content_types_xml().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(self.rels.to_xml().as_bytes())?;

        for part in &self.parts {
            zip.start_file(part.partname.as_str(), options)?;
            zip.write_all(&part.blob)?;

            if !part.rels.is_empty() {
                zip.start_file(part.rels_partname(), options)?;
                zip.write_all(part.rels.to_xml().as_bytes())?;
            }
        }

        Ok(zip.finish()?)
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }
}

fn media_name(number: usize, format: ImageFormat) -> String {
    format!("image{}.{}", number, format.extension())
}
