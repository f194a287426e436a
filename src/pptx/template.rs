//! Fixed package parts.
//!
//! Every generated presentation shares one slide master, one blank slide
//! layout and one theme. Slides never use placeholders, so the master only
//! carries text styles and the color map. Document properties carry no
//! timestamps, which keeps the output byte-identical for identical input.

use crate::pptx::shape::escape_xml;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Empty shape tree shared by the master and the layout.
const EMPTY_SP_TREE: &str = concat!(
    r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree>"#,
);

/// Default run properties for minor-font text at a given size.
macro_rules! def_rpr {
    ($sz:literal, $font:literal) => {
        concat!(
            r#"<a:defRPr sz=""#,
            $sz,
            r#"" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
            r#"<a:latin typeface="+"#,
            $font,
            r#"-lt"/><a:ea typeface="+"#,
            $font,
            r#"-ea"/><a:cs typeface="+"#,
            $font,
            r#"-cs"/></a:defRPr>"#
        )
    };
}

/// Paragraph levels 1 and 2, used by text boxes for key lines and bullet lines.
const BODY_LEVELS: &str = concat!(
    r#"<a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
    def_rpr!("1800", "mn"),
    "</a:lvl1pPr>",
    r#"<a:lvl2pPr marL="457200" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
    def_rpr!("1800", "mn"),
    "</a:lvl2pPr>",
);

/// Default text style of the presentation part (applies to text boxes).
pub fn default_text_style_xml() -> String {
    format!(
        r#"<p:defaultTextStyle><a:defPPr><a:defRPr lang="zh-TW"/></a:defPPr>{BODY_LEVELS}</p:defaultTextStyle>"#
    )
}

/// Slide master with the Office color map and text styles.
///
/// `layout_rel_id` is the relationship ID of the single slide layout.
pub fn slide_master_xml(layout_rel_id: &str) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
    ));
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str(EMPTY_SP_TREE);
    xml.push_str("</p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
        r#"hlink="hlink" folHlink="folHlink"/>"#
    ));
    xml.push_str(&format!(
        r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="{}"/></p:sldLayoutIdLst>"#,
        layout_rel_id
    ));
    xml.push_str("<p:txStyles>");
    xml.push_str(concat!(
        "<p:titleStyle>",
        r#"<a:lvl1pPr algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
        r#"<a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/>"#,
        def_rpr!("4400", "mj"),
        "</a:lvl1pPr>",
        "</p:titleStyle>"
    ));
    xml.push_str("<p:bodyStyle>");
    xml.push_str(BODY_LEVELS);
    xml.push_str("</p:bodyStyle>");
    xml.push_str(r#"<p:otherStyle><a:defPPr><a:defRPr lang="zh-TW"/></a:defPPr>"#);
    xml.push_str(BODY_LEVELS);
    xml.push_str("</p:otherStyle>");
    xml.push_str("</p:txStyles>");
    xml.push_str("</p:sldMaster>");
    xml
}

/// The blank slide layout every slide is based on.
pub fn blank_slide_layout_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank">{tree}</p:cSld>"#,
            r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#,
            "</p:sldLayout>"
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        tree = EMPTY_SP_TREE,
    )
}

/// Office theme with an East Asian font for the Traditional Chinese labels.
pub fn theme_xml() -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<a:theme xmlns:a="{NS_A}" name="Office Theme">"#));
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (slot, rgb) in [
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ] {
        xml.push_str(&format!(r#"<a:{slot}><a:srgbClr val="{rgb}"/></a:{slot}>"#));
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    xml.push_str(concat!(
        r#"<a:majorFont><a:latin typeface="Calibri Light"/>"#,
        r#"<a:ea typeface="Microsoft JhengHei"/><a:cs typeface=""/></a:majorFont>"#,
        r#"<a:minorFont><a:latin typeface="Calibri"/>"#,
        r#"<a:ea typeface="Microsoft JhengHei"/><a:cs typeface=""/></a:minorFont>"#
    ));
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    xml.push_str(concat!(
        "<a:fillStyleLst>",
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="50000"/></a:schemeClr></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"><a:shade val="80000"/></a:schemeClr></a:solidFill>"#,
        "</a:fillStyleLst>"
    ));
    xml.push_str("<a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        xml.push_str(&format!(
            concat!(
                r#"<a:ln w="{}" cap="flat" cmpd="sng" algn="ctr">"#,
                r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
                r#"<a:prstDash val="solid"/><a:miter lim="800000"/></a:ln>"#
            ),
            width
        ));
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst>");
    xml.push_str(concat!(
        "<a:bgFillStyleLst>",
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="95000"/></a:schemeClr></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"><a:shade val="90000"/></a:schemeClr></a:solidFill>"#,
        "</a:bgFillStyleLst>"
    ));
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    xml
}

pub fn pres_props_xml() -> String {
    format!(r#"{XML_DECL}<p:presentationPr xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"/>"#)
}

pub fn view_props_xml() -> String {
    format!(
        r#"{XML_DECL}<p:viewPr xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
    )
}

pub fn table_styles_xml() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="{NS_A}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

/// Core properties (title only; no creation or modification dates).
pub fn core_props_xml(title: Option<&str>) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    if let Some(title) = title {
        xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    }
    xml.push_str("<dc:creator>appdeck</dc:creator>");
    xml.push_str("</cp:coreProperties>");
    xml
}

/// Extended properties (application name and slide count).
pub fn app_props_xml(slide_count: usize) -> String {
    format!(
        concat!(
            "{}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<Application>appdeck</Application>",
            "<PresentationFormat>Custom</PresentationFormat>",
            "<Slides>{}</Slides>",
            "</Properties>"
        ),
        XML_DECL, slide_count
    )
}
