//! Slide templates.
//!
//! Every template is a pure function of its input and the canvas. The only
//! optional part is the logo, which is passed in already downloaded; a missing
//! logo selects the text-only layout.
use crate::assets::NormalizedImage;
use crate::pptx::unit::{fit_extent, inches};
use crate::pptx::{Alignment, Frame, Geometry, Paragraph, Result, RunFormat, Slide, TextBody};
use crate::report::model::{AppEntry, SummaryData};
use crate::report::Content;
use crate::slides::layout::{Canvas, fitted_box_width, row_offsets};
use crate::slides::style::*;
use tracing::warn;

/// One app on the comparison slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonEntry {
    pub name: String,
    pub lines: Vec<String>,
}

impl From<&AppEntry> for ComparisonEntry {
    fn from(app: &AppEntry) -> Self {
        let stats = &app.reviews.stats;
        Self {
            name: app.name.clone(),
            lines: vec![
                format!("iOS: {}", app.ratings.ios),
                format!("Android: {}", app.ratings.android),
                format!("正面評價: {}", stats.positive.percent()),
                format!("負面評價: {}", stats.negative.percent()),
            ],
        }
    }
}

fn bullet(text: &str, size: f64) -> Paragraph {
    Paragraph::new(format!("{BULLET} {text}"), RunFormat::new(size, BODY_TEXT))
}

fn single(text: &str, format: RunFormat) -> TextBody {
    TextBody::new().with_paragraph(Paragraph::new(text, format))
}

/// Place a logo on the slide, or report `false` so the caller keeps the
/// text-only layout.
fn place_logo(slide: &mut Slide, logo: &NormalizedImage, frame: Frame, description: String) -> bool {
    match slide.add_picture(logo.data.clone(), frame, description) {
        Ok(_) => true,
        Err(err) => {
            warn!(
                slide = slide.name(),
                width = logo.width,
                height = logo.height,
                error = %err,
                "logo not placed, using text layout"
            );
            false
        },
    }
}

fn centered(text: &str, format: RunFormat) -> TextBody {
    TextBody::new().with_paragraph(Paragraph::new(text, format).align(Alignment::Center))
}

/// Cover layout shared by the title and ending slides.
fn cover(name: &str, title: &str, subtitle: &str, canvas: Canvas) -> Slide {
    let mut slide = Slide::new(name, TITLE_BACKGROUND);
    slide.add_shape(
        Geometry::Rectangle,
        Frame::new(0, 0, inches(1.0), canvas.height),
        Some(ACCENT),
        None,
        None,
    );
    slide.add_text_box(
        Frame::new(inches(2.0), inches(3.0), inches(12.0), inches(1.5)),
        single(title, RunFormat::new(COVER_TITLE_PT, ACCENT).bold()),
    );
    slide.add_text_box(
        Frame::new(inches(2.0), inches(4.5), inches(12.0), inches(1.0)),
        single(subtitle, RunFormat::new(COVER_SUBTITLE_PT, SUBTITLE_TEXT)),
    );
    slide
}

/// Opening slide with the report title and date.
pub fn title_slide(title: &str, subtitle: &str, canvas: Canvas) -> Result<Slide> {
    Ok(cover("Title", title, subtitle, canvas))
}

/// Closing slide with fixed text.
pub fn ending_slide(canvas: Canvas) -> Result<Slide> {
    Ok(cover("Ending", ENDING_TITLE, ENDING_SUBTITLE, canvas))
}

/// Divider slide with a large title over a thin accent bar.
pub fn section_slide(title: &str, canvas: Canvas) -> Result<Slide> {
    let mut slide = Slide::new("Section", SECTION_BACKGROUND);
    let width = inches(12.0);
    let x = canvas.centered_x(width);
    slide.add_text_box(
        Frame::new(x, inches(3.0), width, inches(1.5)),
        single(title, RunFormat::new(SECTION_TITLE_PT, ACCENT).bold()),
    );
    slide.add_shape(
        Geometry::Rectangle,
        Frame::new(x, inches(4.5), width, inches(0.05)),
        Some(ACCENT),
        None,
        None,
    );
    Ok(slide)
}

/// Per-app opening slide: centered logo above the app name.
pub fn header_slide(name: &str, logo: Option<&NormalizedImage>, canvas: Canvas) -> Result<Slide> {
    let mut slide = Slide::new("App Header", TITLE_BACKGROUND);
    let title_width = inches(12.0);
    let title_height = inches(1.2);

    let placed = logo.is_some_and(|logo| {
        let (width, height) = fit_extent(logo.width, logo.height, canvas.width, inches(2.0));
        let frame = Frame::new(canvas.centered_x(width), inches(2.0), width, height);
        place_logo(&mut slide, logo, frame, format!("{name} logo"))
    });
    let title_top = if placed { inches(4.3) } else { inches(3.5) };

    slide.add_text_box(
        Frame::new(canvas.centered_x(title_width), title_top, title_width, title_height),
        centered(name, RunFormat::new(HEADER_TITLE_PT, ACCENT).bold()),
    );
    slide.add_shape(
        Geometry::Rectangle,
        Frame::new(
            canvas.centered_x(inches(4.0)),
            title_top + title_height + inches(0.2),
            inches(4.0),
            inches(0.05),
        ),
        Some(ACCENT),
        None,
        None,
    );
    Ok(slide)
}

/// Labeled content with an optional icon left of the title.
///
/// Each label is a bold heading line followed by its value lines at level 1.
pub fn content_slide(
    content: &Content,
    icon: Option<&NormalizedImage>,
    _canvas: Canvas,
) -> Result<Slide> {
    let mut slide = Slide::new(content.title.as_str(), CONTENT_BACKGROUND);

    let placed = icon.is_some_and(|icon| {
        let (width, height) = fit_extent(icon.width, icon.height, inches(1.1), inches(1.0));
        let frame = Frame::new(inches(1.0), inches(0.5), width, height);
        place_logo(&mut slide, icon, frame, "app icon".to_string())
    });
    let title_left = if placed { inches(2.2) } else { inches(1.0) };

    slide.add_text_box(
        Frame::new(title_left, inches(0.5), inches(13.0), inches(1.0)),
        single(&content.title, RunFormat::new(SLIDE_TITLE_PT, ACCENT).bold()),
    );

    let mut body = TextBody::wrapped();
    for (label, value) in &content.entries {
        body.push(Paragraph::new(
            format!("{label}:"),
            RunFormat::new(LABEL_PT, HEADING_TEXT).bold(),
        ));
        for line in value.lines() {
            body.push(bullet(&line, ITEM_PT).level(1));
        }
    }
    slide.add_text_box(
        Frame::new(inches(1.0), inches(1.8), inches(14.0), inches(6.0)),
        body,
    );
    Ok(slide)
}

/// Side-by-side boxes, one per app, centered as a group.
///
/// Boxes keep their nominal width while they fit; with many apps they shrink
/// so the row stays inside the side margins.
pub fn comparison_slide(title: &str, apps: &[ComparisonEntry], canvas: Canvas) -> Result<Slide> {
    let mut slide = Slide::new("Comparison", CONTENT_BACKGROUND);
    slide.add_text_box(
        Frame::new(inches(1.0), inches(0.5), inches(14.0), inches(1.0)),
        single(title, RunFormat::new(SLIDE_TITLE_PT, ACCENT).bold()),
    );

    let gap = inches(BOX_GAP_IN);
    let box_width = fitted_box_width(
        canvas.width,
        apps.len(),
        inches(BOX_WIDTH_IN),
        gap,
        inches(BOX_MARGIN_IN),
    );
    for (app, left) in apps
        .iter()
        .zip(row_offsets(canvas.width, apps.len(), box_width, gap))
    {
        let mut body = TextBody::wrapped().with_paragraph(
            Paragraph::new(
                app.name.as_str(),
                RunFormat::new(BOX_NAME_PT, HEADING_TEXT).bold(),
            )
            .align(Alignment::Center),
        );
        for line in &app.lines {
            body.push(bullet(line, ITEM_PT));
        }
        slide.add_shape(
            Geometry::RoundedRectangle,
            Frame::new(left, inches(BOX_TOP_IN), box_width, inches(BOX_HEIGHT_IN)),
            Some(BOX_FILL),
            Some(BOX_LINE),
            Some(body),
        );
    }
    Ok(slide)
}

/// Title plus three stacked sections: key findings, data support, recommendations.
pub fn chapter_slide(title: &str, chapter: &SummaryData, _canvas: Canvas) -> Result<Slide> {
    let mut slide = Slide::new("Chapter", CONTENT_BACKGROUND);
    slide.add_text_box(
        Frame::new(inches(1.0), inches(0.5), inches(14.0), inches(1.0)),
        single(title, RunFormat::new(SLIDE_TITLE_PT, ACCENT).bold()),
    );

    let sections = [
        (LABEL_KEY_FINDINGS, &chapter.key_findings),
        (LABEL_DATA_SUPPORT, &chapter.data_support),
        (LABEL_RECOMMENDATIONS, &chapter.recommendations),
    ];
    let mut top = inches(2.0);
    for (heading, items) in sections {
        slide.add_text_box(
            Frame::new(inches(1.0), top, inches(14.0), inches(0.5)),
            single(heading, RunFormat::new(LABEL_PT, HEADING_TEXT).bold()),
        );
        let mut body = TextBody::wrapped();
        for item in items {
            body.push(bullet(item, ITEM_PT));
        }
        slide.add_text_box(
            Frame::new(inches(1.0), top + inches(0.7), inches(14.0), inches(1.8)),
            body,
        );
        top += inches(2.5);
    }
    Ok(slide)
}

/// Three colored columns: data support, key findings, recommendations.
pub fn summary_slide(summary: &SummaryData, canvas: Canvas) -> Result<Slide> {
    let mut slide = Slide::new("Summary", CONTENT_BACKGROUND);
    slide.add_text_box(
        Frame::new(inches(1.0), inches(0.5), inches(14.0), inches(1.0)),
        single(SUMMARY_TITLE, RunFormat::new(SLIDE_TITLE_PT, ACCENT).bold()),
    );

    let columns = [
        (LABEL_DATA_SUPPORT, &summary.data_support),
        (LABEL_KEY_FINDINGS, &summary.key_findings),
        (LABEL_RECOMMENDATIONS, &summary.recommendations),
    ];
    let width = inches(BOX_WIDTH_IN);
    let offsets = row_offsets(canvas.width, columns.len(), width, inches(BOX_GAP_IN));
    for (((heading, items), fill), left) in columns.into_iter().zip(SUMMARY_FILLS).zip(offsets) {
        slide.add_shape(
            Geometry::RoundedRectangle,
            Frame::new(left, inches(BOX_TOP_IN), width, inches(BOX_HEIGHT_IN)),
            Some(fill),
            None,
            None,
        );

        let inset = inches(0.2);
        let inner_width = width - 2 * inset;
        slide.add_text_box(
            Frame::new(left + inset, inches(BOX_TOP_IN) + inset, inner_width, inches(0.6)),
            centered(heading, RunFormat::new(LABEL_PT, HEADING_TEXT).bold()),
        );

        let mut body = TextBody::wrapped();
        for item in items {
            body.push(bullet(item, SUMMARY_ITEM_PT));
        }
        slide.add_text_box(
            Frame::new(
                left + inset,
                inches(BOX_TOP_IN) + inches(1.0),
                inner_width,
                inches(BOX_HEIGHT_IN) - inches(1.2),
            ),
            body,
        );
    }
    Ok(slide)
}
