//! Deck assembly: the fixed slide sequence of a report.
//!
//! Title, then per app a header and three content slides, then the optional
//! summary and the ending slide.
use crate::assets::AssetFetcher;
use crate::error::{Error, Result};
use crate::pptx::{self, Deck, Slide};
use crate::report::{AppSection, ValidatedReport};
use crate::slides::{self, Canvas};
use tracing::{debug, info};

/// Build the deck for a validated report.
///
/// Each app's logo is fetched at most once and shared by its header and
/// content slides. Any template failure aborts the whole render.
pub fn render(report: &ValidatedReport, fetcher: &dyn AssetFetcher) -> Result<Deck> {
    let canvas = Canvas::widescreen();
    let mut deck = Deck::widescreen();
    deck.set_title(report.title.as_str());

    push(
        &mut deck,
        "title slide",
        slides::title_slide(&report.title, &report.date, canvas),
    )?;

    for (index, app) in report.apps.iter().enumerate() {
        info!(app = app.name(), "rendering app {}/{}", index + 1, report.apps.len());
        render_app(&mut deck, app, fetcher, canvas)?;
    }

    if let Some(summary) = &report.summary {
        push(
            &mut deck,
            "summary slide",
            slides::summary_slide(summary, canvas),
        )?;
    }

    push(&mut deck, "ending slide", slides::ending_slide(canvas))?;

    debug!(slides = deck.slide_count(), "deck assembled");
    Ok(deck)
}

fn render_app(
    deck: &mut Deck,
    app: &AppSection,
    fetcher: &dyn AssetFetcher,
    canvas: Canvas,
) -> Result<()> {
    let logo = app.logo().and_then(|url| fetcher.fetch_and_normalize(url));
    if app.logo().is_some() && logo.is_none() {
        debug!(app = app.name(), "logo unavailable, using text-only layout");
    }

    push(
        deck,
        format!("header slide of app '{}'", app.name()),
        slides::header_slide(app.name(), logo.as_ref(), canvas),
    )?;
    for content in app.contents() {
        push(
            deck,
            format!("slide '{}' of app '{}'", content.title, app.name()),
            slides::content_slide(content, logo.as_ref(), canvas),
        )?;
    }
    Ok(())
}

fn push(
    deck: &mut Deck,
    context: impl Into<String>,
    slide: pptx::Result<Slide>,
) -> Result<()> {
    let slide = slide.map_err(|e| Error::render(context, e))?;
    deck.push_slide(slide);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{NormalizedImage, OfflineFetcher};
    use crate::pptx::ImageFormat;
    use crate::report;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const APP: &str = r#"{
        "name": "Shop",
        "logo": "https://example.com/shop.png",
        "ratings": {"ios": 4.5, "android": 4.2},
        "reviews": {
            "stats": {"positive": 85, "negative": 15},
            "analysis": {"advantages": ["a"], "improvements": ["b"], "summary": "c"}
        },
        "features": {"core": ["x"], "advantages": ["y"], "improvements": ["z"]},
        "uxScores": {"memberlogin": 1, "search": 2, "product": 3, "checkout": 4, "service": 5, "other": 6},
        "uxAnalysis": {"strengths": ["s"], "improvements": ["i"], "summary": "u"}
    }"#;

    fn report_json(apps: usize, summary: bool) -> String {
        let apps = vec![APP; apps].join(",");
        let summary = if summary {
            r#", "summary": {"dataSupport": ["d"], "keyFindings": ["k"], "recommendations": ["r"]}"#
        } else {
            ""
        };
        format!(r#"{{"title": "T", "date": "D", "apps": [{apps}]{summary}}}"#)
    }

    struct CountingFetcher {
        calls: AtomicUsize,
        image: Option<NormalizedImage>,
    }

    impl AssetFetcher for CountingFetcher {
        fn fetch_and_normalize(&self, _url: &str) -> Option<NormalizedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.image.clone()
        }
    }

    /// Fetcher that hands out bytes the slide writer rejects.
    struct BrokenFetcher;

    impl AssetFetcher for BrokenFetcher {
        fn fetch_and_normalize(&self, _url: &str) -> Option<NormalizedImage> {
            Some(NormalizedImage {
                data: Bytes::from_static(b"GIF89a"),
                format: ImageFormat::Png,
                width: 10,
                height: 10,
            })
        }
    }

    #[test]
    fn test_slide_sequence() {
        let report = report::parse(report_json(2, true).as_bytes()).unwrap();
        let deck = render(&report, &OfflineFetcher).unwrap();
        let names: Vec<_> = deck.slides().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            [
                "Title",
                "App Header",
                "Shop 概覽",
                "Shop 用戶體驗分析",
                "Shop 評論分析",
                "App Header",
                "Shop 概覽",
                "Shop 用戶體驗分析",
                "Shop 評論分析",
                "Summary",
                "Ending"
            ]
        );
        assert_eq!(deck.slide_count(), report.slide_count());
        assert_eq!(deck.title(), Some("T"));
    }

    #[test]
    fn test_logo_fetched_once_per_app() {
        let fetcher = CountingFetcher {
            calls: AtomicUsize::new(0),
            image: Some(NormalizedImage {
                data: Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
                format: ImageFormat::Png,
                width: 100,
                height: 100,
            }),
        };
        let report = report::parse(report_json(2, false).as_bytes()).unwrap();
        let deck = render(&report, &fetcher).unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

        let pictures: Vec<_> = deck.slides().iter().map(Slide::picture_count).collect();
        assert_eq!(pictures, [0, 1, 1, 1, 1, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_unavailable_logo_uses_text_layout() {
        let fetcher = CountingFetcher {
            calls: AtomicUsize::new(0),
            image: None,
        };
        let report = report::parse(report_json(1, false).as_bytes()).unwrap();
        let deck = render(&report, &fetcher).unwrap();
        assert_eq!(deck.slide_count(), 6);
        assert!(deck.slides().iter().all(|s| s.picture_count() == 0));
    }

    #[test]
    fn test_unplaceable_logo_renders_text_layout() {
        let report = report::parse(report_json(1, false).as_bytes()).unwrap();
        let deck = render(&report, &BrokenFetcher).unwrap();
        assert_eq!(deck.slide_count(), 6);
        assert!(deck.slides().iter().all(|s| s.picture_count() == 0));
    }

    #[test]
    fn test_extreme_logo_aspect_ratio_renders() {
        let fetcher = CountingFetcher {
            calls: AtomicUsize::new(0),
            image: Some(NormalizedImage {
                data: Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
                format: ImageFormat::Png,
                width: 1,
                height: 2_000_000,
            }),
        };
        let report = report::parse(report_json(1, false).as_bytes()).unwrap();
        let deck = render(&report, &fetcher).unwrap();
        assert_eq!(deck.slide_count(), 6);
        let pictures: usize = deck.slides().iter().map(|s| s.picture_count()).sum();
        assert_eq!(pictures, 4);
        pptx::to_bytes(&deck).unwrap();
    }

    #[test]
    fn test_template_failure_names_the_slide() {
        let mut deck = Deck::widescreen();
        let failed = Err(pptx::PptxError::InvalidGeometry("empty".into()));
        let err = push(&mut deck, "header slide of app 'Shop'", failed).unwrap_err();
        assert!(!err.is_validation());
        match err {
            Error::Render { context, .. } => assert_eq!(context, "header slide of app 'Shop'"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(deck.slide_count(), 0);
    }
}
