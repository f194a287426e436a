use appdeck::assets::{HttpFetcher, OfflineFetcher};
use appdeck::{Error, assembler, report};
use proptest::prelude::*;
use std::fs;
use std::io::{Cursor, Read};
use std::time::Duration;

const FIXTURE: &str = include_str!("fixtures/report.json");

fn app_json(name: &str) -> String {
    format!(
        r#"{{
            "name": "{name}",
            "ratings": {{"ios": 4.1, "android": 3.9}},
            "reviews": {{
                "stats": {{"positive": 70, "negative": 30}},
                "analysis": {{"advantages": ["a"], "improvements": ["b"], "summary": "c"}}
            }},
            "features": {{"core": ["x"], "advantages": ["y"], "improvements": ["z"]}},
            "uxScores": {{"memberlogin": 1, "search": 2, "product": 3, "checkout": 4, "service": 5, "other": 6}},
            "uxAnalysis": {{"strengths": ["s"], "improvements": ["i"], "summary": "u"}}
        }}"#
    )
}

fn report_json(apps: usize, summary: bool) -> String {
    let apps: Vec<String> = (0..apps).map(|i| app_json(&format!("App{i}"))).collect();
    let summary = if summary {
        r#", "summary": {"dataSupport": ["d"], "keyFindings": ["k"], "recommendations": ["r"]}"#
    } else {
        ""
    };
    format!(
        r#"{{"title": "T", "date": "D", "apps": [{}]{summary}}}"#,
        apps.join(",")
    )
}

fn read_entry(pptx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(pptx)).unwrap();
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

fn slide_entries(pptx: &[u8]) -> usize {
    let archive = zip::ZipArchive::new(Cursor::new(pptx)).unwrap();
    archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count()
}

#[test]
fn test_end_to_end_single_app() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("nested/dir/analysis.pptx");

    let path = appdeck::generate_with(FIXTURE.as_bytes(), &output, &OfflineFetcher).unwrap();
    assert_eq!(path, output);

    let bytes = fs::read(&path).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(slide_entries(&bytes), 6);

    let presentation = read_entry(&bytes, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldSz cx="14630400" cy="8229600"/>"#));

    let title = read_entry(&bytes, "ppt/slides/slide1.xml");
    assert!(title.contains("購物 App 競品分析"));
    assert!(title.contains("2024-05-01"));

    let overview = read_entry(&bytes, "ppt/slides/slide3.xml");
    assert!(overview.contains("ShopGo 概覽"));
    assert!(overview.contains("• iOS: 4.7"));
    assert!(overview.contains("• 正面評價: 85%"));
    assert!(overview.contains("• 評論總數: 12800"));

    let ux = read_entry(&bytes, "ppt/slides/slide4.xml");
    assert!(ux.contains("• 結帳付款: 93%"));

    let ending = read_entry(&bytes, "ppt/slides/slide6.xml");
    assert!(ending.contains("謝謝聆聽"));
}

#[test]
fn test_generate_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = report_json(2, true);
    let first = appdeck::generate_with(input.as_bytes(), &dir.path().join("a.pptx"), &OfflineFetcher)
        .unwrap();
    let second =
        appdeck::generate_with(input.as_bytes(), &dir.path().join("b.pptx"), &OfflineFetcher)
            .unwrap();
    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn test_missing_fields_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    for input in [
        r#"{"date": "D", "apps": []}"#,
        r#"{"title": "T", "apps": []}"#,
        r#"{"title": "T", "date": "D"}"#,
    ] {
        let output = dir.path().join("out.pptx");
        let err = appdeck::generate_with(input.as_bytes(), &output, &OfflineFetcher).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{input}");
        assert!(!output.exists());
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_invalid_json_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pptx");
    let err = appdeck::generate_with(b"{\"title\": ", &output, &OfflineFetcher).unwrap_err();
    assert!(matches!(err, Error::InvalidJson(_)));
    assert!(err.is_validation());
    assert!(!output.exists());
}

#[test]
fn test_unreachable_logo_falls_back_to_text_layout() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("logo.pptx");
    let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();

    appdeck::generate_with(FIXTURE.as_bytes(), &output, &fetcher).unwrap();

    let bytes = fs::read(&output).unwrap();
    assert_eq!(slide_entries(&bytes), 6);
    let archive = zip::ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
    assert!(!archive.file_names().any(|n| n.starts_with("ppt/media/")));
}

#[test]
fn test_empty_apps_renders_title_and_ending() {
    let report = report::parse(report_json(0, false).as_bytes()).unwrap();
    let deck = assembler::render(&report, &OfflineFetcher).unwrap();
    let names: Vec<_> = deck.slides().iter().map(|s| s.name()).collect();
    assert_eq!(names, ["Title", "Ending"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_slide_count_and_order(apps in 0usize..5, summary in any::<bool>()) {
        let report = report::parse(report_json(apps, summary).as_bytes()).unwrap();
        let deck = assembler::render(&report, &OfflineFetcher).unwrap();

        prop_assert_eq!(deck.slide_count(), 1 + 4 * apps + usize::from(summary) + 1);

        let names: Vec<&str> = deck.slides().iter().map(|s| s.name()).collect();
        prop_assert_eq!(names[0], "Title");
        prop_assert_eq!(names[names.len() - 1], "Ending");
        for i in 0..apps {
            let base = 1 + 4 * i;
            prop_assert_eq!(names[base], "App Header");
            prop_assert_eq!(names[base + 1], format!("App{i} 概覽"));
            prop_assert_eq!(names[base + 2], format!("App{i} 用戶體驗分析"));
            prop_assert_eq!(names[base + 3], format!("App{i} 評論分析"));
        }
        if summary {
            prop_assert_eq!(names[names.len() - 2], "Summary");
        }
    }
}
