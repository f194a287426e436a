//! Presentation constants: colors, font sizes and fixed texts.
//!
//! Positions are given in inches and converted where they are used.
use crate::pptx::Color;

pub const ACCENT: Color = Color::rgb(30, 144, 255);
pub const TITLE_BACKGROUND: Color = Color::rgb(240, 248, 255);
pub const SECTION_BACKGROUND: Color = Color::rgb(245, 245, 245);
pub const CONTENT_BACKGROUND: Color = Color::rgb(255, 255, 255);
pub const SUBTITLE_TEXT: Color = Color::rgb(100, 100, 100);
pub const HEADING_TEXT: Color = Color::rgb(60, 60, 60);
pub const BODY_TEXT: Color = Color::rgb(80, 80, 80);
pub const BOX_FILL: Color = Color::rgb(245, 245, 245);
pub const BOX_LINE: Color = Color::rgb(200, 200, 200);

/// Column fills of the summary slide: data support, key findings, recommendations.
pub const SUMMARY_FILLS: [Color; 3] = [
    Color::rgb(227, 242, 253),
    Color::rgb(232, 245, 233),
    Color::rgb(255, 243, 224),
];

pub const COVER_TITLE_PT: f64 = 54.0;
pub const COVER_SUBTITLE_PT: f64 = 32.0;
pub const SECTION_TITLE_PT: f64 = 48.0;
pub const HEADER_TITLE_PT: f64 = 40.0;
pub const SLIDE_TITLE_PT: f64 = 36.0;
pub const LABEL_PT: f64 = 24.0;
pub const BOX_NAME_PT: f64 = 20.0;
pub const ITEM_PT: f64 = 18.0;
pub const SUMMARY_ITEM_PT: f64 = 16.0;

/// Side-by-side boxes on the comparison and summary slides.
pub const BOX_WIDTH_IN: f64 = 4.5;
pub const BOX_HEIGHT_IN: f64 = 6.0;
pub const BOX_GAP_IN: f64 = 0.5;
pub const BOX_TOP_IN: f64 = 2.0;
pub const BOX_MARGIN_IN: f64 = 0.5;

pub const BULLET: &str = "•";

pub const ENDING_TITLE: &str = "謝謝聆聽";
pub const ENDING_SUBTITLE: &str = "如有任何問題，歡迎提出討論";
pub const SUMMARY_TITLE: &str = "總結與建議";
pub const COMPARISON_TITLE: &str = "競品比較";

pub const LABEL_DATA_SUPPORT: &str = "數據支持";
pub const LABEL_KEY_FINDINGS: &str = "關鍵發現";
pub const LABEL_RECOMMENDATIONS: &str = "建議";
