//! Labeled slide content resolved from an app entry.
//!
//! Each content slide shows an ordered list of labels, and every label holds
//! exactly one kind of value. The kind is fixed when the report is validated.
use crate::report::model::AppEntry;

/// Value shown under a content label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValue {
    /// One bullet per item
    List(Vec<String>),
    /// One `key: value` bullet per pair
    Pairs(Vec<(String, String)>),
    /// A single bullet
    Text(String),
}

impl ContentValue {
    /// Bullet texts without the bullet glyph.
    pub fn lines(&self) -> Vec<String> {
        match self {
            ContentValue::List(items) => items.clone(),
            ContentValue::Pairs(pairs) => pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect(),
            ContentValue::Text(text) => vec![text.clone()],
        }
    }
}

/// Title plus labeled values of one content slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub title: String,
    pub entries: Vec<(String, ContentValue)>,
}

impl Content {
    fn new(title: String) -> Self {
        Self {
            title,
            entries: Vec::new(),
        }
    }

    fn entry(mut self, label: &str, value: ContentValue) -> Self {
        self.entries.push((label.to_string(), value));
        self
    }

    pub fn get(&self, label: &str) -> Option<&ContentValue> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }
}

fn pairs<const N: usize>(items: [(&str, String); N]) -> ContentValue {
    ContentValue::Pairs(
        items
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

/// Ratings, review split, and feature lists.
pub fn overview(app: &AppEntry) -> Content {
    let stats = &app.reviews.stats;
    let mut review_stats = vec![
        ("正面評價".to_string(), stats.positive.percent()),
        ("負面評價".to_string(), stats.negative.percent()),
    ];
    if let Some(count) = &app.reviews.count {
        review_stats.push(("評論總數".to_string(), count.to_string()));
    }

    Content::new(format!("{} 概覽", app.name))
        .entry(
            "評分",
            pairs([
                ("iOS", app.ratings.ios.to_string()),
                ("Android", app.ratings.android.to_string()),
            ]),
        )
        .entry("評論統計", ContentValue::Pairs(review_stats))
        .entry("核心功能", ContentValue::List(app.features.core.clone()))
        .entry("優勢", ContentValue::List(app.features.advantages.clone()))
        .entry("待改進", ContentValue::List(app.features.improvements.clone()))
}

/// UX scores per area and the UX assessment.
pub fn ux_analysis(app: &AppEntry) -> Content {
    let scores = &app.ux_scores;
    let ux = &app.ux_analysis;
    Content::new(format!("{} 用戶體驗分析", app.name))
        .entry(
            "用戶體驗評分",
            pairs([
                ("會員登入", scores.memberlogin.percent()),
                ("搜尋功能", scores.search.percent()),
                ("商品相關", scores.product.percent()),
                ("結帳付款", scores.checkout.percent()),
                ("客戶服務", scores.service.percent()),
                ("其他", scores.other.percent()),
            ]),
        )
        .entry("優勢", ContentValue::List(ux.strengths.clone()))
        .entry("待改進", ContentValue::List(ux.improvements.clone()))
        .entry("總結", ContentValue::Text(ux.summary.clone()))
}

/// Findings from user reviews.
pub fn review_analysis(app: &AppEntry) -> Content {
    let analysis = &app.reviews.analysis;
    Content::new(format!("{} 評論分析", app.name))
        .entry("優勢", ContentValue::List(analysis.advantages.clone()))
        .entry("待改進", ContentValue::List(analysis.improvements.clone()))
        .entry("總結", ContentValue::Text(analysis.summary.clone()))
}
