//! Input model of a competitive-analysis report.
//!
//! Field names follow the camelCase JSON of the upload format. Numbers are
//! kept as written so that `85` renders as `85` and `4.5` as `4.5`.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A number (or numeric string) displayed exactly as it appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Figure(String);

impl Figure {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rendered with a trailing percent sign.
    pub fn percent(&self) -> String {
        format!("{}%", self.0)
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Figure {
    fn from(value: &str) -> Self {
        Figure(value.to_string())
    }
}

impl<'de> Deserialize<'de> for Figure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Figure(n.to_string()),
            Raw::Text(s) => Figure(s),
        })
    }
}

/// Root input document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisReport {
    pub title: String,
    pub date: String,
    pub apps: Vec<AppEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryData>,
}

/// One competing application.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub ratings: Ratings,
    pub reviews: Reviews,
    pub features: Features,
    pub ux_scores: UxScores,
    pub ux_analysis: UxAnalysis,
}

/// Store ratings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Ratings {
    pub ios: Figure,
    pub android: Figure,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Reviews {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Figure>,
    pub stats: ReviewStats,
    pub analysis: ReviewAnalysis,
}

/// Share of positive and negative reviews, in percent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewStats {
    pub positive: Figure,
    pub negative: Figure,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewAnalysis {
    pub advantages: Vec<String>,
    pub improvements: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Features {
    pub core: Vec<String>,
    pub advantages: Vec<String>,
    pub improvements: Vec<String>,
}

/// UX scores per area, in percent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UxScores {
    pub memberlogin: Figure,
    pub search: Figure,
    pub product: Figure,
    pub checkout: Figure,
    pub service: Figure,
    pub other: Figure,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UxAnalysis {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub summary: String,
}

/// Cross-app conclusions shown on the summary slide.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryData {
    pub data_support: Vec<String>,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_keeps_input_spelling() {
        let ratings: Ratings = serde_json::from_str(r#"{"ios": 4.5, "android": "4.2"}"#).unwrap();
        assert_eq!(ratings.ios.as_str(), "4.5");
        assert_eq!(ratings.android.to_string(), "4.2");

        let stats: ReviewStats =
            serde_json::from_str(r#"{"positive": 85, "negative": 15}"#).unwrap();
        assert_eq!(stats.positive.percent(), "85%");
        assert_eq!(stats.negative.percent(), "15%");
    }

    #[test]
    fn test_figure_rejects_other_types() {
        assert!(serde_json::from_str::<Figure>("[1]").is_err());
        assert!(serde_json::from_str::<Figure>("null").is_err());
    }

    #[test]
    fn test_summary_field_names() {
        let summary: SummaryData = serde_json::from_str(
            r#"{"dataSupport": ["a"], "keyFindings": ["b"], "recommendations": []}"#,
        )
        .unwrap();
        assert_eq!(summary.data_support, vec!["a"]);
        assert_eq!(summary.key_findings, vec!["b"]);
        assert!(summary.recommendations.is_empty());
    }
}
