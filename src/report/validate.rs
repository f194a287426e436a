//! Parsing and validation of uploaded report JSON.
use crate::error::{Error, Result};
use crate::report::content::{self, Content};
use crate::report::model::{AnalysisReport, AppEntry, SummaryData};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

const REQUIRED_FIELDS: [&str; 3] = ["title", "date", "apps"];

/// One app with its three content slides resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSection {
    pub entry: AppEntry,
    pub overview: Content,
    pub ux: Content,
    pub reviews: Content,
}

impl AppSection {
    fn new(entry: AppEntry) -> Self {
        Self {
            overview: content::overview(&entry),
            ux: content::ux_analysis(&entry),
            reviews: content::review_analysis(&entry),
            entry,
        }
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Logo URL, if a non-blank one was supplied.
    pub fn logo(&self) -> Option<&str> {
        self.entry
            .logo
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Content slides in presentation order.
    pub fn contents(&self) -> [&Content; 3] {
        [&self.overview, &self.ux, &self.reviews]
    }
}

/// A report that passed validation and is ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReport {
    pub title: String,
    pub date: String,
    pub apps: Vec<AppSection>,
    pub summary: Option<SummaryData>,
}

impl ValidatedReport {
    /// Number of slides the report renders to.
    pub fn slide_count(&self) -> usize {
        2 + 4 * self.apps.len() + usize::from(self.summary.is_some())
    }
}

impl From<AnalysisReport> for ValidatedReport {
    fn from(report: AnalysisReport) -> Self {
        Self {
            title: report.title,
            date: report.date,
            apps: report.apps.into_iter().map(AppSection::new).collect(),
            summary: report.summary,
        }
    }
}

/// Parse and validate report bytes.
///
/// Invalid JSON yields [`Error::InvalidJson`]. A missing or mistyped field
/// yields [`Error::Validation`] naming the field.
pub fn parse(input: &[u8]) -> Result<ValidatedReport> {
    let value: Value = serde_json::from_slice(input)?;
    validate(value)
}

/// Validate an already parsed JSON document.
pub fn validate(value: Value) -> Result<ValidatedReport> {
    let Value::Object(mut root) = value else {
        return Err(Error::Validation(
            "Report must be a JSON object".to_string(),
        ));
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !root.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(Error::Validation(format!(
            "Missing required fields in JSON data: {}",
            missing.join(", ")
        )));
    }

    let title: String = field(&mut root, "title")?;
    let date: String = field(&mut root, "date")?;

    let Some(Value::Array(raw_apps)) = root.remove("apps") else {
        return Err(Error::Validation("Field `apps` must be an array".to_string()));
    };
    let mut apps = Vec::with_capacity(raw_apps.len());
    for (index, raw) in raw_apps.into_iter().enumerate() {
        let label = raw
            .get("name")
            .and_then(Value::as_str)
            .map(|name| format!("apps[{index}] ({name})"))
            .unwrap_or_else(|| format!("apps[{index}]"));
        let entry: AppEntry = serde_json::from_value(raw)
            .map_err(|e| Error::Validation(format!("Invalid field in {label}: {e}")))?;
        apps.push(entry);
    }

    let summary = match root.remove("summary") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            serde_json::from_value::<SummaryData>(raw)
                .map_err(|e| Error::Validation(format!("Invalid field in summary: {e}")))?,
        ),
    };

    debug!(apps = apps.len(), summary = summary.is_some(), "report validated");
    Ok(AnalysisReport {
        title,
        date,
        apps,
        summary,
    }
    .into())
}

fn field<T: DeserializeOwned>(root: &mut Map<String, Value>, name: &str) -> Result<T> {
    let raw = root.remove(name).unwrap_or(Value::Null);
    serde_json::from_value(raw)
        .map_err(|e| Error::Validation(format!("Invalid field `{name}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = r#"{
        "name": "Shop",
        "logo": "  ",
        "ratings": {"ios": 4.5, "android": 4.2},
        "reviews": {
            "stats": {"positive": 85, "negative": 15},
            "analysis": {"advantages": [], "improvements": [], "summary": ""}
        },
        "features": {"core": [], "advantages": [], "improvements": []},
        "uxScores": {"memberlogin": 1, "search": 2, "product": 3, "checkout": 4, "service": 5, "other": 6},
        "uxAnalysis": {"strengths": [], "improvements": [], "summary": ""}
    }"#;

    fn report(apps: &str, extra: &str) -> String {
        format!(r#"{{"title": "T", "date": "D", "apps": [{apps}]{extra}}}"#)
    }

    #[test]
    fn test_parse_valid_report() {
        let report = parse(report(APP, "").as_bytes()).unwrap();
        assert_eq!(report.title, "T");
        assert_eq!(report.apps.len(), 1);
        assert_eq!(report.apps[0].name(), "Shop");
        assert_eq!(report.apps[0].logo(), None);
        assert_eq!(report.slide_count(), 6);
    }

    #[test]
    fn test_summary_adds_a_slide() {
        let json = report(
            APP,
            r#", "summary": {"dataSupport": [], "keyFindings": ["k"], "recommendations": []}"#,
        );
        let report = parse(json.as_bytes()).unwrap();
        assert!(report.summary.is_some());
        assert_eq!(report.slide_count(), 7);

        let report = parse(report_with_null_summary().as_bytes()).unwrap();
        assert!(report.summary.is_none());
    }

    fn report_with_null_summary() -> String {
        report("", r#", "summary": null"#)
    }

    #[test]
    fn test_invalid_json() {
        let err = parse(b"{not json").unwrap_err();
        assert!(matches!(err, Error::InvalidJson(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_required_fields() {
        for json in [
            r#"{"date": "D", "apps": []}"#,
            r#"{"title": "T", "apps": []}"#,
            r#"{"title": "T", "date": "D"}"#,
        ] {
            let err = parse(json.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{json}");
        }

        let err = parse(br#"{"apps": []}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields in JSON data: title, date"
        );
    }

    #[test]
    fn test_non_object_and_wrong_types() {
        assert!(matches!(parse(b"[]").unwrap_err(), Error::Validation(_)));
        assert!(matches!(
            parse(br#"{"title": 1, "date": "D", "apps": []}"#).unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            parse(br#"{"title": "T", "date": "D", "apps": {}}"#).unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[test]
    fn test_nested_error_names_the_app() {
        let err = parse(report(r#"{"name": "Broken"}"#, "").as_bytes()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid field in apps[0] (Broken):"), "{message}");
        assert!(message.contains("ratings"), "{message}");
    }

    #[test]
    fn test_empty_apps_is_valid() {
        let report = parse(report("", "").as_bytes()).unwrap();
        assert!(report.apps.is_empty());
        assert_eq!(report.slide_count(), 2);
    }
}
