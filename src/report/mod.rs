//! Competitive-analysis report input.
//!
//! The upload format is parsed into [`model::AnalysisReport`] and then
//! resolved into a [`ValidatedReport`], whose apps carry the labeled content
//! of their overview, UX and review slides.

pub mod content;
pub mod model;
mod validate;

pub use content::{Content, ContentValue};
pub use model::{AnalysisReport, AppEntry, Figure, SummaryData};
pub use validate::{AppSection, ValidatedReport, parse, validate};
