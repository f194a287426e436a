//! Fixed slide templates of the competitive-analysis deck.
pub mod layout;
pub mod style;
pub mod templates;

pub use layout::{Canvas, fitted_box_width, row_offsets};
pub use templates::{
    ComparisonEntry, chapter_slide, comparison_slide, content_slide, ending_slide, header_slide,
    section_slide, summary_slide, title_slide,
};
