//! PresentationML (.pptx) writer.
//!
//! A small mutable model of a presentation and the package writer that turns
//! it into an Office Open XML ZIP container.
//!
//! # Example
//!
//! ```no_run
//! use appdeck::pptx::{Color, Deck, Frame, Paragraph, RunFormat, Slide, TextBody};
//! use appdeck::pptx::unit::inches;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut deck = Deck::widescreen();
//! let mut slide = Slide::new("title", Color::rgb(240, 248, 255));
//! slide.add_text_box(
//!     Frame::new(inches(2.0), inches(3.0), inches(12.0), inches(1.5)),
//!     TextBody::new().with_paragraph(Paragraph::new(
//!         "Hello",
//!         RunFormat::new(54.0, Color::rgb(30, 144, 255)).bold(),
//!     )),
//! );
//! deck.push_slide(slide);
//! let bytes = appdeck::pptx::to_bytes(&deck)?;
//! std::fs::write("hello.pptx", bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
mod deck;
mod error;
mod format;
pub mod package;
mod shape;
mod slide;
mod template;
pub mod unit;

pub use deck::Deck;
pub use error::{PptxError, Result};
pub use format::{Alignment, Color, ImageFormat, Paragraph, RunFormat, TextBody};
pub use package::Package;
pub use shape::{Frame, Geometry, Shape, ShapeKind};
pub use slide::Slide;

/// Serialize a deck to the bytes of a `.pptx` file.
pub fn to_bytes(deck: &Deck) -> Result<Vec<u8>> {
    Package::from_deck(deck)?.to_bytes()
}
