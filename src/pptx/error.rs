/// Error types for building and serializing PPTX packages.
use thiserror::Error;

/// Result type for PPTX writer operations.
pub type Result<T> = std::result::Result<T, PptxError>;

/// Error types for PPTX writer operations.
#[derive(Error, Debug)]
pub enum PptxError {
    /// XML generation error
    #[error("XML error: {0}")]
    Xml(String),

    /// Image data that cannot be embedded in a slide
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Shape geometry that cannot be written
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::fmt::Error> for PptxError {
    fn from(err: std::fmt::Error) -> Self {
        PptxError::Xml(err.to_string())
    }
}
