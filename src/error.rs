//! Error types for report rendering.
//!
//! Malformed input is reported separately from failures inside the renderer,
//! so callers can tell a user-correctable problem from an internal one.
use crate::pptx::PptxError;
use thiserror::Error;

/// Main error type for appdeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input bytes are not valid UTF-8 JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Input is JSON but a required field is missing or has the wrong type
    #[error("{0}")]
    Validation(String),

    /// A slide could not be built or the deck could not be serialized
    #[error("Failed to render {context}: {source}")]
    Render {
        context: String,
        #[source]
        source: PptxError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The caller sent something wrong (4xx)
    Client,
    /// Something failed on our side (5xx)
    Server,
}

impl Error {
    pub(crate) fn render(context: impl Into<String>, source: PptxError) -> Self {
        Error::Render {
            context: context.into(),
            source,
        }
    }

    pub fn status_class(&self) -> StatusClass {
        match self {
            Error::InvalidJson(_) | Error::Validation(_) => StatusClass::Client,
            Error::Render { .. } | Error::Io(_) => StatusClass::Server,
        }
    }

    /// Whether the error came from malformed input.
    pub fn is_validation(&self) -> bool {
        self.status_class() == StatusClass::Client
    }
}

/// Result type for appdeck operations.
pub type Result<T> = std::result::Result<T, Error>;
