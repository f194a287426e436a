//! Remote logo retrieval.
//!
//! Logos are best effort: every failure is logged and reported as "no image",
//! and the slide that wanted it falls back to its text-only layout.
mod fetch;
mod normalize;

pub use fetch::{HttpFetcher, OfflineFetcher};
pub use normalize::{flatten_onto_white, normalize};

use crate::pptx::ImageFormat;
use bytes::Bytes;
use thiserror::Error;

/// Default timeout of a single logo request.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// An image ready to be embedded in a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    /// Encoded PNG or JPEG bytes
    pub data: Bytes,
    pub format: ImageFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Why an image could not be obtained.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("image has no pixels")]
    EmptyImage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of logo images.
pub trait AssetFetcher: Send + Sync {
    /// Download and normalize the image at `url`.
    ///
    /// Returns `None` on any failure.
    fn fetch_and_normalize(&self, url: &str) -> Option<NormalizedImage>;
}

impl<F: AssetFetcher + ?Sized> AssetFetcher for &F {
    fn fetch_and_normalize(&self, url: &str) -> Option<NormalizedImage> {
        (**self).fetch_and_normalize(url)
    }
}
