//! appdeck - competitive-analysis presentations from JSON
//!
//! This library turns a JSON description of competing mobile apps (ratings,
//! review statistics, feature lists, UX scores and written analysis) into a
//! 16:9 PowerPoint deck, and ships a small HTTP service around it.
//!
//! # Features
//!
//! - **Validation**: malformed input is rejected before any slide is built,
//!   with a message naming the offending field
//! - **Fixed templates**: title, app header, overview, UX analysis, review
//!   analysis, summary and ending slides (plus section, comparison and
//!   chapter templates)
//! - **Best-effort logos**: remote logos are downloaded once per app and
//!   normalized; any failure falls back to a text-only layout
//! - **Deterministic output**: identical input gives byte-identical files
//! - **Atomic writes**: a failed write never leaves a truncated file behind
//!
//! # Example - Rendering a report
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = std::fs::read("report.json")?;
//! let path = appdeck::generate(&input, Path::new("out/analysis.pptx"))?;
//! println!("Wrote {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Rendering without network access
//!
//! ```no_run
//! use appdeck::assets::OfflineFetcher;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = std::fs::read("report.json")?;
//! appdeck::generate_with(&input, Path::new("analysis.pptx"), &OfflineFetcher)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Input format
//!
//! ```json
//! {
//!   "title": "Shopping apps 2024",
//!   "date": "2024-05-01",
//!   "apps": [{
//!     "name": "Shop",
//!     "logo": "https://example.com/logo.png",
//!     "ratings": {"ios": 4.5, "android": 4.2},
//!     "reviews": {
//!       "count": 1200,
//!       "stats": {"positive": 85, "negative": 15},
//!       "analysis": {"advantages": ["..."], "improvements": ["..."], "summary": "..."}
//!     },
//!     "features": {"core": ["..."], "advantages": ["..."], "improvements": ["..."]},
//!     "uxScores": {"memberlogin": 80, "search": 70, "product": 90,
//!                  "checkout": 60, "service": 75, "other": 65},
//!     "uxAnalysis": {"strengths": ["..."], "improvements": ["..."], "summary": "..."}
//!   }],
//!   "summary": {"dataSupport": ["..."], "keyFindings": ["..."], "recommendations": ["..."]}
//! }
//! ```

pub mod assembler;
pub mod assets;
pub mod error;
pub mod pptx;
pub mod report;
pub mod server;
pub mod slides;
pub mod writer;

pub use error::{Error, Result, StatusClass};

use assets::{AssetFetcher, DEFAULT_FETCH_TIMEOUT_SECS, HttpFetcher, OfflineFetcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Render report JSON to a `.pptx` file at `output`, fetching logos over HTTP.
///
/// Returns the path that was written.
pub fn generate(input: &[u8], output: &Path) -> Result<PathBuf> {
    match HttpFetcher::new(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)) {
        Ok(fetcher) => generate_with(input, output, &fetcher),
        Err(err) => {
            warn!(error = %err, "HTTP client unavailable, rendering without logos");
            generate_with(input, output, &OfflineFetcher)
        },
    }
}

/// Render report JSON to a `.pptx` file at `output` using the given logo source.
pub fn generate_with(
    input: &[u8],
    output: &Path,
    fetcher: &dyn AssetFetcher,
) -> Result<PathBuf> {
    let report = report::parse(input)?;
    info!(
        title = %report.title,
        apps = report.apps.len(),
        "generating presentation"
    );
    let deck = assembler::render(&report, fetcher)?;
    writer::write(&deck, output)?;
    Ok(output.to_path_buf())
}
