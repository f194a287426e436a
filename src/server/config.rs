//! Service configuration from the command line and environment.
use crate::assets::DEFAULT_FETCH_TIMEOUT_SECS;
use clap::{Args, ValueEnum};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output file name used by [`OutputNaming::Fixed`] unless overridden.
pub const DEFAULT_FIXED_OUTPUT_NAME: &str = "competitive_analysis.pptx";

/// How the stored file of an upload is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputNaming {
    /// `{stem of the uploaded file}_analysis.pptx`
    #[default]
    UploadStem,
    /// One constant name for every upload
    Fixed,
}

/// Options of the `serve` command.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "APPDECK_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Directory generated presentations are stored in.
    #[arg(long, env = "STORAGE_DIR", default_value = "generated_ppts")]
    pub storage_dir: PathBuf,

    /// Origins allowed to call the API (comma-separated, `*` for any).
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// Naming policy for generated files.
    #[arg(long, value_enum, default_value_t = OutputNaming::UploadStem)]
    pub output_naming: OutputNaming,

    /// File name used with `--output-naming fixed`.
    #[arg(long, default_value = DEFAULT_FIXED_OUTPUT_NAME)]
    pub fixed_output_name: String,

    /// Number of worker threads handling requests.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: u16,

    /// Timeout for downloading a logo, in seconds.
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// Render without downloading logos.
    #[arg(long)]
    pub offline: bool,
}

impl ServeArgs {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl OutputNaming {
    /// Name of the stored file for an upload called `upload_name`.
    pub fn output_name(&self, upload_name: Option<&str>, fixed_name: &str) -> String {
        match self {
            OutputNaming::Fixed => fixed_name.to_string(),
            OutputNaming::UploadStem => {
                // Clients may send a full path; only its last component counts.
                let base = upload_name
                    .and_then(|name| name.rsplit(['/', '\\']).next())
                    .unwrap_or("");
                let stem = Path::new(base)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(clean_stem)
                    .unwrap_or_default();
                if stem.is_empty() {
                    "analysis.pptx".to_string()
                } else {
                    format!("{stem}_analysis.pptx")
                }
            },
        }
    }
}

/// Stem with hidden-file dots, dot runs and NUL removed, so the stored name
/// is always one the download route serves.
fn clean_stem(stem: &str) -> String {
    let mut cleaned = String::with_capacity(stem.len());
    for c in stem.trim().chars().filter(|&c| c != '\0') {
        if c == '.' && (cleaned.is_empty() || cleaned.ends_with('.')) {
            continue;
        }
        cleaned.push(c);
    }
    cleaned.trim().to_string()
}
