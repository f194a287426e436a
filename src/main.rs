//! Command-line interface of the appdeck binary.
//!
//! `serve` runs the upload/download HTTP service; `render` turns a single
//! report file into a presentation.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use appdeck::assets::{AssetFetcher, DEFAULT_FETCH_TIMEOUT_SECS, HttpFetcher, OfflineFetcher};
use appdeck::server::{self, ServeArgs};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Competitive-analysis presentation generator.
#[derive(Debug, Parser)]
#[command(name = "appdeck", version, about = "Generate competitive-analysis presentations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Render one report file to a presentation.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Report JSON file.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Destination `.pptx` file.
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// Render without downloading logos.
    #[arg(long)]
    offline: bool,

    /// Timeout for downloading a logo, in seconds.
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    fetch_timeout_secs: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("error: {error}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Serve(args) => server::serve(&args)?,
        Command::Render(args) => run_render(&args)?,
    }
    Ok(())
}

fn run_render(args: &RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let input = std::fs::read(&args.input)?;
    let fetcher: Box<dyn AssetFetcher> = if args.offline {
        Box::new(OfflineFetcher)
    } else {
        Box::new(HttpFetcher::new(Duration::from_secs(args.fetch_timeout_secs))?)
    };
    let path = appdeck::generate_with(&input, &args.output, fetcher.as_ref())?;
    println!("{}", path.display());
    Ok(())
}
