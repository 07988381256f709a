mod accumulator;
mod cli;
mod commands;
mod downloader;
mod error;
mod fetch;
mod hashing;
mod materialize;
mod progress;
mod resolver;
mod session;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::cli::ClobberMode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Media page URL to resolve and download
    #[arg(index = 1)]
    url: String,

    /// Directory to save the downloaded file
    #[arg(short = 'd', long = "download-dir", default_value = "downloads")]
    download_dir: PathBuf,

    /// Filename to save under (derived from the resolved URL when omitted)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Resolver provider name
    #[arg(short = 'P', long, default_value = "cobalt")]
    provider: String,

    /// Treat URL as an already-resolved direct resource URL
    #[arg(long)]
    resolved: bool,

    /// Rate limit in bytes per second (e.g., 1048576 for 1MB/s)
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(1..))]
    rate_limit: Option<u32>,

    /// Expected SHA-256 of the payload; a mismatch aborts before saving
    #[arg(long)]
    sha256: Option<String>,

    /// What to do when the target file already exists
    #[arg(long, value_enum, default_value = "rename")]
    clobber: ClobberMode,
}

fn main() -> Result<()> {
    let mut args = Args::parse();

    // Resolve the output dir relative to the current dir up front
    if args.download_dir.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            args.download_dir = cwd.join(&args.download_dir);
        }
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(commands::run_download(
        args.url,
        args.download_dir,
        args.provider,
        args.resolved,
        args.name,
        args.rate_limit,
        args.clobber,
        args.sha256,
    ))
}
