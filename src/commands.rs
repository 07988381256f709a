use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;

use crate::cli::ClobberMode;
use crate::downloader::Downloader;
use crate::resolver;

pub async fn run_download(
    page_url: String,
    output: PathBuf,
    provider: String,
    already_resolved: bool,
    name: Option<String>,
    rate_limit: Option<u32>,
    clobber: ClobberMode,
    sha256: Option<String>,
) -> Result<()> {
    if !output.exists() {
        fs::create_dir_all(&output)
            .await
            .context("Failed to create output directory")?;
    }

    let resource_url = if already_resolved {
        page_url
    } else {
        println!("Resolving media URL...");
        resolver::resolve(&provider, &page_url)
            .await
            .with_context(|| format!("failed to resolve {}", page_url))?
    };

    let downloader = Downloader::new(output, rate_limit, clobber, sha256);
    match downloader.download(&resource_url, name.as_deref()).await {
        Ok(Some(path)) => {
            println!("Saved to {}", path.display());
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            eprintln!("Failed to download {}: {}", resource_url, e);
            Err(e)
        }
    }
}
