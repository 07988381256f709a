use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use indicatif::HumanBytes;
use reqwest::Client;
use tokio::fs;

use crate::accumulator::ByteAccumulator;
use crate::cli::ClobberMode;
use crate::fetch;
use crate::hashing;
use crate::materialize;
use crate::progress::ProgressRenderer;
use crate::session::DownloadSession;
use crate::utils::{filename_from_url, sanitize_filename, unique_filepath, DEFAULT_FILENAME};

pub struct Downloader {
    client: Client,
    output_dir: PathBuf,
    rate_limiter: Option<Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    clobber: ClobberMode,
    expected_sha256: Option<String>,
}

impl Downloader {
    pub fn new(
        output_dir: PathBuf,
        rate_limit_bytes_per_sec: Option<u32>,
        clobber: ClobberMode,
        expected_sha256: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .user_agent("vdl/0.1.0")
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        let rate_limiter = rate_limit_bytes_per_sec
            .and_then(NonZeroU32::new)
            .map(|limit| Arc::new(RateLimiter::direct(Quota::per_second(limit))));

        Self {
            client,
            output_dir,
            rate_limiter,
            clobber,
            expected_sha256,
        }
    }

    /// Streams the resource into memory, then persists it in one step.
    /// Returns the saved path, or None when an existing file was kept.
    pub async fn download(
        &self,
        resource_url: &str,
        name_override: Option<&str>,
    ) -> Result<Option<PathBuf>> {
        let filename = match name_override {
            Some(name) => sanitize_filename(name),
            None => filename_from_url(resource_url).unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
        };

        let filepath = match self.resolve_collision(&self.output_dir.join(&filename)).await? {
            Some(path) => path,
            None => return Ok(None),
        };

        let mut session = DownloadSession::new(resource_url);
        let mut stream = match fetch::open(&self.client, session.resource_url()).await {
            Ok(stream) => stream,
            Err(err) => {
                session.fail();
                return Err(err).context(format!("failed to open {}", resource_url));
            }
        };

        session.begin(stream.total_bytes());
        let renderer = ProgressRenderer::new(stream.total_bytes(), &filename);
        let mut accumulator = ByteAccumulator::new();

        loop {
            match stream.next_chunk().await {
                Ok(Some(chunk)) => {
                    if let Some(limiter) = &self.rate_limiter {
                        if let Some(nonzero) = NonZeroU32::new(chunk.len() as u32) {
                            limiter.until_n_ready(nonzero).await.unwrap();
                        }
                    }
                    session.record_chunk(chunk.len());
                    accumulator.append(chunk);
                    renderer.update(session.received_bytes(), session.sample());
                }
                Ok(None) => break,
                Err(err) => {
                    session.fail();
                    renderer.abandon(format!("Interrupted {}", filename));
                    return Err(err).context(format!("transfer of {} failed", resource_url));
                }
            }
        }

        accumulator.finish();
        debug_assert_eq!(accumulator.total_len() as u64, session.received_bytes());
        let payload = accumulator.finalize()?;

        let verified_digest = match &self.expected_sha256 {
            Some(expected) => match hashing::verify(expected, payload) {
                Ok(digest) => Some(digest),
                Err(err) => {
                    session.fail();
                    renderer.abandon(format!("Corrupt {}", filename));
                    return Err(err)
                        .context(format!("checksum verification of {} failed", filename));
                }
            },
            None => None,
        };

        if let Err(err) = materialize::save(payload, &filepath).await {
            session.fail();
            renderer.abandon(format!("Failed {}", filename));
            return Err(err).context(format!("failed to save {}", filepath.display()));
        }

        session.complete();
        match verified_digest {
            Some(digest) => {
                renderer.finish(format!("Verified    {} (SHA256: {})", filename, digest))
            }
            None => renderer.finish(format!("Completed   {}", filename)),
        }

        Ok(Some(filepath))
    }

    async fn resolve_collision(&self, filepath: &Path) -> Result<Option<PathBuf>> {
        if !filepath.exists() {
            return Ok(Some(filepath.to_path_buf()));
        }

        match self.clobber {
            ClobberMode::Overwrite => Ok(Some(filepath.to_path_buf())),
            ClobberMode::Rename => {
                let filename = filepath.file_name().unwrap().to_string_lossy();
                Ok(Some(unique_filepath(&self.output_dir, &filename)))
            }
            ClobberMode::Skip => {
                let metadata = fs::metadata(filepath).await?;
                let created = metadata.created().ok().map(DateTime::<Local>::from);
                match created {
                    Some(created) => println!(
                        "Skipped {} ({}, created {})",
                        filepath.display(),
                        HumanBytes(metadata.len()),
                        created.format("%Y-%m-%d %H:%M")
                    ),
                    None => println!(
                        "Skipped {} ({})",
                        filepath.display(),
                        HumanBytes(metadata.len())
                    ),
                }
                Ok(None)
            }
        }
    }
}
