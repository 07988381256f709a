pub mod cobalt;

use crate::error::DownloadError;

/// Resolves a media page URL to a direct resource URL via the named provider.
/// Currently only cobalt; other resolver APIs can be added here.
pub async fn resolve(provider: &str, page_url: &str) -> Result<String, DownloadError> {
    match provider.to_lowercase().as_str() {
        "cobalt" => cobalt::resolve_media_url(page_url).await,
        other => Err(DownloadError::ResolveFailed(format!(
            "unsupported provider: {}",
            other
        ))),
    }
}
