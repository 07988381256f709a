use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::error::DownloadError;

const API_URL: &str = "https://api.cobalt.tools/api/json";

#[derive(Serialize)]
struct ResolveRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ResolveResponse {
    status: Option<String>,
    url: Option<String>,
    text: Option<String>,
}

pub async fn resolve_media_url(page_url: &str) -> Result<String, DownloadError> {
    resolve_against(API_URL, page_url).await
}

pub(crate) async fn resolve_against(
    api_url: &str,
    page_url: &str,
) -> Result<String, DownloadError> {
    let client = reqwest::Client::builder()
        .user_agent("vdl/0.1.0")
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let body = serde_json::to_string(&ResolveRequest { url: page_url }).map_err(|e| {
        DownloadError::ResolveFailed(format!("failed to encode resolve request: {}", e))
    })?;

    let resp = client
        .post(api_url)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| DownloadError::ResolveFailed(format!("resolver request failed: {}", e)))?;

    if !resp.status().is_success() {
        return Err(DownloadError::ResolveFailed(format!(
            "resolver responded with status {}",
            resp.status()
        )));
    }

    let body = resp.text().await.map_err(|e| {
        DownloadError::ResolveFailed(format!("failed to read resolver response: {}", e))
    })?;
    let parsed: ResolveResponse = serde_json::from_str(&body).map_err(|e| {
        DownloadError::ResolveFailed(format!("failed to parse resolver response: {}", e))
    })?;

    if parsed.status.as_deref() == Some("error") {
        let detail = parsed
            .text
            .unwrap_or_else(|| "unspecified resolver error".to_string());
        return Err(DownloadError::ResolveFailed(detail));
    }

    match parsed.url {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(DownloadError::ResolveFailed(
            "response carried no media URL".to_string(),
        )),
    }
}
