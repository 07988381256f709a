use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use url::Url;

use crate::error::DownloadError;

/// An open response body: the declared total size (when the server sent a
/// usable Content-Length) and an ordered, finite, non-restartable chunk
/// sequence.
pub struct FetchStream {
    total_bytes: Option<u64>,
    chunks: BoxStream<'static, reqwest::Result<Bytes>>,
}

/// Sends the GET and validates the response before any body bytes flow.
/// A non-success status fails here; no chunks are produced for it.
pub async fn open(client: &Client, resource_url: &str) -> Result<FetchStream, DownloadError> {
    let parsed = Url::parse(resource_url).map_err(|e| DownloadError::InvalidUrl {
        url: resource_url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(DownloadError::InvalidUrl {
            url: resource_url.to_string(),
            reason: format!("unsupported scheme: {}", parsed.scheme()),
        });
    }

    let response = client.get(parsed).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::FetchFailed { status });
    }

    let total_bytes = response.content_length();
    Ok(FetchStream {
        total_bytes,
        chunks: response.bytes_stream().boxed(),
    })
}

impl FetchStream {
    pub fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }

    /// Next non-empty chunk in network order. `Ok(None)` is the termination
    /// signal; a transport error mid-sequence surfaces as `StreamInterrupted`.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, DownloadError> {
        while let Some(item) = self.chunks.next().await {
            let chunk = item.map_err(DownloadError::StreamInterrupted)?;
            if !chunk.is_empty() {
                return Ok(Some(chunk));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn test_client() -> Client {
        Client::builder()
            .user_agent("vdl/0.1.0")
            .build()
            .unwrap()
    }

    async fn drain(stream: &mut FetchStream) -> Result<Vec<u8>, DownloadError> {
        let mut payload = Vec::new();
        while let Some(chunk) = stream.next_chunk().await? {
            payload.extend_from_slice(&chunk);
        }
        Ok(payload)
    }

    #[tokio::test]
    async fn rejects_relative_url() {
        let err = open(&test_client(), "media/video.mp4").await.unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn rejects_empty_url() {
        let err = open(&test_client(), "").await.unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn rejects_non_http_scheme() {
        let err = open(&test_client(), "ftp://example.com/video.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn exposes_declared_total_and_body() {
        let mut server = mockito::Server::new_async().await;
        let body = b"0123456789abcdef".to_vec();
        let _mock = server
            .mock("GET", "/video.mp4")
            .with_status(200)
            .with_body(body.clone())
            .create_async()
            .await;

        let url = format!("{}/video.mp4", server.url());
        let mut stream = open(&test_client(), &url).await.unwrap();
        assert_eq!(stream.total_bytes(), Some(body.len() as u64));
        assert_eq!(drain(&mut stream).await.unwrap(), body);
    }

    #[tokio::test]
    async fn non_success_status_fails_without_chunks() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.mp4")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let url = format!("{}/missing.mp4", server.url());
        let err = open(&test_client(), &url).await.unwrap_err();
        match err {
            DownloadError::FetchFailed { status } => assert_eq!(status.as_u16(), 404),
            other => panic!("expected FetchFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn chunked_response_has_no_declared_total() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stream.mp4")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(b"part one ")?;
                w.write_all(b"part two")
            })
            .create_async()
            .await;

        let url = format!("{}/stream.mp4", server.url());
        let mut stream = open(&test_client(), &url).await.unwrap();
        assert_eq!(stream.total_bytes(), None);
        assert_eq!(drain(&mut stream).await.unwrap(), b"part one part two");
    }

    #[tokio::test]
    async fn transport_drop_mid_stream_is_an_interruption() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cut.mp4")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(b"first bytes")?;
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "connection dropped",
                ))
            })
            .create_async()
            .await;

        let url = format!("{}/cut.mp4", server.url());
        let mut stream = open(&test_client(), &url).await.unwrap();
        let err = drain(&mut stream).await.unwrap_err();
        assert!(matches!(err, DownloadError::StreamInterrupted(_)));
    }
}
