use std::time::Duration;
use thiserror::Error;

use super::parser::{parse_feed, ParsedFeed};

/// Per-request timeout covering both the request and the body read.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Feed documents larger than this are rejected outright.
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that abort a feed pipeline invocation.
///
/// Any of these is fatal for the invocation: no partial post list is ever
/// produced. Per-entry extraction gaps are not errors (see
/// [`ParsedFeed::skipped`]).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, body read)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Document could not be scanned as feed XML
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Runs the full feed pipeline once: fetch, detect, extract, normalize.
///
/// Performs a single GET against `feed_url` with `user_agent` as the
/// client identification header, then parses the body into at most ten
/// posts in document order. Each invocation re-fetches from scratch; there
/// is no cache and no retry at this layer — the caller re-invokes the
/// pipeline if it wants another attempt.
///
/// # Errors
///
/// - [`FetchError::Network`] — connection or TLS errors
/// - [`FetchError::Timeout`] — request or body read exceeded 30 seconds
/// - [`FetchError::HttpStatus`] — non-2xx HTTP response
/// - [`FetchError::ResponseTooLarge`] — body exceeded 10MB
/// - [`FetchError::Parse`] — document structure could not be scanned
pub async fn latest_posts(
    client: &reqwest::Client,
    feed_url: &str,
    user_agent: &str,
) -> Result<ParsedFeed, FetchError> {
    let response = tokio::time::timeout(
        FETCH_TIMEOUT,
        client
            .get(feed_url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send(),
    )
    .await
    .map_err(|_| FetchError::Timeout)?
    .map_err(FetchError::Network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let bytes = tokio::time::timeout(FETCH_TIMEOUT, read_limited_bytes(response))
        .await
        .map_err(|_| FetchError::Timeout)??;

    tracing::debug!(url = %feed_url, bytes = bytes.len(), "Fetched feed document");

    let body = String::from_utf8_lossy(&bytes);
    let parsed = parse_feed(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

    if parsed.skipped > 0 {
        tracing::warn!(
            url = %feed_url,
            skipped = parsed.skipped,
            "Feed entries dropped for missing required fields"
        );
    }

    Ok(parsed)
}

/// Reads the response body with a running size check, so a server that
/// omits or understates Content-Length still cannot buffer more than
/// [`MAX_FEED_SIZE`] bytes into memory.
async fn read_limited_bytes(mut response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
    // Fast path: trust Content-Length when present
    if let Some(len) = response.content_length() {
        if len as usize > MAX_FEED_SIZE {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(FetchError::Network)? {
        if bytes.len().saturating_add(chunk.len()) > MAX_FEED_SIZE {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
