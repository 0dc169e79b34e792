//! HTTP(S) reader backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use catalogbridge_shared::{BridgeError, RawContent, ReaderOptions, Result};
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::UrlReader;

/// User-Agent string for read requests.
const USER_AGENT: &str = concat!("CatalogBridge/", env!("CARGO_PKG_VERSION"));

/// Reads remote content over HTTP(S).
pub struct HttpUrlReader {
    client: Client,
    max_response_bytes: u64,
}

impl HttpUrlReader {
    /// Build a reader with the given timeouts and limits.
    pub fn new(opts: &ReaderOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(opts.max_redirects))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| BridgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_response_bytes: opts.max_response_bytes,
        })
    }
}

#[async_trait]
impl UrlReader for HttpUrlReader {
    #[instrument(skip_all, fields(url = %url))]
    async fn read_url(&self, url: &str) -> Result<RawContent> {
        debug!("fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(url, status));
        }

        // Check content-length if available
        if let Some(len) = response.content_length() {
            if len > self.max_response_bytes {
                return Err(too_large(url, len, self.max_response_bytes));
            }
        }

        // Chunked responses carry no content-length, so cap while reading
        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk
                .map_err(|e| BridgeError::Network(format!("{url}: failed to read body: {e}")))?;
            let len = (body.len() + chunk.len()) as u64;
            if len > self.max_response_bytes {
                return Err(too_large(url, len, self.max_response_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(bytes = body.len(), "fetched");

        Ok(RawContent {
            url: url.to_string(),
            data: body,
        })
    }
}

fn status_error(url: &str, status: StatusCode) -> BridgeError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => {
            BridgeError::NotFound(format!("{url}: HTTP {status}"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            BridgeError::PermissionDenied(format!("{url}: HTTP {status}"))
        }
        _ => BridgeError::Network(format!("{url}: HTTP {status}")),
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> BridgeError {
    if e.is_connect() {
        BridgeError::ConnectionRefused(format!("{url}: {e}"))
    } else {
        BridgeError::Network(format!("{url}: {e}"))
    }
}

fn too_large(url: &str, len: u64, max: u64) -> BridgeError {
    BridgeError::validation(format!(
        "{url}: response too large ({len} bytes, max {max})"
    ))
}
