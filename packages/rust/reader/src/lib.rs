//! Content readers: fetch the raw bytes behind a location target.
//!
//! Processors never talk to the network or disk directly; they go through a
//! [`UrlReader`]. [`DefaultUrlReader`] routes by URL scheme to the HTTP or
//! filesystem reader.

mod fs;
mod http;

use async_trait::async_trait;
use catalogbridge_shared::{BridgeError, RawContent, ReaderOptions, Result};
use tracing::debug;
use url::Url;

pub use fs::FsUrlReader;
pub use http::HttpUrlReader;

/// Retrieves raw content for a URL.
#[async_trait]
pub trait UrlReader: Send + Sync {
    /// Read the full body at `url`.
    ///
    /// A missing resource is reported as [`BridgeError::NotFound`] so callers
    /// can tell it apart from other failures.
    async fn read_url(&self, url: &str) -> Result<RawContent>;
}

// ---------------------------------------------------------------------------
// DefaultUrlReader
// ---------------------------------------------------------------------------

/// Reader that dispatches on the target's URL scheme.
///
/// `http`/`https` go to [`HttpUrlReader`]; `file` URLs and bare paths go to
/// [`FsUrlReader`]. Anything else is rejected.
pub struct DefaultUrlReader {
    http: HttpUrlReader,
    fs: FsUrlReader,
}

impl DefaultUrlReader {
    pub fn new(opts: &ReaderOptions) -> Result<Self> {
        Ok(Self {
            http: HttpUrlReader::new(opts)?,
            fs: FsUrlReader::new(opts.max_response_bytes),
        })
    }
}

#[async_trait]
impl UrlReader for DefaultUrlReader {
    async fn read_url(&self, url: &str) -> Result<RawContent> {
        match Url::parse(url) {
            Ok(parsed) => match parsed.scheme() {
                "http" | "https" => self.http.read_url(url).await,
                "file" => self.fs.read_url(url).await,
                other => Err(BridgeError::validation(format!(
                    "{url}: unsupported URL scheme {other:?}"
                ))),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                debug!(%url, "no scheme, reading as a local path");
                self.fs.read_url(url).await
            }
            Err(e) => Err(BridgeError::validation(format!("{url}: invalid URL: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_unknown_scheme() {
        let reader = DefaultUrlReader::new(&ReaderOptions::default()).unwrap();
        let err = reader.read_url("ftp://example.com/data.json").await.unwrap_err();
        assert!(matches!(err, BridgeError::Validation { .. }));
        assert!(err.to_string().contains("unsupported URL scheme"));
    }

    #[tokio::test]
    async fn routes_bare_paths_to_filesystem() {
        let path = std::env::temp_dir().join(format!(
            "catalogbridge-default-reader-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, b"[]").expect("write fixture");

        let reader = DefaultUrlReader::new(&ReaderOptions::default()).unwrap();
        let content = reader.read_url(path.to_str().unwrap()).await.unwrap();
        assert_eq!(content.data, b"[]");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn routes_http_to_http_reader() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/entities"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let reader = DefaultUrlReader::new(&ReaderOptions::default()).unwrap();
        let url = format!("{}/entities", server.uri());
        let content = reader.read_url(&url).await.unwrap();
        assert_eq!(content.url, url);
        assert_eq!(content.data, b"{}");
    }
}
