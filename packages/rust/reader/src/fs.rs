//! Local filesystem reader for `file://` URLs and bare paths.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use catalogbridge_shared::{BridgeError, RawContent, Result};
use tracing::{debug, instrument};
use url::Url;

use crate::UrlReader;

/// Reads content from the local filesystem.
pub struct FsUrlReader {
    max_response_bytes: u64,
}

impl FsUrlReader {
    pub fn new(max_response_bytes: u64) -> Self {
        Self { max_response_bytes }
    }
}

#[async_trait]
impl UrlReader for FsUrlReader {
    #[instrument(skip_all, fields(url = %url))]
    async fn read_url(&self, url: &str) -> Result<RawContent> {
        let path = to_path(url)?;

        let data = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => BridgeError::NotFound(format!("{}: no such file", path.display())),
            ErrorKind::PermissionDenied => {
                BridgeError::PermissionDenied(format!("{}: {e}", path.display()))
            }
            _ => BridgeError::io(&path, e),
        })?;

        if data.len() as u64 > self.max_response_bytes {
            return Err(BridgeError::validation(format!(
                "{}: file too large ({} bytes, max {})",
                path.display(),
                data.len(),
                self.max_response_bytes
            )));
        }

        debug!(bytes = data.len(), "read file");

        Ok(RawContent {
            url: url.to_string(),
            data,
        })
    }
}

/// Resolve a `file://` URL or plain path to a filesystem path.
fn to_path(url: &str) -> Result<PathBuf> {
    if !url.starts_with("file:") {
        return Ok(PathBuf::from(url));
    }
    let parsed =
        Url::parse(url).map_err(|e| BridgeError::validation(format!("{url}: invalid URL: {e}")))?;
    parsed
        .to_file_path()
        .map_err(|()| BridgeError::validation(format!("{url}: not a local file URL")))
}
