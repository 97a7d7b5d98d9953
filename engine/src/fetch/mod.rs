//! Manifest sources.
//!
//! A [`ManifestSource`] performs the single manifest request of a page load and
//! returns the raw body. Sources never retry; the controller treats every error
//! as "keep the current catalog".

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Largest manifest body accepted
pub const MAX_MANIFEST_BYTES: usize = 256 * 1024;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while fetching a manifest
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to create HTTP client: {reason}")]
    ClientCreation { reason: String },
    #[error("request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },
    #[error("request to {url} timed out after {millis}ms")]
    Timeout { url: String, millis: u128 },
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("manifest at {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
    #[error("manifest at {url} is not valid UTF-8")]
    InvalidEncoding { url: String },
    #[error("failed to read manifest file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported manifest URL scheme '{0}'")]
    UnsupportedScheme(String),
}

#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch_manifest(&self, url: &Url) -> Result<String, FetchError>;
}

/// Fetches manifests over HTTP(S), bypassing caches
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpManifestSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch_manifest(&self, url: &Url) -> Result<String, FetchError> {
        log::debug!("Fetching theme manifest from {url}");

        let request_error = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    millis: self.timeout.as_millis(),
                }
            } else {
                FetchError::RequestFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let mut response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let too_large = || FetchError::TooLarge {
            url: url.to_string(),
            limit: MAX_MANIFEST_BYTES,
        };

        if response.content_length().is_some_and(exceeds_limit) {
            return Err(too_large());
        }

        // Chunked responses carry no length; stop reading once over the limit
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(request_error)? {
            if exceeds_limit((body.len() + chunk.len()) as u64) {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        decode_body(url, body)
    }
}

/// Reads manifests from `file://` URLs
#[derive(Debug, Clone)]
pub struct FileManifestSource {
    timeout: Duration,
}

impl FileManifestSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ManifestSource for FileManifestSource {
    async fn fetch_manifest(&self, url: &Url) -> Result<String, FetchError> {
        let path = url
            .to_file_path()
            .map_err(|_| FetchError::UnsupportedScheme(url.scheme().to_string()))?;
        log::debug!("Reading theme manifest from {}", path.display());

        let body = tokio::time::timeout(self.timeout, tokio::fs::read(&path))
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
                millis: self.timeout.as_millis(),
            })?
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;

        decode_body(url, body)
    }
}

/// Pick a manifest source for a script base URL
pub fn source_for(base: &Url, timeout: Duration) -> Result<Arc<dyn ManifestSource>, FetchError> {
    match base.scheme() {
        "http" | "https" => Ok(Arc::new(HttpManifestSource::new(timeout)?)),
        "file" => Ok(Arc::new(FileManifestSource::new(timeout))),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

fn exceeds_limit(length: u64) -> bool {
    length > MAX_MANIFEST_BYTES as u64
}

fn decode_body(url: &Url, body: Vec<u8>) -> Result<String, FetchError> {
    if exceeds_limit(body.len() as u64) {
        return Err(FetchError::TooLarge {
            url: url.to_string(),
            limit: MAX_MANIFEST_BYTES,
        });
    }

    String::from_utf8(body).map_err(|_| FetchError::InvalidEncoding {
        url: url.to_string(),
    })
}
