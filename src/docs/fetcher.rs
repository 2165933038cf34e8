//! Asset fetchers.
//!
//! Everything the page loads (documents, screenshots) goes through a
//! [`Fetcher`], so the engine runs the same against a web host or a local
//! checkout of the site.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Source of site assets addressed by site-relative paths.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch raw bytes. Any non-success outcome is an error.
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError>;

    /// Fetch a text document.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let bytes = self.fetch_bytes(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Fetches over HTTP(S), joining paths onto a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: Url) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(client: Client, mut base: Url) -> Self {
        // Url::join replaces the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|_| FetchError::InvalidPath(path.to_string()))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path)?;
        debug!("GET {}", url);

        let transport = |source| FetchError::Transport {
            path: path.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a site path onto the root, refusing anything that climbs out of it.
    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full = self.resolve(path)?;
        debug!("Reading {}", full.display());
        tokio::fs::read(&full).await.map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })
    }
}
