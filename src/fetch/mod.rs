//! Loading upload bytes from disk or over HTTP.

mod basic;
pub mod auth;

pub use basic::BasicClient;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Request, Response};
use tracing::debug;

/// Executes a prepared request. Wrappers such as [`auth::ApiKey`] decorate
/// another client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// GETs `url` and returns the body. Non-success statuses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads `source` from a local path, or fetches it when it is an
/// `http(s)` URL.
#[tracing::instrument(fields(remote = is_remote(source)))]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        let client = BasicClient::new()?;
        fetch_bytes(&client, source)
            .await
            .with_context(|| format!("failed to fetch {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}
