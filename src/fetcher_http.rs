//! HTTP-based fetcher using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::fetcher::Fetcher;
use crate::query::redacted;
use crate::{FlickrConfig, FlickrError, Result};

/// A fetcher that uses plain HTTP GET requests via reqwest.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` using the timeout and user agent from `config`.
    pub fn new(config: &FlickrConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { client })
    }

    /// Creates an `HttpFetcher` with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        debug!("GET {}", redacted(url));
        // reqwest errors carry the request URL, which holds the api key.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlickrError::HttpStatus {
                status: status.as_u16(),
                url: redacted(url),
            });
        }

        let body = response.bytes().await.map_err(reqwest::Error::without_url)?;
        if body.is_empty() {
            return Err(FlickrError::EmptyBody { url: redacted(url) });
        }

        debug!("Received {} bytes from {}", body.len(), url.host_str().unwrap_or(""));
        Ok(body.to_vec())
    }
}
