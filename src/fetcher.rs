//! Fetcher abstraction for retrieving raw response bodies.

use async_trait::async_trait;
use url::Url;

use crate::Result;

/// Trait for fetching the body of a URL.
///
/// The search client issues every request (API calls and the image
/// download) through this trait. Implementations must treat a non-2xx
/// status or an empty body as an error, so callers only ever see a usable
/// payload.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the raw body of the given URL.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}
