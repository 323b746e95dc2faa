//! Search orchestration.
//!
//! A search is two API round-trips followed by an image download:
//! the first request learns how many result pages exist, the second fetches
//! a randomly chosen page, and a random photo from that page is downloaded.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::fetcher::Fetcher;
use crate::fetcher_http::HttpFetcher;
use crate::query::{build_search_url, redacted};
use crate::response::{parse_page_count, parse_photo_list};
use crate::selector::{select_page, select_photo};
use crate::{FlickrConfig, FlickrError, PhotoResult, Result, SearchCriteria, SearchParameters};

/// Progress of a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    AwaitingPageCount,
    AwaitingPhotoList,
    AwaitingImageFetch,
    Completed,
    Failed,
}

/// Events emitted to the consumer that owns presentation.
///
/// Every search emits `Started` followed by exactly one terminal event.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Input should be disabled until a terminal event arrives.
    Started,
    /// A photo was found.
    Completed(PhotoResult),
    /// The search ended without a photo.
    Failed {
        /// Message suitable for display.
        message: String,
        error: FlickrError,
    },
}

impl SearchOutcome {
    /// Whether this event ends the search (input may be re-enabled).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchOutcome::Started)
    }
}

/// Flickr photo search client.
pub struct FlickrSearch {
    config: FlickrConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl FlickrSearch {
    /// Creates a client that talks HTTP through reqwest.
    pub fn new(config: FlickrConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
        })
    }

    /// Creates a client with a custom fetcher.
    pub fn with_fetcher<F: Fetcher + 'static>(config: FlickrConfig, fetcher: F) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &FlickrConfig {
        &self.config
    }

    /// Runs a search to completion.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<PhotoResult> {
        self.search_with_cancel(criteria, &CancellationToken::new())
            .await
    }

    /// Runs a search, stopping with [`FlickrError::Cancelled`] at the next
    /// request once `cancel` fires.
    pub async fn search_with_cancel(
        &self,
        criteria: &SearchCriteria,
        cancel: &CancellationToken,
    ) -> Result<PhotoResult> {
        let result = self.run_stages(criteria, cancel).await;
        match &result {
            Ok(photo) => debug!(state = ?SearchState::Completed, title = %photo.title, "Search finished"),
            Err(e) => debug!(state = ?SearchState::Failed, error = %e, "Search finished"),
        }
        result
    }

    /// Runs a search and reports it through `events`.
    ///
    /// Sends `Started`, then `Completed` or `Failed`. A closed channel is
    /// not an error; the search still runs to its end.
    pub async fn run(
        &self,
        criteria: SearchCriteria,
        cancel: CancellationToken,
        events: mpsc::Sender<SearchOutcome>,
    ) {
        emit(&events, SearchOutcome::Started).await;

        let outcome = match self.search_with_cancel(&criteria, &cancel).await {
            Ok(photo) => SearchOutcome::Completed(photo),
            Err(error) => SearchOutcome::Failed {
                message: error.user_message(),
                error,
            },
        };

        emit(&events, outcome).await;
    }

    async fn run_stages(
        &self,
        criteria: &SearchCriteria,
        cancel: &CancellationToken,
    ) -> Result<PhotoResult> {
        debug!(state = ?SearchState::Idle, ?criteria, "Starting search");
        let params = SearchParameters::for_criteria(&self.config, criteria)?;

        let url = self.api_url(&params)?;
        debug!(state = ?SearchState::AwaitingPageCount, url = %redacted(&url));
        let body = self.fetch(&url, cancel).await?;
        let pages = parse_page_count(&body)?;

        let page = select_page(pages, self.config.page_cap).ok_or(FlickrError::NoResults)?;
        debug!("{} pages available, picked page {}", pages, page);

        let url = self.api_url(&params.with_page(page))?;
        debug!(state = ?SearchState::AwaitingPhotoList, url = %redacted(&url));
        let body = self.fetch(&url, cancel).await?;
        let photos = parse_photo_list(&body)?;

        let entry = select_photo(&photos).ok_or(FlickrError::NoResults)?;
        let record = entry.record().inspect_err(|e| warn!("Chosen photo is unusable: {}", e))?;
        let result = PhotoResult::new(record, page);

        if !self.config.fetch_image {
            return Ok(result);
        }

        debug!(state = ?SearchState::AwaitingImageFetch, url = %result.image_url);
        let bytes = match Url::parse(&result.image_url) {
            Ok(image_url) => self.fetch(&image_url, cancel).await,
            Err(e) => Err(FlickrError::from(e)),
        };

        match bytes {
            Ok(bytes) => Ok(result.with_image(bytes)),
            Err(FlickrError::Cancelled) => Err(FlickrError::Cancelled),
            Err(e) => {
                warn!("Image does not exist at {}: {}", result.image_url, e);
                Err(FlickrError::ImageFetch {
                    title: result.title,
                    url: result.image_url,
                    source: Box::new(e),
                })
            }
        }
    }

    fn api_url(&self, params: &SearchParameters) -> Result<Url> {
        build_search_url(
            &self.config.api_scheme,
            &self.config.api_host,
            &self.config.api_path,
            params,
        )
    }

    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<Vec<u8>> {
        cancellable(cancel, self.fetcher.fetch(url)).await
    }
}

async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    if cancel.is_cancelled() {
        return Err(FlickrError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FlickrError::Cancelled),
        result = fut => result,
    }
}

async fn emit(events: &mpsc::Sender<SearchOutcome>, outcome: SearchOutcome) {
    if events.send(outcome).await.is_err() {
        debug!("Search outcome receiver dropped");
    }
}
