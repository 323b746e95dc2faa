//! # flickfinder
//!
//! A small client for the Flickr photo-search API that returns one
//! randomly chosen photo for a phrase or a location.
//!
//! A search runs in three steps:
//!
//! - Ask Flickr how many result pages match
//! - Fetch a random page (capped at the 40 pages Flickr will serve)
//! - Pick a random photo on that page and download its medium-size image
//!
//! ## Example
//!
//! ```rust,no_run
//! use flickfinder::{FlickrConfig, FlickrSearch, SearchCriteria};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let search = FlickrSearch::new(FlickrConfig::from_env()?)?;
//!
//!     let photo = search.search(&SearchCriteria::phrase("mountains")).await?;
//!     println!("{}: {}", photo.title, photo.image_url);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod fetcher;
mod fetcher_http;
mod photo;
mod search;

pub mod query;
pub mod response;
pub mod selector;

pub use config::{FlickrConfig, API_KEY_ENV, PAGE_CAP};
pub use error::{FlickrError, Result};
pub use fetcher::Fetcher;
pub use fetcher_http::HttpFetcher;
pub use photo::{PhotoRecord, PhotoResult};
pub use query::{build_search_url, BoundingBox, SearchCriteria, SearchParameters};
pub use response::{parse_page_count, parse_photo_list, PhotoEntry, SearchResponse};
pub use search::{FlickrSearch, SearchOutcome, SearchState};
pub use selector::{select_page, select_photo};

// Re-exported so callers can cancel without depending on tokio-util directly.
pub use tokio_util::sync::CancellationToken;
