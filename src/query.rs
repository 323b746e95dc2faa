//! Search criteria, query parameters and request URL construction.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{FlickrConfig, FlickrError, Result};

/// Flickr method used for every search.
pub const SEARCH_METHOD: &str = "flickr.photos.search";

/// Extras flag asking Flickr for the medium-size image URL.
pub const MEDIUM_URL: &str = "url_m";

/// Legal latitude range.
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// Legal longitude range.
pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

/// Query parameter names understood by the Flickr REST API.
pub mod keys {
    pub const METHOD: &str = "method";
    pub const API_KEY: &str = "api_key";
    pub const EXTRAS: &str = "extras";
    pub const FORMAT: &str = "format";
    pub const NO_JSON_CALLBACK: &str = "nojsoncallback";
    pub const SAFE_SEARCH: &str = "safe_search";
    pub const TEXT: &str = "text";
    pub const BOUNDING_BOX: &str = "bbox";
    pub const PAGE: &str = "page";
}

/// What to search for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCriteria {
    /// Free-text phrase.
    Phrase(String),
    /// Photos taken near a point.
    Location { latitude: f64, longitude: f64 },
}

impl SearchCriteria {
    /// Creates a phrase search.
    pub fn phrase(text: impl Into<String>) -> Self {
        SearchCriteria::Phrase(text.into())
    }

    /// Creates a location search.
    pub fn location(latitude: f64, longitude: f64) -> Self {
        SearchCriteria::Location {
            latitude,
            longitude,
        }
    }

    /// Parses a location search from raw text input.
    ///
    /// Text that is not a number fails the same way an out-of-range value
    /// does, naming the offending field.
    pub fn location_from_text(latitude: &str, longitude: &str) -> Result<Self> {
        let latitude = parse_coordinate("latitude", latitude, LAT_RANGE)?;
        let longitude = parse_coordinate("longitude", longitude, LON_RANGE)?;
        let criteria = Self::location(latitude, longitude);
        criteria.validate()?;
        Ok(criteria)
    }

    /// Checks the criteria before any request is made.
    pub fn validate(&self) -> Result<()> {
        match self {
            SearchCriteria::Phrase(text) => {
                if text.trim().is_empty() {
                    return Err(FlickrError::EmptyPhrase);
                }
            }
            SearchCriteria::Location {
                latitude,
                longitude,
            } => {
                check_range("latitude", *latitude, LAT_RANGE)?;
                check_range("longitude", *longitude, LON_RANGE)?;
            }
        }
        Ok(())
    }
}

fn parse_coordinate(field: &'static str, text: &str, range: (f64, f64)) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| FlickrError::OutOfRange {
            field,
            value: text.to_string(),
            min: range.0,
            max: range.1,
        })
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(FlickrError::OutOfRange {
            field,
            value: value.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

/// A geographic rectangle used to scope a location search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Builds a box centered on a point, clamped to the legal ranges.
    pub fn around(latitude: f64, longitude: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            min_lon: (longitude - half_width).max(LON_RANGE.0),
            min_lat: (latitude - half_height).max(LAT_RANGE.0),
            max_lon: (longitude + half_width).min(LON_RANGE.1),
            max_lat: (latitude + half_height).min(LAT_RANGE.1),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Named query parameters for one Flickr request.
///
/// Keys are unique: `insert` replaces an existing value (last write wins)
/// and hands back the old one, while `from_pairs` rejects duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParameters {
    params: BTreeMap<String, String>,
}

impl SearchParameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a parameter set, treating a repeated key as an error.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            let key = key.into();
            if params.params.contains_key(&key) {
                return Err(FlickrError::DuplicateParameter(key));
            }
            params.params.insert(key, value.into());
        }
        Ok(params)
    }

    /// Builds the parameters for a search from configuration and criteria.
    pub fn for_criteria(config: &FlickrConfig, criteria: &SearchCriteria) -> Result<Self> {
        criteria.validate()?;

        let safe_search = if config.safe_search { "1" } else { "0" };
        let mut params = Self::from_pairs([
            (keys::METHOD, SEARCH_METHOD),
            (keys::API_KEY, config.api_key.as_str()),
            (keys::EXTRAS, MEDIUM_URL),
            (keys::FORMAT, "json"),
            (keys::NO_JSON_CALLBACK, "1"),
            (keys::SAFE_SEARCH, safe_search),
        ])?;

        match criteria {
            SearchCriteria::Phrase(text) => {
                params.insert(keys::TEXT, text.trim());
            }
            SearchCriteria::Location {
                latitude,
                longitude,
            } => {
                let bbox = BoundingBox::around(
                    *latitude,
                    *longitude,
                    config.bbox_half_width,
                    config.bbox_half_height,
                );
                params.insert(keys::BOUNDING_BOX, bbox.to_string());
            }
        }

        Ok(params)
    }

    /// Sets a parameter, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(key.into(), value.into())
    }

    /// Sets a parameter only when a value is present.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Returns a copy with the page number set.
    pub fn with_page(&self, page: u32) -> Self {
        let mut params = self.clone();
        params.insert(keys::PAGE, page.to_string());
        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Builds an absolute request URL from its parts and the query parameters.
///
/// Keys and values are percent-encoded, so spaces, reserved characters and
/// non-ASCII text survive the trip.
pub fn build_search_url(
    scheme: &str,
    host: &str,
    path: &str,
    parameters: &SearchParameters,
) -> Result<Url> {
    if scheme.is_empty() {
        return Err(FlickrError::InvalidUrl("scheme is empty".into()));
    }
    if host.is_empty() {
        return Err(FlickrError::InvalidUrl("host is empty".into()));
    }

    let mut url = Url::parse(&format!("{}://{}", scheme, host))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(FlickrError::InvalidUrl(format!(
            "{}://{} is not a valid base",
            scheme, host
        )));
    }
    // The host may carry a port, nothing else.
    if url.path() != "/"
        || url.query().is_some()
        || url.fragment().is_some()
        || !url.username().is_empty()
        || url.password().is_some()
    {
        return Err(FlickrError::InvalidUrl(format!(
            "host '{}' must not contain a path, query, fragment or credentials",
            host
        )));
    }
    url.set_path(path);

    let query = parameters
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if !query.is_empty() {
        url.set_query(Some(&query));
    }

    Ok(url)
}

/// Renders a URL for logs with the API key masked.
pub(crate) fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == keys::API_KEY {
                "<redacted>".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if !pairs.is_empty() {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}
