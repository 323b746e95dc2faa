//! Flickr response decoding and validation.
//!
//! The body is decoded once into typed structs whose fields tolerate a
//! wrong JSON type (it decodes as `None`). Validation then walks a fixed
//! sequence of guards, each failing with its own error:
//!
//! 1. the body is a JSON object, else [`FlickrError::MalformedPayload`]
//! 2. `stat` is `"ok"`, else [`FlickrError::UpstreamStatus`]
//! 3. `photos` is an object, else `SchemaMismatch("photos")`
//! 4. `pages` / `photo` are present and well typed, else `SchemaMismatch`
//! 5. an empty result is [`FlickrError::NoResults`]

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::{FlickrError, PhotoRecord, Result};

/// Value of `stat` on success.
pub const OK_STATUS: &str = "ok";

/// Largest payload excerpt written to logs.
const LOG_EXCERPT: usize = 512;

/// Decodes a field, turning a type mismatch into `None`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`], but only accepts a JSON object.
fn lenient_object<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`], but only accepts a list of JSON objects.
fn lenient_object_list<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Array(items) if items.iter().all(Value::is_object) => {
            Ok(serde_json::from_value(value).ok())
        }
        _ => Ok(None),
    }
}

/// Top-level Flickr envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub stat: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub photos: Option<PhotosPage>,
}

/// The `photos` object of a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosPage {
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pages: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub perpage: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total: Option<Value>,
    #[serde(default, deserialize_with = "lenient_object_list")]
    pub photo: Option<Vec<PhotoEntry>>,
}

/// One element of the `photo` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url_m: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub height_m: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub width_m: Option<u32>,
}

impl PhotoEntry {
    /// Extracts the fields a photo needs to be shown.
    pub fn record(&self) -> Result<PhotoRecord> {
        let image_url = self
            .url_m
            .clone()
            .ok_or(FlickrError::SchemaMismatch("url_m"))?;
        let title = self
            .title
            .clone()
            .ok_or(FlickrError::SchemaMismatch("title"))?;
        Ok(PhotoRecord {
            id: self.id.clone(),
            title,
            image_url,
        })
    }
}

impl SearchResponse {
    /// Decodes a body and checks the status sentinel.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(bytes).map_err(|e| {
            warn!("Could not parse data as JSON: {} ({})", e, excerpt(bytes));
            FlickrError::MalformedPayload {
                reason: e.to_string(),
                payload: bytes.to_vec(),
            }
        })?;

        if !document.is_object() {
            warn!("Response is not a JSON object: {}", excerpt(bytes));
            return Err(FlickrError::MalformedPayload {
                reason: "expected a JSON object".to_string(),
                payload: bytes.to_vec(),
            });
        }

        let response: SearchResponse =
            serde_json::from_value(document).map_err(|e| FlickrError::MalformedPayload {
                reason: e.to_string(),
                payload: bytes.to_vec(),
            })?;

        if response.stat.as_deref() != Some(OK_STATUS) {
            warn!(
                "Flickr returned an error: stat={:?} code={:?} message={:?}",
                response.stat, response.code, response.message
            );
            return Err(FlickrError::UpstreamStatus {
                stat: response.stat,
                code: response.code,
                message: response.message,
            });
        }

        Ok(response)
    }

    /// Returns the `photos` object.
    pub fn photos(&self) -> Result<&PhotosPage> {
        self.photos
            .as_ref()
            .ok_or(FlickrError::SchemaMismatch("photos"))
    }

    fn into_photos(self) -> Result<PhotosPage> {
        self.photos.ok_or(FlickrError::SchemaMismatch("photos"))
    }
}

/// Reads the total page count from a first-stage response.
pub fn parse_page_count(bytes: &[u8]) -> Result<u64> {
    let response = SearchResponse::from_slice(bytes)?;
    let pages = response
        .photos()
        .and_then(|photos| photos.pages.ok_or(FlickrError::SchemaMismatch("pages")))
        .inspect_err(|e| warn!("{} ({})", e, excerpt(bytes)))?;

    if pages == 0 {
        return Err(FlickrError::NoResults);
    }
    Ok(pages)
}

/// Reads the photo list from a second-stage response.
pub fn parse_photo_list(bytes: &[u8]) -> Result<Vec<PhotoEntry>> {
    let photos = SearchResponse::from_slice(bytes)?
        .into_photos()
        .and_then(|photos| photos.photo.ok_or(FlickrError::SchemaMismatch("photo")))
        .inspect_err(|e| warn!("{} ({})", e, excerpt(bytes)))?;

    if photos.is_empty() {
        return Err(FlickrError::NoResults);
    }
    Ok(photos)
}

fn excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.chars().count() > LOG_EXCERPT {
        let cut: String = text.chars().take(LOG_EXCERPT).collect();
        format!("{}...", cut)
    } else {
        text.into_owned()
    }
}
