//! Photo records and search results.

use serde::{Deserialize, Serialize};

/// A usable photo picked from a result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Flickr photo id, when the response carried one.
    pub id: Option<String>,
    /// Photo title.
    pub title: String,
    /// Medium-size image URL.
    pub image_url: String,
}

/// Final output of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoResult {
    /// Photo title.
    pub title: String,
    /// Medium-size image URL.
    pub image_url: String,
    /// Result page the photo was picked from.
    pub page: u32,
    /// Image bytes; absent when image download is turned off.
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
}

impl PhotoResult {
    /// Creates a result without image bytes.
    pub fn new(record: PhotoRecord, page: u32) -> Self {
        Self {
            title: record.title,
            image_url: record.image_url,
            page,
            image: None,
        }
    }

    /// Attaches downloaded image bytes.
    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.image = Some(bytes);
        self
    }

    /// Returns the image bytes, if they were downloaded.
    pub fn image_bytes(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }
}
