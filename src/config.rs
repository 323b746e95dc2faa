//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::{FlickrError, Result};

/// Environment variable holding the Flickr API key.
pub const API_KEY_ENV: &str = "FLICKR_API_KEY";

/// Highest page Flickr will serve for a search.
pub const PAGE_CAP: u32 = 40;

/// Configuration for the Flickr search client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlickrConfig {
    /// Flickr API key.
    pub api_key: String,
    /// URL scheme of the REST endpoint.
    #[serde(default = "default_api_scheme")]
    pub api_scheme: String,
    /// Host of the REST endpoint (may include a port).
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Path of the REST endpoint.
    #[serde(default = "default_api_path")]
    pub api_path: String,
    /// Whether to ask Flickr for safe results only.
    #[serde(default = "default_true")]
    pub safe_search: bool,
    /// Upper bound on the page picked at random.
    #[serde(default = "default_page_cap")]
    pub page_cap: u32,
    /// Half the bounding box width, in degrees of longitude.
    #[serde(default = "default_half_extent")]
    pub bbox_half_width: f64,
    /// Half the bounding box height, in degrees of latitude.
    #[serde(default = "default_half_extent")]
    pub bbox_half_height: f64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Whether to download the chosen image or stop at its URL.
    #[serde(default = "default_true")]
    pub fetch_image: bool,
}

fn default_api_scheme() -> String {
    "https".to_string()
}

fn default_api_host() -> String {
    "api.flickr.com".to_string()
}

fn default_api_path() -> String {
    "/services/rest".to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_cap() -> u32 {
    PAGE_CAP
}

fn default_half_extent() -> f64 {
    1.0
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("flickfinder/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FlickrConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_scheme: default_api_scheme(),
            api_host: default_api_host(),
            api_path: default_api_path(),
            safe_search: true,
            page_cap: PAGE_CAP,
            bbox_half_width: 1.0,
            bbox_half_height: 1.0,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            fetch_image: true,
        }
    }
}

impl FlickrConfig {
    /// Creates a configuration with the given API key and default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Reads the API key from `FLICKR_API_KEY`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(FlickrError::Config(format!("{} is not set", API_KEY_ENV))),
        }
    }

    /// Points the client at a different endpoint.
    pub fn with_endpoint(
        mut self,
        scheme: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        self.api_scheme = scheme.into();
        self.api_host = host.into();
        self.api_path = path.into();
        self
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the page cap.
    pub fn with_page_cap(mut self, page_cap: u32) -> Self {
        self.page_cap = page_cap;
        self
    }

    /// Enables or disables downloading the chosen image.
    pub fn with_fetch_image(mut self, fetch_image: bool) -> Self {
        self.fetch_image = fetch_image;
        self
    }

    /// Sets the safe search flag.
    pub fn with_safe_search(mut self, safe_search: bool) -> Self {
        self.safe_search = safe_search;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(FlickrError::Config("API key is required".into()));
        }

        if self.page_cap == 0 || self.page_cap > PAGE_CAP {
            return Err(FlickrError::Config(format!(
                "page cap must be between 1 and {}",
                PAGE_CAP
            )));
        }

        let extents = [self.bbox_half_width, self.bbox_half_height];
        if extents.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(FlickrError::Config(
                "bounding box extents must be finite and non-negative".into(),
            ));
        }

        if self.timeout == 0 {
            return Err(FlickrError::Config("timeout must be at least 1 second".into()));
        }

        Ok(())
    }
}
