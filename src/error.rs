//! Error types for the Flickr search client.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, FlickrError>;

/// Errors that can occur while searching for a photo.
#[derive(Error, Debug)]
pub enum FlickrError {
    /// The request URL could not be assembled.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The same query parameter was supplied twice.
    #[error("Duplicate query parameter '{0}'")]
    DuplicateParameter(String),

    /// Phrase search with nothing to search for.
    #[error("Phrase is empty")]
    EmptyPhrase,

    /// A coordinate was missing, non-numeric, or outside its legal range.
    #[error("{field} should be in [{min}, {max}], got '{value}'")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: f64,
        max: f64,
    },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Request to {url} returned status {status}")]
    HttpStatus { status: u16, url: String },

    /// The server answered with an empty body.
    #[error("Request to {url} returned no data")]
    EmptyBody { url: String },

    /// The response body was not a JSON object.
    #[error("Could not parse response as JSON: {reason}")]
    MalformedPayload { reason: String, payload: Vec<u8> },

    /// Flickr reported a failure in the envelope.
    #[error(
        "Flickr returned an error (stat: {}, code: {}): {}",
        .stat.as_deref().unwrap_or("missing"),
        .code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()),
        .message.as_deref().unwrap_or("no message")
    )]
    UpstreamStatus {
        stat: Option<String>,
        code: Option<i64>,
        message: Option<String>,
    },

    /// A required field was missing or had the wrong type.
    #[error("Cannot find key '{0}' in response")]
    SchemaMismatch(&'static str),

    /// The search succeeded but matched nothing.
    #[error("Search returned no photos")]
    NoResults,

    /// A photo was chosen but its image could not be retrieved.
    #[error("Image '{title}' does not exist at {url}: {source}")]
    ImageFetch {
        title: String,
        url: String,
        #[source]
        source: Box<FlickrError>,
    },

    /// The search was cancelled before reaching a terminal state.
    #[error("Search cancelled")]
    Cancelled,
}

impl FlickrError {
    /// Connection failure, non-2xx status or empty body.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FlickrError::Http(_) | FlickrError::HttpStatus { .. } | FlickrError::EmptyBody { .. }
        )
    }

    /// Upstream broke its response contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            FlickrError::MalformedPayload { .. } | FlickrError::SchemaMismatch(_)
        )
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, FlickrError::NoResults)
    }

    /// Message suitable for showing to the person who started the search.
    pub fn user_message(&self) -> String {
        match self {
            FlickrError::EmptyPhrase => "Phrase Empty.".to_string(),
            FlickrError::OutOfRange { .. } => {
                "Lat should be [-90, 90].\nLon should be [-180, 180].".to_string()
            }
            FlickrError::NoResults => "No photos found for this search.".to_string(),
            FlickrError::UpstreamStatus { message, .. } => match message {
                Some(message) => format!("Flickr returned an error: {}", message),
                None => "Flickr returned an error, try again.".to_string(),
            },
            FlickrError::ImageFetch { .. } => "Image unavailable.".to_string(),
            FlickrError::Cancelled => "Search cancelled.".to_string(),
            e if e.is_transport() => "Request failed, try again.".to_string(),
            _ => "No Photo Returned, try again.".to_string(),
        }
    }
}

impl From<url::ParseError> for FlickrError {
    fn from(err: url::ParseError) -> Self {
        FlickrError::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_schema_mismatch() {
        let err = FlickrError::SchemaMismatch("photos");
        assert_eq!(err.to_string(), "Cannot find key 'photos' in response");
    }

    #[test]
    fn test_error_display_out_of_range() {
        let err = FlickrError::OutOfRange {
            field: "latitude",
            value: "200".to_string(),
            min: -90.0,
            max: 90.0,
        };
        assert_eq!(err.to_string(), "latitude should be in [-90, 90], got '200'");
    }

    #[test]
    fn test_error_display_upstream_status() {
        let err = FlickrError::UpstreamStatus {
            stat: Some("fail".to_string()),
            code: Some(100),
            message: Some("Invalid API Key".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Flickr returned an error (stat: fail, code: 100): Invalid API Key"
        );
    }

    #[test]
    fn test_error_display_upstream_status_missing_fields() {
        let err = FlickrError::UpstreamStatus {
            stat: None,
            code: None,
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "Flickr returned an error (stat: missing, code: none): no message"
        );
    }

    #[test]
    fn test_error_display_http_status() {
        let err = FlickrError::HttpStatus {
            status: 503,
            url: "https://api.flickr.com/services/rest".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to https://api.flickr.com/services/rest returned status 503"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(FlickrError::EmptyBody { url: "u".into() }.is_transport());
        assert!(FlickrError::HttpStatus { status: 500, url: "u".into() }.is_transport());
        assert!(!FlickrError::NoResults.is_transport());
        assert!(FlickrError::NoResults.is_no_results());
        assert!(FlickrError::SchemaMismatch("pages").is_contract_violation());
        assert!(FlickrError::MalformedPayload {
            reason: "eof".into(),
            payload: vec![]
        }
        .is_contract_violation());
    }

    #[test]
    fn test_user_message_distinguishes_no_results() {
        let no_results = FlickrError::NoResults.user_message();
        let transport = FlickrError::EmptyBody { url: "u".into() }.user_message();
        let schema = FlickrError::SchemaMismatch("photo").user_message();
        assert_ne!(no_results, transport);
        assert_ne!(no_results, schema);
        assert_eq!(transport, "Request failed, try again.");
        assert_eq!(schema, "No Photo Returned, try again.");
    }

    #[test]
    fn test_user_message_upstream_uses_message() {
        let err = FlickrError::UpstreamStatus {
            stat: Some("fail".into()),
            code: Some(100),
            message: Some("Invalid API Key".into()),
        };
        assert_eq!(err.user_message(), "Flickr returned an error: Invalid API Key");
    }

    #[test]
    fn test_user_message_image_fetch() {
        let err = FlickrError::ImageFetch {
            title: "Sunset".into(),
            url: "https://live.staticflickr.com/1.jpg".into(),
            source: Box::new(FlickrError::HttpStatus {
                status: 404,
                url: "https://live.staticflickr.com/1.jpg".into(),
            }),
        };
        assert_eq!(err.user_message(), "Image unavailable.");
        assert!(err.to_string().contains("Sunset"));
    }

    #[test]
    fn test_from_url_parse_error() {
        let err: FlickrError = url::ParseError::EmptyHost.into();
        assert!(matches!(err, FlickrError::InvalidUrl(_)));
    }

    #[test]
    fn test_error_debug() {
        let err = FlickrError::Cancelled;
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Cancelled"));
    }
}
