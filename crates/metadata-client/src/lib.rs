//! Poster and detail-link lookup against the OMDb API.
//!
//! This crate provides the display metadata for recommended movies. It handles:
//! - One HTTP request per title, bounded by a client-wide timeout
//! - Mapping OMDb's JSON into a poster URL and an IMDb link
//! - Degrading every failure to a fixed placeholder, so a flaky API never
//!   takes down the recommendation list
//!
//! No retries: each lookup is attempted exactly once.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Public OMDb endpoint
pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com";

/// Poster shown when no real poster is available
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/150?text=No+Image";

/// Link used when there is no detail page to point at
pub const PLACEHOLDER_DETAIL_URL: &str = "#";

const IMDB_TITLE_URL: &str = "https://www.imdb.com/title";

/// Errors that can occur when looking up movie metadata
#[derive(Error, Debug)]
pub enum MetadataLookupError {
    /// Connection failure, timeout, or other transport problem
    #[error("Metadata request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Metadata service returned HTTP {0}")]
    Status(u16),

    /// The service answered but has no entry for this title
    #[error("No metadata found for '{title}': {reason}")]
    NotFound { title: String, reason: String },

    #[error("Invalid response from metadata service: {0}")]
    InvalidResponse(String),
}

/// What the presentation layer needs to show one movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetails {
    pub poster_url: String,
    pub detail_url: String,
}

impl MovieDetails {
    pub fn placeholder() -> Self {
        Self {
            poster_url: PLACEHOLDER_POSTER_URL.to_string(),
            detail_url: PLACEHOLDER_DETAIL_URL.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

/// Source of display metadata for a title.
///
/// Implementors only provide `lookup`; callers that must not fail use
/// `details_or_placeholder`.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Look up poster and detail link for a title
    async fn lookup(&self, title: &str) -> Result<MovieDetails, MetadataLookupError>;

    /// Like `lookup`, but any error becomes the placeholder
    async fn details_or_placeholder(&self, title: &str) -> MovieDetails {
        match self.lookup(title).await {
            Ok(details) => details,
            Err(e) => {
                warn!(title = %title, error = %e, "Metadata lookup failed, using placeholder");
                MovieDetails::placeholder()
            }
        }
    }
}

/// Subset of the OMDb title response we care about
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// OMDb API client.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MetadataLookupError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse_response(title: &str, body: OmdbResponse) -> Result<MovieDetails, MetadataLookupError> {
        if body.response != "True" {
            return Err(MetadataLookupError::NotFound {
                title: title.to_string(),
                reason: body.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        // OMDb reports a missing poster as the literal "N/A"
        let poster_url = body
            .poster
            .filter(|url| !url.is_empty() && url != "N/A")
            .unwrap_or_else(|| PLACEHOLDER_POSTER_URL.to_string());

        let detail_url = body
            .imdb_id
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}/{}", IMDB_TITLE_URL, id))
            .unwrap_or_else(|| PLACEHOLDER_DETAIL_URL.to_string());

        Ok(MovieDetails {
            poster_url,
            detail_url,
        })
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    #[instrument(skip(self))]
    async fn lookup(&self, title: &str) -> Result<MovieDetails, MetadataLookupError> {
        debug!("Requesting OMDb metadata");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataLookupError::Status(status.as_u16()));
        }

        let body: OmdbResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                MetadataLookupError::InvalidResponse(e.to_string())
            } else {
                MetadataLookupError::Request(e)
            }
        })?;

        Self::parse_response(title, body)
    }
}

/// Provider that never touches the network.
///
/// Used when no API key is configured or the user asked for offline output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProvider;

#[async_trait]
impl MetadataProvider for PlaceholderProvider {
    async fn lookup(&self, _title: &str) -> Result<MovieDetails, MetadataLookupError> {
        Ok(MovieDetails::placeholder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn omdb(response: &str, poster: Option<&str>, imdb_id: Option<&str>) -> OmdbResponse {
        OmdbResponse {
            response: response.to_string(),
            poster: poster.map(str::to_string),
            imdb_id: imdb_id.map(str::to_string),
            error: None,
        }
    }

    #[test]
    fn test_found_title_maps_poster_and_link() {
        let details = OmdbClient::parse_response(
            "Avatar",
            omdb("True", Some("https://img.example/avatar.jpg"), Some("tt0499549")),
        )
        .unwrap();

        assert_eq!(details.poster_url, "https://img.example/avatar.jpg");
        assert_eq!(details.detail_url, "https://www.imdb.com/title/tt0499549");
    }

    #[test]
    fn test_missing_poster_and_id_use_placeholders() {
        let details = OmdbClient::parse_response("Avatar", omdb("True", Some("N/A"), None)).unwrap();
        assert!(details.is_placeholder());
    }

    #[test]
    fn test_false_response_is_not_found() {
        let mut body = omdb("False", None, None);
        body.error = Some("Movie not found!".to_string());

        let err = OmdbClient::parse_response("Nope", body).unwrap_err();
        assert!(matches!(
            err,
            MetadataLookupError::NotFound { ref reason, .. } if reason == "Movie not found!"
        ));
    }

    #[test]
    fn test_placeholder_values() {
        let details = MovieDetails::placeholder();
        assert_eq!(details.poster_url, PLACEHOLDER_POSTER_URL);
        assert_eq!(details.detail_url, "#");
    }
}
