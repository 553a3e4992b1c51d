//! TMDB API response types.

use serde::{Deserialize, Deserializer};

// --- Movie lists ---

/// Response from the `movie/popular` and `search/movie` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Movies in API order.
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie entry as returned by the list endpoints.
///
/// Only the fields the views render are kept; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Overview text (empty when TMDB has none for the language).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    /// Poster image path (e.g. `/abc.jpg`).
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieSummary {
    /// Creates a movie summary.
    pub fn new(id: u64, title: impl Into<String>, overview: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: overview.into(),
            poster_path: None,
        }
    }

    /// Sets the poster path.
    #[must_use]
    pub fn poster_path(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }
}

/// Reads a JSON `null` string as an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}
