//! Request construction for the TMDB list endpoints.
//!
//! Building a request is pure: the credential and base URL are passed in
//! through [`ApiSettings`] on every call instead of being read from the
//! environment.

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::FetchError;

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "ja-JP";

/// Endpoint a query is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `movie/popular`.
    Popular,
    /// `search/movie`.
    Search,
}

impl Endpoint {
    /// Path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Popular => "movie/popular",
            Self::Search => "search/movie",
        }
    }
}

/// Immutable description of one outbound list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    endpoint: Endpoint,
    language: String,
    page: u32,
    search_term: Option<String>,
}

impl QueryDescriptor {
    /// Creates a `movie/popular` query for page 1 in the default language.
    #[must_use]
    pub fn popular() -> Self {
        Self {
            endpoint: Endpoint::Popular,
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            search_term: None,
        }
    }

    /// Creates a `search/movie` query.
    ///
    /// Returns `None` when the term is blank after trimming; callers must not
    /// issue a request in that case.
    pub fn search(term: impl Into<String>) -> Option<Self> {
        let term = term.into();
        if term.trim().is_empty() {
            return None;
        }
        Some(Self {
            endpoint: Endpoint::Search,
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            search_term: Some(term),
        })
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page. Page 0 is treated as page 1.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = if page == 0 { 1 } else { page };
        self
    }

    /// Target endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Response language.
    #[must_use]
    pub fn language_tag(&self) -> &str {
        &self.language
    }

    /// Result page (always >= 1).
    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page
    }

    /// Search term, present iff the endpoint is `Search`.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }
}

/// How requests authenticate against TMDB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// `api_key` query parameter.
    #[default]
    ApiKey,
    /// `Authorization: Bearer <read access token>` header.
    Bearer,
}

/// Settings injected into every request build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// API base URL (a trailing `/` is added when missing).
    pub base_url: String,
    /// Active authentication mode.
    pub auth: AuthMode,
    /// v3 API key (`TMDB_API_KEY`).
    pub api_key: Option<String>,
    /// v4 read access token (`TMDB_READ_ACCESS_TOKEN`).
    pub read_access_token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            auth: AuthMode::ApiKey,
            api_key: None,
            read_access_token: None,
        }
    }
}

/// A fully qualified request: absolute URL plus headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Absolute request URL including the query string.
    pub url: Url,
    /// Request headers in insertion order.
    pub headers: Vec<(&'static str, String)>,
}

impl RequestDescriptor {
    /// Returns the first header value with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// URL with the `api_key` value masked, for logging.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "api_key" {
                    String::from("***")
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        url.to_string()
    }
}

/// Builds the request for a query.
///
/// Query parameters are emitted in the order `api_key` (API-key mode only),
/// `language`, `page`, `query` (search only). Exactly one of the `api_key`
/// parameter and the `Authorization` header is present.
///
/// # Errors
///
/// Returns [`FetchError::Configuration`] if the base URL is invalid or the
/// credential for the active auth mode is missing or blank.
pub fn build_request(
    descriptor: &QueryDescriptor,
    settings: &ApiSettings,
) -> Result<RequestDescriptor, FetchError> {
    let mut base = settings.base_url.clone();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base)
        .map_err(|e| FetchError::Configuration(format!("invalid base URL {base}: {e}")))?;
    let mut url = base.join(descriptor.endpoint.path()).map_err(|e| {
        FetchError::Configuration(format!(
            "failed to join URL path {}: {e}",
            descriptor.endpoint.path()
        ))
    })?;

    let mut headers: Vec<(&'static str, String)> =
        vec![("Accept", String::from("application/json"))];
    let mut params: Vec<(&str, String)> = Vec::with_capacity(4);

    match settings.auth {
        AuthMode::ApiKey => {
            let key = credential(settings.api_key.as_deref(), "TMDB_API_KEY")?;
            params.push(("api_key", percent_encode(key)));
        }
        AuthMode::Bearer => {
            let token = credential(
                settings.read_access_token.as_deref(),
                "TMDB_READ_ACCESS_TOKEN",
            )?;
            headers.push(("Authorization", format!("Bearer {token}")));
        }
    }

    params.push(("language", percent_encode(&descriptor.language)));
    params.push(("page", descriptor.page.to_string()));
    if let Some(ref term) = descriptor.search_term {
        params.push(("query", percent_encode(term)));
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    url.set_query(Some(&query));

    Ok(RequestDescriptor { url, headers })
}

/// Returns the trimmed credential or a configuration error naming it.
fn credential<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, FetchError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| FetchError::Configuration(format!("{name} is not set")))
}

/// Percent-encodes a query value (space as `%20`).
fn percent_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
