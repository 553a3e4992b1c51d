//! Fetch failure taxonomy.

/// Why a movie list fetch failed.
///
/// Every variant is converted to a fixed, localized message at the fetch
/// session boundary; the variant and its detail are only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Missing or invalid credential, or an unusable base URL.
    Configuration(String),
    /// The request never produced a response (network, timeout).
    Transport(String),
    /// The API answered with a non-success HTTP status.
    Status {
        /// HTTP status code.
        status: u16,
        /// TMDB `status_message` or the raw body.
        message: String,
    },
    /// The body could not be read as the expected schema.
    Malformed(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(detail) => write!(f, "configuration error: {detail}"),
            Self::Transport(detail) => write!(f, "transport error: {detail}"),
            Self::Status { status, message } => {
                write!(f, "TMDB API error (HTTP {status}): {message}")
            }
            Self::Malformed(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

impl std::error::Error for FetchError {}
