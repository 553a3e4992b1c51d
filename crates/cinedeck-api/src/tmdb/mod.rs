//! TMDB API module.
//!
//! Builds requests for the popular and search movie lists and executes
//! them over HTTP.

mod api;
mod client;
mod error;
mod query;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use error::FetchError;
pub use query::{
    ApiSettings, AuthMode, DEFAULT_BASE_URL, DEFAULT_LANGUAGE, Endpoint, QueryDescriptor,
    RequestDescriptor, build_request,
};
#[allow(clippy::module_name_repetitions)]
pub use types::{MovieListResponse, MovieSummary, TmdbErrorResponse};
