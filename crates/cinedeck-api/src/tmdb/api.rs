//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::FetchError;
use super::query::RequestDescriptor;
use super::types::MovieListResponse;

/// Movie list transport.
///
/// Abstracts request execution for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Executes a prepared list request.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the request cannot be sent,
    /// [`FetchError::Status`] on a non-success status, and
    /// [`FetchError::Malformed`] if the body is not a movie list.
    async fn fetch_movies(
        &self,
        request: &RequestDescriptor,
    ) -> Result<MovieListResponse, FetchError>;
}
