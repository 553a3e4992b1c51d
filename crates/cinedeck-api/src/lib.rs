//! API client library for cinedeck.
//!
//! Provides request building and an HTTP client for the TMDB movie lists.

/// TMDB API client.
pub mod tmdb;
