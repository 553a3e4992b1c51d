//! Fetch session: request lifecycle of one view.
//!
//! A session moves `Idle -> Loading -> Success | Error`. Every request gets a
//! ticket carrying a per-session sequence number; only the ticket of the
//! newest request may settle the session, so a slow response from a
//! superseded request can never overwrite newer state.

use cinedeck_api::tmdb::{
    FetchError, LocalMovieApi, MovieListResponse, MovieSummary, RequestDescriptor,
};
use tracing::instrument;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    /// No request issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The newest request succeeded; results in API order.
    Success(Vec<MovieSummary>),
    /// The newest request failed; fixed user-facing message.
    Error(String),
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Sequence number within the issuing session (starts at 1).
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Owns the request lifecycle state for one view.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct FetchSession {
    state: FetchState,
    last_issued: u64,
    in_flight: Option<u64>,
    error_message: String,
}

impl FetchSession {
    /// Creates an idle session that reports failures with `error_message`.
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            state: FetchState::Idle,
            last_issued: 0,
            in_flight: None,
            error_message: error_message.into(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FetchState {
        &self.state
    }

    /// Starts a new request: enters `Loading` from any state.
    ///
    /// Any request still in flight is superseded, not cancelled.
    pub fn begin(&mut self) -> RequestTicket {
        self.last_issued = self.last_issued.saturating_add(1);
        self.in_flight = Some(self.last_issued);
        self.state = FetchState::Loading;
        RequestTicket(self.last_issued)
    }

    /// Applies the outcome of a request.
    ///
    /// Returns `false` and leaves the state untouched when `ticket` is not the
    /// newest in-flight request.
    pub fn settle(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<MovieListResponse, FetchError>,
    ) -> bool {
        if self.in_flight != Some(ticket.0) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.last_issued,
                "discarding stale response"
            );
            return false;
        }
        self.in_flight = None;

        self.state = match outcome {
            Ok(response) => FetchState::Success(response.results),
            Err(err) => {
                tracing::warn!(error = %err, "movie fetch failed");
                FetchState::Error(self.error_message.clone())
            }
        };
        true
    }
}

/// Executes a prepared request, passing a build failure straight through.
///
/// # Errors
///
/// Returns the build error, or whatever the transport reports.
#[instrument(skip_all)]
pub async fn dispatch<A: LocalMovieApi>(
    api: &A,
    request: Result<RequestDescriptor, FetchError>,
) -> Result<MovieListResponse, FetchError> {
    let request = request?;
    api.fetch_movies(&request).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use std::cell::Cell;

    use cinedeck_api::tmdb::{ApiSettings, QueryDescriptor, build_request};
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    const MESSAGE: &str = "ネットワークエラーが発生しました";

    fn response(ids: &[u64]) -> MovieListResponse {
        MovieListResponse {
            page: 1,
            results: ids
                .iter()
                .map(|&id| MovieSummary::new(id, format!("movie {id}"), ""))
                .collect(),
            total_pages: 1,
            total_results: u32::try_from(ids.len()).unwrap(),
        }
    }

    /// Returns a canned response and counts calls.
    struct StubApi {
        outcome: Result<MovieListResponse, FetchError>,
        calls: Cell<u32>,
    }

    impl LocalMovieApi for StubApi {
        async fn fetch_movies(
            &self,
            _request: &RequestDescriptor,
        ) -> Result<MovieListResponse, FetchError> {
            self.calls.set(self.calls.get().saturating_add(1));
            self.outcome.clone()
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        // Arrange & Act
        let session = FetchSession::new(MESSAGE);

        // Assert
        assert_eq!(session.state(), &FetchState::Idle);
    }

    #[test]
    fn test_begin_enters_loading() {
        // Arrange
        let mut session = FetchSession::new(MESSAGE);

        // Act
        let ticket = session.begin();

        // Assert
        assert_eq!(session.state(), &FetchState::Loading);
        assert_eq!(ticket.sequence(), 1);
    }

    #[test]
    fn test_success_keeps_order() {
        // Arrange
        let mut session = FetchSession::new(MESSAGE);
        let ticket = session.begin();

        // Act
        let applied = session.settle(ticket, Ok(response(&[3, 1, 2])));

        // Assert
        assert!(applied);
        let FetchState::Success(movies) = session.state() else {
            panic!("expected success, got {:?}", session.state());
        };
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_error_uses_fixed_message() {
        // Arrange
        let mut session = FetchSession::new(MESSAGE);
        let ticket = session.begin();

        // Act
        session.settle(
            ticket,
            Err(FetchError::Status {
                status: 500,
                message: String::from("boom"),
            }),
        );

        // Assert
        assert_eq!(session.state(), &FetchState::Error(String::from(MESSAGE)));
    }

    #[test]
    fn test_new_request_from_terminal_state() {
        // Arrange
        let mut session = FetchSession::new(MESSAGE);
        let first = session.begin();
        session.settle(first, Err(FetchError::Transport(String::from("down"))));

        // Act
        let second = session.begin();

        // Assert
        assert_eq!(session.state(), &FetchState::Loading);
        assert_eq!(second.sequence(), 2);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        // Arrange
        let mut session = FetchSession::new(MESSAGE);
        let old = session.begin();
        let new = session.begin();
        session.settle(new, Ok(response(&[10])));

        // Act
        let applied = session.settle(old, Ok(response(&[1, 2, 3])));

        // Assert
        assert!(!applied);
        assert_eq!(
            session.state(),
            &FetchState::Success(vec![MovieSummary::new(10, "movie 10", "")])
        );
    }

    #[test]
    fn test_stale_response_while_newer_in_flight() {
        // Arrange
        let mut session = FetchSession::new(MESSAGE);
        let old = session.begin();
        let _new = session.begin();

        // Act
        let applied = session.settle(old, Err(FetchError::Transport(String::from("late"))));

        // Assert
        assert!(!applied);
        assert_eq!(session.state(), &FetchState::Loading);
    }

    #[test]
    fn test_ticket_settles_once() {
        // Arrange
        let mut session = FetchSession::new(MESSAGE);
        let ticket = session.begin();
        session.settle(ticket, Ok(response(&[1])));

        // Act
        let applied = session.settle(ticket, Err(FetchError::Malformed(String::from("x"))));

        // Assert
        assert!(!applied);
        assert!(matches!(session.state(), FetchState::Success(_)));
    }

    #[test]
    fn test_failure_cause_is_logged_as_warning() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .only()
            .run_with_handle();
        let mut session = FetchSession::new(MESSAGE);
        let ticket = session.begin();

        // Act
        with_default(subscriber, || {
            session.settle(ticket, Err(FetchError::Transport(String::from("refused"))));
        });

        // Assert
        handle.assert_finished();
    }

    #[tokio::test]
    async fn test_dispatch_skips_transport_on_build_error() {
        // Arrange
        let api = StubApi {
            outcome: Ok(response(&[1])),
            calls: Cell::new(0),
        };
        let request = build_request(&QueryDescriptor::popular(), &ApiSettings::default());

        // Act
        let outcome = dispatch(&api, request).await;

        // Assert
        assert!(matches!(outcome, Err(FetchError::Configuration(_))));
        assert_eq!(api.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_calls_transport() {
        // Arrange
        let api = StubApi {
            outcome: Ok(response(&[1, 2])),
            calls: Cell::new(0),
        };
        let settings = ApiSettings {
            api_key: Some(String::from("k")),
            ..ApiSettings::default()
        };
        let request = build_request(&QueryDescriptor::popular(), &settings);

        // Act
        let outcome = dispatch(&api, request).await.unwrap();

        // Assert
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(api.calls.get(), 1);
    }
}
