//! Views: one fetch session plus one presentation profile each.

use cinedeck_api::tmdb::{
    ApiSettings, DEFAULT_LANGUAGE, Endpoint, FetchError, LocalMovieApi, MovieListResponse,
    QueryDescriptor, RequestDescriptor, build_request,
};

use crate::presenter::{ImageSize, PresentationProfile, Presenter, RenderRecord};
use crate::session::{FetchSession, FetchState, RequestTicket, dispatch};

/// Message shown when a popular-movie fetch fails.
pub const NETWORK_ERROR_MESSAGE: &str = "ネットワークエラーが発生しました";

/// Message shown when a search fails.
pub const SEARCH_ERROR_MESSAGE: &str = "検索中にエラーが発生しました";

/// Prefix of the inline error line.
pub const ERROR_PREFIX: &str = "エラー: ";

/// Which view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Plain list of popular movies.
    PopularFeed,
    /// Search results.
    Search,
    /// Popular movies as a carousel.
    Carousel,
}

impl ViewKind {
    /// Endpoint this view queries.
    #[must_use]
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::PopularFeed | Self::Carousel => Endpoint::Popular,
            Self::Search => Endpoint::Search,
        }
    }

    /// Presentation profile.
    #[must_use]
    pub const fn profile(self) -> PresentationProfile {
        match self {
            Self::PopularFeed => PresentationProfile {
                image_size: ImageSize::W500,
                synopsis_budget: None,
            },
            Self::Search => PresentationProfile {
                image_size: ImageSize::W200,
                synopsis_budget: Some(150),
            },
            Self::Carousel => PresentationProfile {
                image_size: ImageSize::W500,
                synopsis_budget: Some(100),
            },
        }
    }

    /// Fixed message shown when a fetch fails.
    #[must_use]
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::PopularFeed | Self::Carousel => NETWORK_ERROR_MESSAGE,
            Self::Search => SEARCH_ERROR_MESSAGE,
        }
    }

    /// Section title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::PopularFeed | Self::Carousel => "人気の映画",
            Self::Search => "映画検索",
        }
    }
}

/// A request that has been issued but not yet settled.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    /// Issuing view.
    pub view: ViewKind,
    /// Ticket to settle with.
    pub ticket: RequestTicket,
    /// Prepared request, or the reason it could not be built.
    pub request: Result<RequestDescriptor, FetchError>,
}

/// A finished fetch, ready to be applied to its view.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Issuing view.
    pub view: ViewKind,
    /// Ticket the request was issued with.
    pub ticket: RequestTicket,
    /// Transport result.
    pub result: Result<MovieListResponse, FetchError>,
}

/// Executes a pending fetch.
pub async fn execute<A: LocalMovieApi>(api: &A, pending: PendingFetch) -> FetchOutcome {
    let PendingFetch {
        view,
        ticket,
        request,
    } = pending;
    let result = dispatch(api, request).await;
    FetchOutcome {
        view,
        ticket,
        result,
    }
}

/// What a view currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewContent {
    /// Nothing requested yet.
    Idle,
    /// Waiting for the API.
    Loading,
    /// Presented results (possibly empty).
    Records(Vec<RenderRecord>),
    /// The inline error line.
    Error(String),
}

/// Formats the inline error line for a message.
#[must_use]
pub fn error_line(message: &str) -> String {
    format!("{ERROR_PREFIX}{message}")
}

/// One independent view.
#[derive(Debug, Clone)]
pub struct View {
    kind: ViewKind,
    session: FetchSession,
    presenter: Presenter,
    language: String,
    page: u32,
}

impl View {
    /// Creates an idle view.
    #[must_use]
    pub fn new(kind: ViewKind, image_base_url: &str) -> Self {
        Self {
            kind,
            session: FetchSession::new(kind.error_message()),
            presenter: Presenter::new(image_base_url, kind.profile()),
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// View kind.
    #[must_use]
    pub const fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Response language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Result page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Session state.
    #[must_use]
    pub const fn state(&self) -> &FetchState {
        self.session.state()
    }

    /// Issues the initial fetch of a popular-movie view.
    ///
    /// The search view has nothing to fetch on mount and returns `None`.
    pub fn mount(&mut self, settings: &ApiSettings) -> Option<PendingFetch> {
        match self.kind.endpoint() {
            Endpoint::Popular => {
                let query = QueryDescriptor::popular()
                    .language(self.language.clone())
                    .page(self.page);
                Some(self.issue(&query, settings))
            }
            Endpoint::Search => None,
        }
    }

    /// Issues a search for `input`.
    ///
    /// Blank input, or a view that does not search, issues nothing and leaves
    /// the state unchanged.
    pub fn submit(&mut self, input: &str, settings: &ApiSettings) -> Option<PendingFetch> {
        if self.kind.endpoint() != Endpoint::Search {
            return None;
        }
        let query = QueryDescriptor::search(input)?
            .language(self.language.clone())
            .page(self.page);
        Some(self.issue(&query, settings))
    }

    fn issue(&mut self, query: &QueryDescriptor, settings: &ApiSettings) -> PendingFetch {
        let ticket = self.session.begin();
        PendingFetch {
            view: self.kind,
            ticket,
            request: build_request(query, settings),
        }
    }

    /// Applies a finished fetch. Returns `false` for an outcome of another
    /// view or a superseded request.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.view != self.kind {
            return false;
        }
        self.session.settle(outcome.ticket, outcome.result)
    }

    /// Executes `pending` and applies the outcome.
    pub async fn resolve<A: LocalMovieApi>(&mut self, api: &A, pending: PendingFetch) -> bool {
        let outcome = execute(api, pending).await;
        self.apply(outcome)
    }

    /// Presented records, or `None` unless the last fetch succeeded.
    #[must_use]
    pub fn records(&self) -> Option<Vec<RenderRecord>> {
        match self.session.state() {
            FetchState::Success(movies) => Some(self.presenter.present_all(movies)),
            _ => None,
        }
    }

    /// What the view displays now.
    #[must_use]
    pub fn content(&self) -> ViewContent {
        match self.session.state() {
            FetchState::Idle => ViewContent::Idle,
            FetchState::Loading => ViewContent::Loading,
            FetchState::Success(movies) => {
                ViewContent::Records(self.presenter.present_all(movies))
            }
            FetchState::Error(message) => ViewContent::Error(error_line(message)),
        }
    }
}
