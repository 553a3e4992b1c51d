//! Browser TUI state management.

use std::time::Instant;

use cinedeck_api::tmdb::ApiSettings;
use ratatui::widgets::ListState;

use crate::carousel::{CarouselDriver, CarouselSettings};
use crate::presenter::RenderRecord;
use crate::view::{FetchOutcome, PendingFetch, View, ViewKind};

/// Currently focused region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Search input and results.
    Search,
    /// Popular carousel.
    Carousel,
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation keys.
    Normal,
    /// Typing into the search box.
    Editing,
}

/// State for the browser TUI.
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Search view.
    pub search: View,
    /// Popular carousel view.
    pub carousel_view: View,
    /// Carousel window over the carousel view's records.
    pub carousel: CarouselDriver,
    /// Currently focused region.
    pub focus: Focus,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Search box text.
    pub query: String,
    /// Selection in the search result list.
    pub result_list_state: ListState,
    /// Settings used for every request.
    api_settings: ApiSettings,
    /// Viewport units per terminal column.
    cell_width: u32,
}

impl BrowserState {
    /// Creates the initial state. Nothing is fetched until [`Self::mount`].
    #[must_use]
    pub fn new(
        api_settings: ApiSettings,
        image_base_url: &str,
        language: &str,
        carousel_settings: CarouselSettings,
        cell_width: u32,
    ) -> Self {
        Self {
            search: View::new(ViewKind::Search, image_base_url).with_language(language),
            carousel_view: View::new(ViewKind::Carousel, image_base_url).with_language(language),
            carousel: CarouselDriver::new(carousel_settings, 0),
            focus: Focus::Carousel,
            input_mode: InputMode::Normal,
            query: String::new(),
            result_list_state: ListState::default(),
            api_settings,
            cell_width: cell_width.max(1),
        }
    }

    /// Issues the carousel's initial fetch.
    pub fn mount(&mut self) -> Option<PendingFetch> {
        self.carousel_view.mount(&self.api_settings)
    }

    /// Submits the search box. Blank input issues nothing.
    pub fn submit_search(&mut self) -> Option<PendingFetch> {
        self.search.submit(&self.query, &self.api_settings)
    }

    /// Applies a finished fetch to the view that issued it.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        match outcome.view {
            ViewKind::Search => {
                let applied = self.search.apply(outcome);
                if applied {
                    let has_results = self.search.records().is_some_and(|r| !r.is_empty());
                    self.result_list_state
                        .select(if has_results { Some(0) } else { None });
                }
                applied
            }
            ViewKind::Carousel => {
                let applied = self.carousel_view.apply(outcome);
                if applied {
                    self.carousel
                        .set_items(self.carousel_view.records().unwrap_or_default());
                }
                applied
            }
            ViewKind::PopularFeed => false,
        }
    }

    /// Updates the viewport from the terminal width in columns.
    pub fn set_terminal_width(&mut self, columns: u16) {
        self.carousel
            .set_viewport_width(u32::from(columns).saturating_mul(self.cell_width));
    }

    /// Handles an auto-advance tick.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.carousel.tick(now)
    }

    /// Switches focus between search and carousel.
    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Search => Focus::Carousel,
            Focus::Carousel => Focus::Search,
        };
    }

    /// Starts editing the search box.
    pub const fn start_editing(&mut self) {
        self.focus = Focus::Search;
        self.input_mode = InputMode::Editing;
    }

    /// Leaves editing mode; the text is kept.
    pub const fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Appends a character to the search box.
    pub fn input_push(&mut self, ch: char) {
        self.query.push(ch);
    }

    /// Removes the last character from the search box.
    pub fn input_pop(&mut self) {
        self.query.pop();
    }

    /// Number of search results currently shown.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.search.records().map_or(0, |r| r.len())
    }

    /// Selected search result index.
    #[must_use]
    pub fn result_cursor(&self) -> usize {
        self.result_list_state.selected().unwrap_or(0)
    }

    /// Moves the result cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.result_cursor();
        if current > 0 {
            self.result_list_state.select(Some(current - 1));
        }
    }

    /// Moves the result cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        let current = self.result_cursor();
        if current + 1 < self.result_count() {
            self.result_list_state.select(Some(current + 1));
        }
    }

    /// The record the user is looking at: the selected search result, or the
    /// first visible carousel slide.
    #[must_use]
    pub fn focused_record(&self) -> Option<RenderRecord> {
        match self.focus {
            Focus::Search => self
                .search
                .records()
                .and_then(|records| records.into_iter().nth(self.result_cursor())),
            Focus::Carousel => self.carousel.window().visible().next().cloned(),
        }
    }
}
