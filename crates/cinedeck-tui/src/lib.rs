//! Presentation layer for cinedeck.
//!
//! Fetch sessions, result presentation, the carousel driver and the
//! `ratatui` + `crossterm` browser built on top of them.

/// Interactive terminal browser.
pub mod browser;
/// Carousel driver and auto-advance timer.
pub mod carousel;
/// Movie summary to render record mapping.
pub mod presenter;
/// Request lifecycle state machine.
pub mod session;
/// Popular feed, search and carousel views.
pub mod view;
