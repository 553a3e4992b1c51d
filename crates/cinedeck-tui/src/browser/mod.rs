//! Interactive browser: search box, search results and the popular carousel.

/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cinedeck_api::tmdb::{ApiSettings, LocalMovieApi};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::instrument;

use self::state::{BrowserState, Focus, InputMode};
use crate::carousel::{AutoAdvanceTicker, CarouselSettings};
use crate::view::{FetchOutcome, PendingFetch, execute};

pub use self::ui::{FOOTER_TEXT, HEADER_TITLE};

/// Redraw interval, so transitions settle on screen without input.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the browser needs besides the transport.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Request settings.
    pub api_settings: ApiSettings,
    /// Image base URL.
    pub image_base_url: String,
    /// Response language.
    pub language: String,
    /// Carousel behavior.
    pub carousel: CarouselSettings,
    /// Viewport units per terminal column.
    pub cell_width: u32,
}

/// What the event loop should do after a key press.
#[derive(Debug)]
enum KeyAction {
    None,
    Quit,
    Fetch(PendingFetch),
    Open(String),
}

/// Runs the browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
#[instrument(skip_all)]
pub async fn run_browser<A: LocalMovieApi>(api: &A, config: BrowserConfig) -> Result<()> {
    let mut state = BrowserState::new(
        config.api_settings,
        &config.image_base_url,
        &config.language,
        config.carousel,
        config.cell_width,
    );
    let (columns, _) = crossterm::terminal::size().context("failed to read terminal size")?;
    state.set_terminal_width(columns);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, api, &mut state).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A: LocalMovieApi>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: &A,
    state: &mut BrowserState,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut pending: FuturesUnordered<LocalBoxFuture<'_, FetchOutcome>> = FuturesUnordered::new();

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let _ticker = AutoAdvanceTicker::start(state.carousel.settings().autoplay_interval, tick_tx);

    if let Some(fetch) = state.mount() {
        pending.push(execute(api, fetch).boxed_local());
    }

    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else {
                    return Ok(());
                };
                match event.context("failed to read event")? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match handle_key(state, key, Instant::now()) {
                            KeyAction::Quit => return Ok(()),
                            KeyAction::Fetch(fetch) => {
                                pending.push(execute(api, fetch).boxed_local());
                            }
                            KeyAction::Open(url) => open_poster(&url),
                            KeyAction::None => {}
                        }
                    }
                    Event::Resize(columns, _) => state.set_terminal_width(columns),
                    _ => {}
                }
            }
            Some(outcome) = pending.next(), if !pending.is_empty() => {
                state.apply(outcome);
            }
            Some(_tick) = tick_rx.recv() => {
                state.on_tick(Instant::now());
            }
            _ = redraw.tick() => {}
        }
    }
}

/// Dispatches a key press by input mode.
fn handle_key(state: &mut BrowserState, key: KeyEvent, now: Instant) -> KeyAction {
    match state.input_mode {
        InputMode::Editing => handle_editing_input(state, key.code, key.modifiers),
        InputMode::Normal => handle_normal_input(state, key.code, key.modifiers, now),
    }
}

/// Handles key input while editing the search box.
fn handle_editing_input(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> KeyAction {
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        KeyCode::Esc => state.stop_editing(),
        KeyCode::Enter => {
            state.stop_editing();
            return state.submit_search().map_or(KeyAction::None, KeyAction::Fetch);
        }
        KeyCode::Backspace => state.input_pop(),
        KeyCode::Char(c) => state.input_push(c),
        _ => {}
    }
    KeyAction::None
}

/// Handles key input in normal mode.
fn handle_normal_input(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
    now: Instant,
) -> KeyAction {
    match key {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        KeyCode::Char('/' | 'i') => state.start_editing(),
        KeyCode::Enter if state.focus == Focus::Search => {
            return state.submit_search().map_or(KeyAction::None, KeyAction::Fetch);
        }
        KeyCode::Tab => state.toggle_focus(),
        KeyCode::Left | KeyCode::Char('h') => {
            state.carousel.retreat(now);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.carousel.advance(now);
        }
        KeyCode::Char(digit @ '1'..='9') => {
            if let Some(index) = digit
                .to_digit(10)
                .and_then(|d| usize::try_from(d).ok())
                .and_then(|d| d.checked_sub(1))
            {
                state.carousel.go_to(index, now);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char('p') => {
            let enabled = state.carousel.toggle_autoplay();
            tracing::debug!(enabled, "autoplay toggled");
        }
        KeyCode::Char('o') => {
            if let Some(record) = state.focused_record() {
                return KeyAction::Open(record.poster_url);
            }
        }
        _ => {}
    }
    KeyAction::None
}

/// Opens a poster URL with the system opener.
fn open_poster(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open poster URL");
    }
}
