//! TUI rendering logic for the browser.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::state::{BrowserState, Focus, InputMode};
use crate::presenter::RenderRecord;
use crate::view::{ViewContent, ViewKind};

/// Page header.
pub const HEADER_TITLE: &str = "私の映画ポートフォリオ";

/// Page footer.
pub const FOOTER_TEXT: &str = "© 2025 My Movie Portfolio";

/// Shown while a request is in flight.
const LOADING_TEXT: &str = "読み込み中...";

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // header
            Constraint::Length(3),  // search input
            Constraint::Min(5),     // search results
            Constraint::Length(11), // carousel + dots
            Constraint::Length(3),  // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0]);
    draw_search_input(frame, chunks[1], state);
    draw_search_results(frame, chunks[2], state);
    draw_carousel(frame, chunks[3], state, Instant::now());
    draw_footer(frame, chunks[4], state);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(HEADER_TITLE)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_search_input(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let style = if state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.query.as_str()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(state.focus == Focus::Search))
            .title(format!(" {}: / ", ViewKind::Search.title())),
    );
    frame.render_widget(input, area);
}

fn draw_search_results(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state.focus == Focus::Search));

    match state.search.content() {
        ViewContent::Idle => frame.render_widget(Paragraph::new("").block(block), area),
        ViewContent::Loading => {
            frame.render_widget(Paragraph::new(LOADING_TEXT).block(block), area);
        }
        ViewContent::Error(line) => frame.render_widget(error_paragraph(line).block(block), area),
        ViewContent::Records(records) => {
            let items: Vec<ListItem> = records.iter().map(search_item).collect();
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );
            frame.render_stateful_widget(list, area, &mut state.result_list_state);
        }
    }
}

fn search_item(record: &RenderRecord) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(Span::styled(
            record.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(record.synopsis.clone()),
        Line::from(Span::styled(
            record.poster_url.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn error_paragraph(line: String) -> Paragraph<'static> {
    Paragraph::new(line)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
}

#[allow(clippy::indexing_slicing)]
fn draw_carousel(frame: &mut Frame, area: Rect, state: &BrowserState, now: Instant) {
    let autoplay = if state.carousel.auto_advance() {
        "ON"
    } else {
        "OFF"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state.focus == Focus::Carousel))
        .title(format!(
            " {} (自動再生: {autoplay}) ",
            ViewKind::Carousel.title()
        ));

    match state.carousel_view.content() {
        ViewContent::Idle => frame.render_widget(block, area),
        ViewContent::Loading => {
            frame.render_widget(Paragraph::new(LOADING_TEXT).block(block), area);
        }
        ViewContent::Error(line) => frame.render_widget(error_paragraph(line).block(block), area),
        ViewContent::Records(_) => {
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(inner);

            draw_slides(frame, rows[0], state, now);
            frame.render_widget(dots(state), rows[1]);
        }
    }
}

#[allow(clippy::indexing_slicing)]
fn draw_slides(frame: &mut Frame, area: Rect, state: &BrowserState, now: Instant) {
    let window = state.carousel.window();
    if window.visible_count == 0 {
        return;
    }
    let count = u32::try_from(window.visible_count).unwrap_or(1);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, count); window.visible_count])
        .split(area);

    let slide_style = if state.carousel.in_transition(now) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    for (column, record) in columns.iter().zip(window.visible()) {
        let slide = Paragraph::new(vec![
            Line::from(Span::styled(
                record.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                record.poster_url.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(record.synopsis.clone()),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(slide_style),
        );
        frame.render_widget(slide, *column);
    }
}

fn dots(state: &BrowserState) -> Paragraph<'static> {
    let offset = state.carousel.offset();
    let spans: Vec<Span> = (0..state.carousel.items().len())
        .map(|index| {
            if index == offset {
                Span::styled("● ", Style::default().fg(Color::Cyan))
            } else {
                Span::raw("○ ")
            }
        })
        .collect();
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

#[allow(clippy::indexing_slicing)]
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help = match state.input_mode {
        InputMode::Editing => "Enter:search  Esc:done  Backspace:delete",
        InputMode::Normal => {
            "/:search  Tab:focus  ←→:slide  1-9:dot  ↑↓:results  p:autoplay  o:open  q:quit"
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(28)])
        .split(area);

    let help = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[0]);

    let footer = Paragraph::new(FOOTER_TEXT)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[1]);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinedeck_api::tmdb::{ApiSettings, FetchError, MovieListResponse, MovieSummary};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::carousel::CarouselSettings;
    use crate::presenter::DEFAULT_IMAGE_BASE_URL;
    use crate::view::FetchOutcome;

    fn make_state() -> BrowserState {
        let settings = ApiSettings {
            api_key: Some(String::from("k")),
            ..ApiSettings::default()
        };
        let mut state = BrowserState::new(
            settings,
            DEFAULT_IMAGE_BASE_URL,
            "ja-JP",
            CarouselSettings::default(),
            8,
        );
        state.set_terminal_width(120);
        state
    }

    fn render(state: &mut BrowserState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_draws_header_and_footer() {
        // Arrange
        let mut state = make_state();

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("My Movie Portfolio"));
        assert!(screen.contains("q:quit"));
    }

    #[test]
    fn test_draws_carousel_slides() {
        // Arrange
        let mut state = make_state();
        let pending = state.mount().unwrap();
        state.apply(FetchOutcome {
            view: pending.view,
            ticket: pending.ticket,
            result: Ok(MovieListResponse {
                page: 1,
                results: vec![
                    MovieSummary::new(1, "Alpha", "first"),
                    MovieSummary::new(2, "Bravo", "second"),
                    MovieSummary::new(3, "Charlie", "third"),
                    MovieSummary::new(4, "Delta", "fourth"),
                ],
                total_pages: 1,
                total_results: 4,
            }),
        });

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("Charlie"));
        assert!(!screen.contains("Delta"));
    }

    #[test]
    fn test_carousel_slide_shows_poster_url() {
        // Arrange
        let mut state = make_state();
        let pending = state.mount().unwrap();
        state.apply(FetchOutcome {
            view: pending.view,
            ticket: pending.ticket,
            result: Ok(MovieListResponse {
                page: 1,
                results: vec![MovieSummary::new(1, "Alpha", "first").poster_path("/a.jpg")],
                total_pages: 1,
                total_results: 1,
            }),
        });

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("image.tmdb.org"));
        assert!(screen.contains("/a.jpg"));
    }

    #[test]
    fn test_draws_error_line() {
        // Arrange
        let mut state = make_state();
        let pending = state.mount().unwrap();
        state.apply(FetchOutcome {
            view: pending.view,
            ticket: pending.ticket,
            result: Err(FetchError::Status {
                status: 500,
                message: String::from("boom"),
            }),
        });

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("エ"));
        assert!(!screen.contains("boom"));
    }
}
