//! Frame composition for the terminal UI.
use anyhow::Result;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use pairs_core::Status;

use crate::presentation::{terminal::Tui, theme::Theme};
use crate::state::ViewState;

const KEY_HELP: &str =
    "←↑↓→/hjkl move  enter flip  1/2/3 start  n restart  p power-up  r reset  t theme  q quit";

/// Seconds as `mm:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn render(terminal: &mut Tui, view: &ViewState) -> Result<()> {
    terminal.draw(|frame| draw(frame, view))?;
    Ok(())
}

fn draw(frame: &mut Frame, view: &ViewState) {
    let theme = Theme::new(view.theme);
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Board
            Constraint::Length(3), // Stats
            Constraint::Length(3), // Message
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view, &theme);
    render_board(frame, chunks[1], view, &theme);
    render_stats(frame, chunks[2], view, &theme);
    render_message(frame, chunks[3], view, &theme);

    let footer = Paragraph::new(KEY_HELP)
        .style(theme.muted())
        .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}

fn render_header(frame: &mut Frame, area: Rect, view: &ViewState, theme: &Theme) {
    let line = Line::from(vec![
        Span::raw("Status: "),
        Span::styled(view.status.to_string(), theme.accent()),
        Span::raw(" | Difficulty: "),
        Span::styled(view.difficulty.to_string(), theme.accent()),
        Span::raw(" | Time: "),
        Span::styled(
            format_clock(view.time_left),
            theme.clock(view.time_left, view.status),
        ),
    ]);

    let header = Paragraph::new(line)
        .style(theme.base())
        .block(Block::default().borders(Borders::ALL).title(" Pairs "));
    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, area: Rect, view: &ViewState, theme: &Theme) {
    if view.cards.is_empty() {
        let hint = match view.status {
            Status::Loading => "Loading...",
            _ => "Press 1, 2 or 3 to start (easy, medium, hard)",
        };
        let placeholder = Paragraph::new(hint)
            .style(theme.muted())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let columns = view.columns();
    let rows = view.cards.len().div_ceil(columns);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = row * columns + col;
            let Some(card) = view.cards.get(index) else {
                continue;
            };

            let (label, style) = theme.card(card);
            let widget = Paragraph::new(Span::styled(label, style))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.card_border(card, index == view.cursor)),
                );
            frame.render_widget(widget, *cell);
        }
    }
}

fn render_stats(frame: &mut Frame, area: Rect, view: &ViewState, theme: &Theme) {
    let power_up = if view.power_up_available {
        "ready"
    } else {
        "unavailable"
    };

    let line = Line::from(vec![
        Span::raw("Clicks: "),
        Span::styled(view.stats.clicks.to_string(), theme.accent()),
        Span::raw(" | Matched: "),
        Span::styled(
            format!("{}/{}", view.stats.matched_pairs, view.stats.total_pairs),
            theme.accent(),
        ),
        Span::raw(" | Power-up: "),
        Span::styled(power_up, theme.power_up(view.power_up_available)),
        Span::raw(" | Theme: "),
        Span::styled(view.theme.to_string(), theme.muted()),
    ]);

    let stats = Paragraph::new(line)
        .style(theme.base())
        .block(Block::default().borders(Borders::ALL).title(" Stats "));
    frame.render_widget(stats, area);
}

fn render_message(frame: &mut Frame, area: Rect, view: &ViewState, theme: &Theme) {
    let text = view.message.as_deref().unwrap_or("");
    let message = Paragraph::new(text)
        .style(theme.message(view.status))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(message, area);
}
