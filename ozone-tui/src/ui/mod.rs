//! Top-level UI layout: header, horizon input, chart, table, status bar.

pub mod chart_panel;
pub mod help_panel;
pub mod status_bar;
pub mod table_panel;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, Overlay};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let theme = &app.theme;
    let area = f.area();
    f.render_widget(Block::default().style(theme.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Percentage(55),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, chunks[0], app);
    render_input(f, chunks[1], app);
    chart_panel::render(f, chunks[2], app);
    table_panel::render(f, chunks[3], app);
    status_bar::render(f, chunks[4], app);

    if app.overlay == Overlay::Help {
        help_panel::render(f, area, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let model_line = match app.model.model() {
        Some(loaded) => format!(
            "Daily ozone (O3) forecast in {}. Model: {} ({} growth, {})",
            app.config.display.units,
            loaded.path.display(),
            loaded.model.growth().label(),
            loaded.short_fingerprint()
        ),
        None => format!(
            "Daily ozone (O3) forecast in {}. Model unavailable, showing simulated data.",
            app.config.display.units
        ),
    };
    let lines = vec![
        Line::from(Span::styled(format!(" {}", app.config.display.title), theme.title())),
        Line::from(Span::styled(format!(" {model_line}"), theme.caption())),
    ];
    f.render_widget(Paragraph::new(lines).style(theme.base()), area);
}

fn render_input(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.caption())
        .title(Span::styled(" Forecast horizon (days) ", theme.title()))
        .style(theme.base());
    let line = Line::from(vec![
        Span::styled(format!(" {}", app.horizon.text()), theme.title()),
        Span::styled("_", theme.fg(theme.info)),
        Span::styled("   [Enter] Forecast", theme.caption()),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
