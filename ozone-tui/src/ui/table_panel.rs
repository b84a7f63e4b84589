//! Forecast table beneath the chart: every row of the held result.

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use ozone_core::forecast::{ForecastResult, ForecastRow};

use crate::app::AppState;
use crate::theme::Theme;

pub const HEADERS: [&str; 4] = ["Date", "Forecast", "Lower", "Upper"];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    match app.session.result() {
        Some(result) => {
            let table = forecast_table(result, app.table_scroll, theme);
            f.render_widget(table, area);
        }
        None => {
            let para = Paragraph::new(Span::styled("No forecast rows.", theme.caption()))
                .style(theme.base())
                .block(table_block(" Forecast table ".into(), theme));
            f.render_widget(para, area);
        }
    }
}

fn table_block(title: String, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.caption())
        .title(Span::styled(title, theme.title()))
        .style(theme.base())
}

/// Cell text for one row, values to two decimals.
pub fn row_cells(row: &ForecastRow) -> [String; 4] {
    [
        row.date.format("%Y-%m-%d").to_string(),
        format!("{:.2}", row.point_estimate),
        format!("{:.2}", row.lower_bound),
        format!("{:.2}", row.upper_bound),
    ]
}

fn forecast_table<'a>(result: &'a ForecastResult, scroll: usize, theme: &Theme) -> Table<'a> {
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(theme.title());
    let rows = result
        .rows
        .iter()
        .skip(scroll)
        .map(|r| Row::new(row_cells(r).map(Cell::from)).style(theme.base()));

    let title = format!(
        " Forecast table ({} rows, {}) ",
        result.len(),
        result.source.label()
    );
    Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .style(theme.base())
    .block(table_block(title, theme))
}
