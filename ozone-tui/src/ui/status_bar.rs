//! Bottom status bar: key hints and the last status message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, StatusLevel};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        " Enter:Forecast r:Reload ?:Help q:Quit",
        theme.caption(),
    ));
    spans.push(Span::styled(" | ", theme.base()));

    if let Some((msg, level)) = &app.status_message {
        let color = match level {
            StatusLevel::Info => theme.info,
            StatusLevel::Warning => theme.warning,
            StatusLevel::Error => theme.error,
        };
        spans.push(Span::styled(msg.as_str(), theme.fg(color)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(theme.base()), area);
}
