//! Help overlay: keyboard shortcuts.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::centered_rect;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let popup = centered_rect(60, 60, area);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();
    section(&mut lines, theme, "Horizon");
    key(&mut lines, theme, "0-9 / Backspace", "Edit the number of days");
    key(&mut lines, theme, "Up / +", "One more day");
    key(&mut lines, theme, "Down / -", "One day less (minimum 1)");
    key(&mut lines, theme, "Enter", "Run the forecast");
    lines.push(Line::from(""));

    section(&mut lines, theme, "Table");
    key(&mut lines, theme, "j / k", "Scroll one row");
    key(&mut lines, theme, "PgDn / PgUp", "Scroll one page");
    key(&mut lines, theme, "Home", "Back to the first row");
    lines.push(Line::from(""));

    section(&mut lines, theme, "General");
    key(&mut lines, theme, "r", "Reload the model file");
    key(&mut lines, theme, "?", "Show this help");
    key(&mut lines, theme, "q / Esc / Ctrl+C", "Quit");
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close.",
        theme.caption(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.caption())
        .title(Span::styled(" Help ", theme.title()))
        .style(theme.base());
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, theme: &Theme, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme.title())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, theme: &Theme, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>18}  ", keys), theme.fg(theme.info)),
        Span::styled(desc.to_string(), theme.base()),
    ]));
}
