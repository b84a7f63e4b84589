//! Light theme tokens for the ozone dashboard.
//!
//! Fixed palette for both forecast sources: white surface, black title and
//! axis text, one accent for the point estimate and a softer pair for the
//! interval edges.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// White surface
    pub background: Color,
    /// Black (titles, axes, table text)
    pub text: Color,
    /// Dark gray (captions, hints, borders)
    pub muted: Color,
    /// Point estimate line
    pub forecast: Color,
    /// Lower interval edge
    pub lower: Color,
    /// Upper interval edge
    pub upper: Color,
    /// Training observations
    pub observed: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::White,
            text: Color::Black,
            muted: Color::Rgb(90, 90, 90),
            forecast: Color::Rgb(31, 119, 180),
            lower: Color::Rgb(44, 160, 44),
            upper: Color::Rgb(214, 39, 40),
            observed: Color::Black,
            info: Color::Rgb(31, 119, 180),
            warning: Color::Rgb(176, 96, 0),
            error: Color::Rgb(200, 0, 0),
        }
    }

    /// Base style for every surface.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn title(&self) -> Style {
        self.base().add_modifier(Modifier::BOLD)
    }

    pub fn caption(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn fg(&self, color: Color) -> Style {
        self.base().fg(color)
    }
}
