//! Ozone TUI: terminal dashboard for the ozone (O3) forecast.
//!
//! Layout, top to bottom:
//! 1. Header: title and model availability caption
//! 2. Horizon input: number of days to forecast
//! 3. Chart: model-aware or simulated forecast chart
//! 4. Table: every forecast row
//! 5. Status bar: key hints, availability warning, last action

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use input::handle_key;
pub use theme::Theme;
