//! Rendering tests against ratatui's `TestBackend`.

use std::path::PathBuf;

use chrono::NaiveDate;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::Color;
use ratatui::Terminal;

use ozone_core::config::DashboardConfig;
use ozone_core::loader::{load_model, LoadFailure, ModelLoad, UNAVAILABLE_WARNING};
use ozone_tui::app::Overlay;
use ozone_tui::{ui, AppState};

fn model_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("ozone-core/tests/fixtures/ozone_model.json")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn unavailable_app() -> AppState {
    let load = ModelLoad::unavailable(LoadFailure::Missing {
        path: PathBuf::from("modelo_03_prophet.json"),
    });
    AppState::with_model(DashboardConfig::default(), load)
}

fn draw(app: &AppState) -> Buffer {
    let backend = TestBackend::new(140, 60);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn screen_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn initial_screen_shows_input_and_warning() {
    let app = unavailable_app();
    let text = screen_text(&draw(&app));
    assert!(text.contains("Ozone (O3) Level Forecast"));
    assert!(text.contains("Forecast horizon (days)"));
    assert!(text.contains("No forecast yet"));
    assert!(text.contains(UNAVAILABLE_WARNING));
}

#[test]
fn simulated_forecast_renders_chart_and_table() {
    let mut app = unavailable_app();
    app.submit_forecast_on(today());
    let text = screen_text(&draw(&app));

    assert!(text.contains("Ozone Forecast"));
    assert!(text.contains("Date"));
    assert!(text.contains("O3 (µg/m³)"));
    assert!(text.contains("Lower"));
    assert!(text.contains("Upper"));
    assert!(!text.contains("Observed"));

    assert!(text.contains("3 rows, simulated"));
    assert!(text.contains("2026-10-16"));
    assert!(text.contains("2026-10-18"));
    assert!(text.contains("54.00"));
    assert!(text.contains("59.00"));
}

#[test]
fn model_forecast_renders_observations() {
    let load = load_model(&model_fixture());
    assert!(load.available());
    let mut app = AppState::with_model(DashboardConfig::default(), load);
    app.submit_forecast_on(today());
    let text = screen_text(&draw(&app));

    assert!(text.contains("3 rows, model"));
    assert!(text.contains("Observed"));
    assert!(text.contains("Lower bound"));
    assert!(text.contains("2024-07-01"));
    assert!(!text.contains(UNAVAILABLE_WARNING));
}

#[test]
fn background_is_white_with_black_text() {
    let mut app = unavailable_app();
    app.submit_forecast_on(today());
    let buf = draw(&app);
    let corner = &buf[(0, 0)];
    assert_eq!(corner.bg, Color::White);

    let title = &buf[(1, 0)];
    assert_eq!(title.fg, Color::Black);
    assert_eq!(title.bg, Color::White);
}

#[test]
fn help_overlay_lists_keys() {
    let mut app = unavailable_app();
    app.overlay = Overlay::Help;
    let text = screen_text(&draw(&app));
    assert!(text.contains("Reload the model file"));
    assert!(text.contains("Run the forecast"));
}

#[test]
fn scrolled_table_skips_leading_rows() {
    let mut app = unavailable_app();
    app.horizon = ozone_tui::app::HorizonInput::new(30);
    app.submit_forecast_on(today());
    app.scroll_down(5);
    let text = screen_text(&draw(&app));
    assert!(!text.contains("50.00"));
    assert!(text.contains("60.00"));
}
