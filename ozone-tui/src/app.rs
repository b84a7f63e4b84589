//! Application state: single-owner, main-thread only.
//!
//! All dashboard state lives here: the loaded (or unavailable) model, the
//! horizon input, the forecast session, and what the status bar shows.

use chrono::NaiveDate;

use ozone_core::config::DashboardConfig;
use ozone_core::loader::{load_model, ModelLoad};
use ozone_core::session::Session;

use crate::theme::Theme;

/// Longest horizon text the input accepts.
pub const MAX_HORIZON_DIGITS: usize = 5;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Popup drawn over the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

/// Numeric horizon field. Holds raw digits so the user can clear and retype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizonInput {
    text: String,
}

impl HorizonInput {
    pub fn new(initial: u32) -> Self {
        Self {
            text: initial.max(1).to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed value; `None` for empty input.
    pub fn value(&self) -> Option<u32> {
        self.text.parse().ok()
    }

    pub fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() || self.text.len() >= MAX_HORIZON_DIGITS {
            return;
        }
        if self.text == "0" {
            self.text.clear();
        }
        self.text.push(c);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn increment(&mut self) {
        let next = self.value().unwrap_or(0).saturating_add(1);
        if next.to_string().len() <= MAX_HORIZON_DIGITS {
            self.text = next.to_string();
        }
    }

    /// Step down, never below 1.
    pub fn decrement(&mut self) {
        let next = self.value().unwrap_or(1).saturating_sub(1).max(1);
        self.text = next.to_string();
    }
}

pub struct AppState {
    pub config: DashboardConfig,
    pub model: ModelLoad,
    pub session: Session,
    pub horizon: HorizonInput,
    pub theme: Theme,
    pub overlay: Overlay,
    /// First table row shown.
    pub table_scroll: usize,
    pub status_message: Option<(String, StatusLevel)>,
    pub running: bool,
}

impl AppState {
    /// Build state and run the loader once.
    pub fn new(config: DashboardConfig) -> Self {
        let model = load_model(&config.model_path);
        Self::with_model(config, model)
    }

    pub fn with_model(config: DashboardConfig, model: ModelLoad) -> Self {
        let horizon = HorizonInput::new(config.default_horizon_days);
        let mut app = Self {
            config,
            model,
            session: Session::new(),
            horizon,
            theme: Theme::light(),
            overlay: Overlay::None,
            table_scroll: 0,
            status_message: None,
            running: true,
        };
        app.announce_model();
        app
    }

    /// Re-run the loader against the configured path.
    pub fn reload_model(&mut self) {
        self.model = load_model(&self.config.model_path);
        self.announce_model();
    }

    fn announce_model(&mut self) {
        let loaded = self.model.model().map(|loaded| {
            format!(
                "Model loaded from {} ({})",
                loaded.path.display(),
                loaded.short_fingerprint()
            )
        });
        match (loaded, self.model.warning()) {
            (Some(msg), _) => self.set_status(msg),
            (None, Some(warning)) => self.set_warning(warning),
            (None, None) => {}
        }
    }

    /// Produce a forecast for the current input, dated from the local today.
    pub fn submit_forecast(&mut self) {
        let today = chrono::Local::now().date_naive();
        self.submit_forecast_on(today);
    }

    pub fn submit_forecast_on(&mut self, today: NaiveDate) {
        let Some(days) = self.horizon.value() else {
            self.set_error("Enter a forecast horizon of at least 1 day");
            return;
        };
        let opts = self.config.producer_options();
        match self.session.submit(days, &self.model, today, &opts) {
            Ok(()) => {
                self.table_scroll = 0;
                let source = self
                    .session
                    .result()
                    .map(|r| r.source.label())
                    .unwrap_or_default();
                let msg = format!("Forecast for {days} day(s) from {source}");
                match self.model.warning() {
                    Some(warning) => self.set_warning(format!("{warning} {msg}")),
                    None => self.set_status(msg),
                }
            }
            Err(e) => {
                tracing::error!("forecast failed: {e}");
                self.set_error(format!("Forecast failed: {e}"));
            }
        }
    }

    pub fn table_len(&self) -> usize {
        self.session.result().map_or(0, |r| r.len())
    }

    pub fn scroll_down(&mut self, n: usize) {
        let max = self.table_len().saturating_sub(1);
        self.table_scroll = (self.table_scroll + n).min(max);
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.table_scroll = self.table_scroll.saturating_sub(n);
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}
