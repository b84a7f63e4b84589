//! Run-scoped session state.
//!
//! Two states: nothing requested yet, or a forecast is held. Each successful
//! submission overwrites the held forecast; there is no reset. A failed
//! submission leaves the previous state untouched.

use chrono::NaiveDate;

use crate::forecast::{produce_forecast, ForecastError, ForecastRequest, ForecastResult, ProducerOptions};
use crate::loader::ModelLoad;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    NotRequested,
    Forecasted(ForecastResult),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    submissions: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn forecast_performed(&self) -> bool {
        matches!(self.state, SessionState::Forecasted(_))
    }

    pub fn result(&self) -> Option<&ForecastResult> {
        match &self.state {
            SessionState::Forecasted(result) => Some(result),
            SessionState::NotRequested => None,
        }
    }

    /// Successful submissions so far.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    /// Produce a forecast for `horizon_days` and hold it.
    pub fn submit(
        &mut self,
        horizon_days: u32,
        model: &ModelLoad,
        today: NaiveDate,
        opts: &ProducerOptions,
    ) -> Result<(), ForecastError> {
        let request = ForecastRequest::new(horizon_days)?;
        let result = produce_forecast(request, model, today, opts)?;
        self.submissions += 1;
        self.state = SessionState::Forecasted(result);
        Ok(())
    }
}
