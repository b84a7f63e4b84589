//! Ozone Core: model loading, forecast production, and session state.
//!
//! This crate holds everything below the presentation layer:
//! - Dashboard configuration (optional TOML file)
//! - Model loader with a non-fatal downgrade to "unavailable"
//! - Read-only evaluator for serialized Prophet models
//! - Forecast producer (model path or deterministic placeholder)
//! - Explicit run-scoped session state

pub mod config;
pub mod forecast;
pub mod loader;
pub mod prophet;
pub mod rng;
pub mod session;

pub use config::DashboardConfig;
pub use forecast::{
    produce_forecast, simulated_forecast, ForecastError, ForecastRequest, ForecastResult,
    ForecastRow, ForecastSource, Observation, ProducerOptions,
};
pub use loader::{load_model, LoadFailure, LoadedModel, ModelLoad, UNAVAILABLE_WARNING};
pub use session::{Session, SessionState};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<ModelLoad>();
        require_sync::<ModelLoad>();
        require_send::<prophet::ProphetModel>();
        require_sync::<prophet::ProphetModel>();
        require_send::<ForecastResult>();
        require_sync::<ForecastResult>();
        require_send::<Session>();
        require_sync::<Session>();
        require_send::<DashboardConfig>();
        require_sync::<DashboardConfig>();
    }
}
