//! Forecast chart.
//!
//! Two shapes, chosen by the result's source:
//! - Model: training observations as points, point estimate line, and the
//!   interval drawn as its lower and upper edges
//! - Simulated: point estimate line with "Lower" and "Upper" lines overlaid
//!
//! Dates map to x as whole days since the earliest plotted date.

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget},
    Frame,
};

use ozone_core::forecast::{ForecastResult, ForecastSource};

use crate::app::AppState;
use crate::theme::Theme;

pub const CHART_TITLE: &str = "Ozone Forecast";
pub const X_AXIS_TITLE: &str = "Date";

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match app.session.result() {
        Some(result) if !result.is_empty() => f.render_widget(
            ForecastChart::new(result, &app.theme, &app.config.display.units),
            area,
        ),
        _ => render_empty(f, area, &app.theme),
    }
}

fn render_empty(f: &mut Frame, area: Rect, theme: &Theme) {
    let block = chart_block(theme);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No forecast yet. Set the horizon and press Enter.",
            theme.caption(),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(theme.base())
            .block(block),
        area,
    );
}

fn chart_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.caption())
        .title(Span::styled(format!(" {CHART_TITLE} "), theme.title()))
        .style(theme.base())
}

/// Chart widget for one forecast result.
pub struct ForecastChart<'a> {
    result: &'a ForecastResult,
    theme: &'a Theme,
    units: &'a str,
}

/// Plot-ready series, all in (day offset, value) pairs.
#[derive(Debug, Default, PartialEq)]
pub struct ChartSeries {
    pub origin: Option<NaiveDate>,
    pub observed: Vec<(f64, f64)>,
    pub forecast: Vec<(f64, f64)>,
    pub lower: Vec<(f64, f64)>,
    pub upper: Vec<(f64, f64)>,
}

impl ChartSeries {
    pub fn from_result(result: &ForecastResult) -> Self {
        let origin = result
            .observations()
            .iter()
            .map(|o| o.date)
            .chain(result.rows.iter().map(|r| r.date))
            .min();
        let Some(origin) = origin else {
            return Self::default();
        };
        let x = |date: NaiveDate| (date - origin).num_days() as f64;

        Self {
            origin: Some(origin),
            observed: result
                .observations()
                .iter()
                .map(|o| (x(o.date), o.value))
                .collect(),
            forecast: result
                .rows
                .iter()
                .map(|r| (x(r.date), r.point_estimate))
                .collect(),
            lower: result.rows.iter().map(|r| (x(r.date), r.lower_bound)).collect(),
            upper: result.rows.iter().map(|r| (x(r.date), r.upper_bound)).collect(),
        }
    }

    fn points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.observed
            .iter()
            .chain(&self.forecast)
            .chain(&self.lower)
            .chain(&self.upper)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }

    /// `[min, max]` of x, widened to at least one day.
    pub fn x_bounds(&self) -> [f64; 2] {
        let max = self.points().map(|p| p.0).fold(0.0, f64::max);
        [0.0, max.max(1.0)]
    }

    /// `[min, max]` of y padded by 5% (or ±1 for a flat series).
    pub fn y_bounds(&self) -> [f64; 2] {
        let (lo, hi) = self
            .points()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.1), hi.max(p.1))
            });
        if !lo.is_finite() || !hi.is_finite() {
            return [0.0, 1.0];
        }
        let range = hi - lo;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        [lo - pad, hi + pad]
    }
}

impl<'a> ForecastChart<'a> {
    pub fn new(result: &'a ForecastResult, theme: &'a Theme, units: &'a str) -> Self {
        Self {
            result,
            theme,
            units,
        }
    }
}

impl Widget for ForecastChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let series = ChartSeries::from_result(self.result);
        let [x_min, x_max] = series.x_bounds();
        let [y_min, y_max] = series.y_bounds();

        let (lower_name, upper_name) = match self.result.source {
            ForecastSource::Model { .. } => ("Lower bound", "Upper bound"),
            ForecastSource::Simulated => ("Lower", "Upper"),
        };

        let mut datasets = Vec::with_capacity(4);
        if !series.observed.is_empty() {
            datasets.push(
                Dataset::default()
                    .name("Observed")
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(theme.fg(theme.observed))
                    .data(&series.observed),
            );
        }
        datasets.push(
            Dataset::default()
                .name(lower_name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.fg(theme.lower))
                .data(&series.lower),
        );
        datasets.push(
            Dataset::default()
                .name(upper_name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.fg(theme.upper))
                .data(&series.upper),
        );
        // Drawn last so the estimate sits on top of the bounds.
        datasets.push(
            Dataset::default()
                .name("Forecast")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.fg(theme.forecast))
                .data(&series.forecast),
        );

        let x_labels: Vec<Span> = match series.origin {
            Some(origin) => [x_min, (x_min + x_max) / 2.0, x_max]
                .iter()
                .map(|&x| {
                    let date = origin + chrono::Duration::days(x.round() as i64);
                    Span::styled(date.format("%Y-%m-%d").to_string(), theme.base())
                })
                .collect(),
            None => Vec::new(),
        };
        let y_mid = (y_min + y_max) / 2.0;
        let y_labels: Vec<Span> = [y_min, y_mid, y_max]
            .iter()
            .map(|y| Span::styled(format!("{y:.1}"), theme.base()))
            .collect();

        let chart = Chart::new(datasets)
            .block(chart_block(theme))
            .style(theme.base())
            .legend_position(Some(LegendPosition::TopLeft))
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
            .x_axis(
                Axis::default()
                    .title(Span::styled(X_AXIS_TITLE, theme.title()))
                    .style(theme.base())
                    .bounds([x_min, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(y_axis_title(self.units), theme.title()))
                    .style(theme.base())
                    .bounds([y_min, y_max])
                    .labels(y_labels),
            );

        chart.render(area, buf);
    }
}

pub fn y_axis_title(units: &str) -> String {
    format!("O3 ({units})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ozone_core::forecast::{simulated_forecast, ForecastRequest, ForecastRow, Observation};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn simulated_series_start_at_zero() {
        let result = simulated_forecast(ForecastRequest::new(3).unwrap(), day(16)).unwrap();
        let series = ChartSeries::from_result(&result);
        assert_eq!(series.origin, Some(day(16)));
        assert!(series.observed.is_empty());
        assert_eq!(series.forecast, vec![(0.0, 50.0), (1.0, 52.0), (2.0, 54.0)]);
        assert_eq!(series.lower[2], (2.0, 49.0));
        assert_eq!(series.upper[0], (0.0, 55.0));
        assert_eq!(series.x_bounds(), [0.0, 2.0]);

        let [lo, hi] = series.y_bounds();
        assert!(lo < 45.0 && hi > 59.0);
    }

    #[test]
    fn single_day_widens_x_axis() {
        let result = simulated_forecast(ForecastRequest::new(1).unwrap(), day(16)).unwrap();
        let series = ChartSeries::from_result(&result);
        assert_eq!(series.x_bounds(), [0.0, 1.0]);
    }

    #[test]
    fn model_series_origin_is_first_observation() {
        let result = ForecastResult {
            source: ForecastSource::Model {
                fingerprint: "f".into(),
                observations: vec![
                    Observation { date: day(1), value: 40.0 },
                    Observation { date: day(2), value: 41.0 },
                ],
            },
            rows: vec![ForecastRow {
                date: day(3),
                point_estimate: 42.0,
                lower_bound: 38.0,
                upper_bound: 46.0,
            }],
        };
        let series = ChartSeries::from_result(&result);
        assert_eq!(series.origin, Some(day(1)));
        assert_eq!(series.observed, vec![(0.0, 40.0), (1.0, 41.0)]);
        assert_eq!(series.forecast, vec![(2.0, 42.0)]);
    }

    #[test]
    fn non_finite_values_do_not_break_bounds() {
        let result = ForecastResult {
            source: ForecastSource::Simulated,
            rows: vec![ForecastRow {
                date: day(1),
                point_estimate: f64::NAN,
                lower_bound: f64::NAN,
                upper_bound: f64::NAN,
            }],
        };
        let series = ChartSeries::from_result(&result);
        assert_eq!(series.y_bounds(), [0.0, 1.0]);
    }

    #[test]
    fn axis_title_uses_units() {
        assert_eq!(y_axis_title("µg/m³"), "O3 (µg/m³)");
    }
}
