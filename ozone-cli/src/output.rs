//! Output formatting for `ozone forecast` and `ozone inspect`.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use ozone_core::forecast::{ForecastResult, ForecastRow, ForecastSource};
use ozone_core::loader::ModelLoad;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Serialize)]
struct JsonForecast<'a> {
    source: &'static str,
    fingerprint: Option<&'a str>,
    rows: &'a [ForecastRow],
}

pub fn write_forecast<W: Write>(out: &mut W, result: &ForecastResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, result),
        OutputFormat::Json => write_json(out, result),
        OutputFormat::Csv => write_csv(out, result),
    }
}

fn write_table<W: Write>(out: &mut W, result: &ForecastResult) -> Result<()> {
    writeln!(out, "{:<12} {:>12} {:>12} {:>12}", "Date", "Forecast", "Lower", "Upper")?;
    for row in &result.rows {
        writeln!(
            out,
            "{:<12} {:>12.2} {:>12.2} {:>12.2}",
            row.date.format("%Y-%m-%d").to_string(),
            row.point_estimate,
            row.lower_bound,
            row.upper_bound
        )?;
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, result: &ForecastResult) -> Result<()> {
    let fingerprint = match &result.source {
        ForecastSource::Model { fingerprint, .. } => Some(fingerprint.as_str()),
        ForecastSource::Simulated => None,
    };
    let doc = JsonForecast {
        source: result.source.label(),
        fingerprint,
        rows: &result.rows,
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, result: &ForecastResult) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in &result.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_inspect<W: Write>(out: &mut W, load: &ModelLoad) -> Result<()> {
    let Some(loaded) = load.model() else {
        if let Some(warning) = load.warning() {
            writeln!(out, "{warning}")?;
        }
        if let Some(failure) = load.failure() {
            writeln!(out, "Reason ({}): {failure}", failure.kind())?;
        }
        return Ok(());
    };

    let summary = loaded.model.summary();
    writeln!(out, "Model file:          {}", loaded.path.display())?;
    writeln!(out, "Fingerprint:         {}", loaded.fingerprint)?;
    writeln!(
        out,
        "Library version:     {}",
        summary.version.as_deref().unwrap_or("unknown")
    )?;
    writeln!(out, "Growth:              {}", summary.growth.label())?;
    writeln!(
        out,
        "Training range:      {} .. {} ({} observations)",
        summary.first_date.date(),
        summary.last_date.date(),
        summary.observations
    )?;
    writeln!(out, "Changepoints:        {}", summary.changepoints)?;
    writeln!(out, "Posterior draws:     {}", summary.posterior_draws)?;
    writeln!(out, "Interval width:      {:.2}", summary.interval_width)?;
    writeln!(out, "Uncertainty samples: {}", summary.uncertainty_samples)?;
    if summary.seasonalities.is_empty() {
        writeln!(out, "Seasonalities:       none")?;
    } else {
        writeln!(out, "Seasonalities:")?;
        for s in &summary.seasonalities {
            writeln!(
                out,
                "  {:<12} period {:>8.2} days, order {:>2}, {}",
                s.name,
                s.period_days,
                s.fourier_order,
                s.mode.label()
            )?;
        }
    }
    Ok(())
}
